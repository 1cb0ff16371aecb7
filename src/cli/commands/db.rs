use crate::{cli::commands::login, inventory::DEFAULT_REGION};
use clap::{Arg, ArgAction, Command};

pub const NAME: &str = "db";

pub const ARG_DATABASE: &str = "database";
pub const ARG_REGION: &str = "region";
pub const ARG_NO_CONSOLE: &str = "no-console";

#[must_use]
pub fn command() -> Command {
    let command = Command::new(NAME)
        .visible_alias("rds")
        .about("Request database credentials for an RDS instance")
        .arg(
            Arg::new(ARG_DATABASE)
                .short('d')
                .long("database")
                .help("Database name as configured in Vault"),
        )
        .arg(
            Arg::new(ARG_REGION)
                .short('e')
                .long("region")
                .help("AWS region of the RDS instance")
                .env("AWS_REGION")
                .default_value(DEFAULT_REGION),
        )
        .arg(
            Arg::new(ARG_NO_CONSOLE)
                .short('c')
                .long("no-console")
                .help("Don't start the database console after getting credentials")
                .action(ArgAction::SetTrue),
        );

    login::with_args(
        command,
        "readonly",
        "Output credentials to stdout (instead of ~/.pgpass or ~/.my.cnf)",
    )
}
