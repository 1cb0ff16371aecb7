use crate::{cli::commands::login, credentials::aws::DEFAULT_ENGINE};
use clap::{Arg, ArgAction, Command};

pub const NAME: &str = "aws";

pub const ARG_IAM: &str = "iam";
pub const ARG_PROFILE: &str = "profile";
pub const ARG_ENGINE: &str = "engine";
pub const ARG_APPEND: &str = "append";

#[must_use]
pub fn command() -> Command {
    let command = Command::new(NAME)
        .about("Request AWS credentials")
        .arg(
            Arg::new(ARG_IAM)
                .short('i')
                .long("iam")
                .help("Request IAM user credentials instead of STS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_PROFILE)
                .short('a')
                .long("profile")
                .help("Profile header of the credentials block")
                .default_value("default"),
        )
        .arg(
            Arg::new(ARG_ENGINE)
                .short('e')
                .long("engine")
                .help("Secrets engine, anything but \"aws\" is mounted at aws-<engine>")
                .default_value(DEFAULT_ENGINE),
        )
        .arg(
            Arg::new(ARG_APPEND)
                .long("append")
                .help("Append the profile to ~/.aws/credentials instead of replacing the file")
                .action(ArgAction::SetTrue)
                .conflicts_with(login::ARG_STDOUT),
        );

    login::with_args(
        command,
        "default",
        "Output credentials to stdout (instead of ~/.aws/credentials)",
    )
}
