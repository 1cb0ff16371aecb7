//! Map validated CLI matches to an [`Action`].
//!
//! Environment-derived settings are resolved here once, into [`GlobalArgs`],
//! so actions never read the environment themselves.

use crate::{
    cli::{
        actions::{Action, aws, db},
        commands::{self, login, vault},
        globals::GlobalArgs,
    },
    credentials::{AwsRequest, DatabaseRequest, Login},
};
use anyhow::{Context, Result, bail};
use clap::ArgMatches;

fn string_arg(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .filter(|value| !value.is_empty())
        .cloned()
}

fn login(matches: &ArgMatches) -> Result<Login> {
    let username = string_arg(matches, login::ARG_USERNAME)
        .context("$USER empty and -u unspecified -- cant continue")?;

    Ok(Login {
        username,
        passcode: matches
            .get_one::<String>(login::ARG_PASSCODE)
            .cloned()
            .unwrap_or_default(),
    })
}

fn role(matches: &ArgMatches, default: &str) -> String {
    string_arg(matches, login::ARG_ROLE).unwrap_or_else(|| default.to_string())
}

fn aws_args(globals: GlobalArgs, matches: &ArgMatches) -> Result<aws::Args> {
    let request = AwsRequest {
        login: login(matches)?,
        role: role(matches, "default"),
        engine: string_arg(matches, commands::aws::ARG_ENGINE)
            .unwrap_or_else(|| crate::credentials::aws::DEFAULT_ENGINE.to_string()),
        iam: matches.get_flag(commands::aws::ARG_IAM),
        ttl: matches.get_one::<u64>(login::ARG_TTL).copied(),
    };

    Ok(aws::Args {
        globals,
        request,
        profile: string_arg(matches, commands::aws::ARG_PROFILE)
            .unwrap_or_else(|| "default".to_string()),
        stdout: matches.get_flag(login::ARG_STDOUT),
        append: matches.get_flag(commands::aws::ARG_APPEND),
    })
}

fn db_args(globals: GlobalArgs, matches: &ArgMatches) -> Result<db::Args> {
    let operator = login(matches)?;

    let database = string_arg(matches, commands::db::ARG_DATABASE).context(
        "-d is required - specify a database name that matches your vault DB name",
    )?;

    let request = DatabaseRequest {
        login: operator,
        database,
        role: role(matches, "readonly"),
        ttl: matches.get_one::<u64>(login::ARG_TTL).copied(),
    };

    Ok(db::Args {
        globals,
        request,
        region: string_arg(matches, commands::db::ARG_REGION)
            .unwrap_or_else(|| crate::inventory::DEFAULT_REGION.to_string()),
        stdout: matches.get_flag(login::ARG_STDOUT),
        no_console: matches.get_flag(commands::db::ARG_NO_CONSOLE),
    })
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let Some((name, sub_m)) = matches.subcommand() else {
        bail!("missing subcommand: aws or db");
    };

    let vault_opts = vault::Options::parse(sub_m)?;
    let globals = GlobalArgs::new(vault_opts.addr, vault_opts.auth_mount);

    match name {
        commands::aws::NAME => Ok(Action::Aws(aws_args(globals, sub_m)?)),
        commands::db::NAME => Ok(Action::Db(db_args(globals, sub_m)?)),
        _ => bail!("unknown subcommand: {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let matches = commands::new().try_get_matches_from(args)?;
        handler(&matches)
    }

    #[test]
    fn test_aws_action() {
        temp_env::with_vars(
            [
                ("VAULT_ADDR", Some("https://vault.tld:8200")),
                ("USER", Some("alice")),
                ("LESSEE_AUTH_MOUNT", None),
            ],
            || {
                let action = dispatch(&["lessee", "aws", "-e", "prod", "-i", "-t", "1h"]);
                let Ok(Action::Aws(args)) = action else {
                    panic!("expected an aws action, got {action:?}");
                };

                assert_eq!(args.globals.vault_addr, "https://vault.tld:8200");
                assert_eq!(args.globals.auth_mount, "ldap");
                assert_eq!(args.request.login.username, "alice");
                assert_eq!(args.request.path(), "aws-prod/creds/default");
                assert_eq!(args.request.ttl, Some(3600));
                assert_eq!(args.profile, "default");
                assert!(!args.stdout);
            },
        );
    }

    #[test]
    fn test_db_action() {
        temp_env::with_vars(
            [
                ("VAULT_ADDR", Some("https://vault.tld:8200")),
                ("USER", Some("alice")),
                ("AWS_REGION", None),
            ],
            || {
                let action = dispatch(&["lessee", "db", "-d", "hive", "-u", "bob", "-o", "-c"]);
                let Ok(Action::Db(args)) = action else {
                    panic!("expected a db action, got {action:?}");
                };

                assert_eq!(args.request.login.username, "bob");
                assert_eq!(args.request.creds_path(), "database/creds/hive-readonly");
                assert_eq!(args.region, "us-east-1");
                assert!(args.stdout);
                assert!(args.no_console);
            },
        );
    }

    #[test]
    fn test_missing_username() {
        temp_env::with_vars(
            [
                ("VAULT_ADDR", Some("https://vault.tld:8200")),
                ("USER", None),
            ],
            || {
                let err = dispatch(&["lessee", "aws"]).err().map(|e| e.to_string());
                assert_eq!(
                    err.as_deref(),
                    Some("$USER empty and -u unspecified -- cant continue")
                );
            },
        );
    }

    #[test]
    fn test_missing_database() {
        temp_env::with_vars(
            [
                ("VAULT_ADDR", Some("https://vault.tld:8200")),
                ("USER", Some("alice")),
            ],
            || {
                let err = dispatch(&["lessee", "db"]).err().map(|e| e.to_string());
                assert!(err.is_some_and(|e| e.starts_with("-d is required")));
            },
        );
    }

    #[test]
    fn test_missing_vault_addr() {
        temp_env::with_vars(
            [("VAULT_ADDR", None), ("USER", Some("alice"))],
            || {
                assert!(dispatch(&["lessee", "db", "-d", "hive"]).is_err());
            },
        );
    }
}
