//! # lessee
//!
//! `lessee` asks Vault for short-lived credentials and puts them where the
//! usual tooling expects them.
//!
//! ## Authentication
//!
//! The operator logs in with a directory password plus an optional one-time
//! passcode. Vault releases older than 1.11 take the passcode inline in the
//! login request; newer releases answer with an MFA requirement that is
//! satisfied by a second `sys/mfa/validate` call. The release is read from
//! `sys/health` before logging in.
//!
//! ## Credentials
//!
//! - **AWS**: STS or IAM keys written to `~/.aws/credentials`.
//! - **Databases**: dynamic users written to `~/.pgpass` or `~/.my.cnf`. The
//!   RDS endpoint is found by matching the host in the Vault connection URL
//!   against `DescribeDBInstances`, and a `psql`/`mysql` console is started.
//!
//! When a file cannot be targeted the credentials are printed instead.

pub mod cli;
pub mod console;
pub mod credentials;
pub mod endpoint;
pub mod inventory;
pub mod output;
pub mod prompt;
pub mod vault;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
