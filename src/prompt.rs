//! Interactive terminal input.
//!
//! Authentication reads the password and, when needed, a fresh one-time
//! passcode through [`Prompt`], so tests can script the answers.
//!
//! When stdin is not a terminal the passcode is read as a plain line, so a
//! YubiKey OTP can be piped in.

use dialoguer::{Input, Password};
use secrecy::SecretString;
use std::io::{self, BufRead, IsTerminal};

pub trait Prompt {
    /// Read the directory password for `username` without echo.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or input is interrupted.
    fn password(&self, username: &str) -> io::Result<SecretString>;

    /// Read a one-time passcode line.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or input is interrupted.
    fn passcode(&self) -> io::Result<String>;
}

/// Prompts on the controlling terminal (stderr), leaving stdout for output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn password(&self, username: &str) -> io::Result<SecretString> {
        Password::new()
            .with_prompt(format!("LDAP Password for {username}"))
            .allow_empty_password(true)
            .interact()
            .map(SecretString::from)
            .map_err(io::Error::other)
    }

    fn passcode(&self) -> io::Result<String> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return read_passcode(stdin.lock());
        }

        Input::<String>::new()
            .with_prompt("YubiKey OTP")
            .allow_empty(true)
            .interact_text()
            .map(|line| line.trim().to_string())
            .map_err(io::Error::other)
    }
}

/// Read one passcode line from `reader`, trimmed.
///
/// # Errors
/// Returns `UnexpectedEof` when the input ends before a line is read.
fn read_passcode<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no passcode on stdin",
        ));
    }

    Ok(line.trim().to_string())
}
