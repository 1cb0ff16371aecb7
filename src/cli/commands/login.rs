//! Arguments every credential subcommand takes.

use clap::{Arg, ArgAction, Command, builder::ValueParser};

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSCODE: &str = "passcode";
pub const ARG_ROLE: &str = "role";
pub const ARG_STDOUT: &str = "stdout";
pub const ARG_TTL: &str = "ttl";

/// Accept a lease duration as plain seconds or with an `s`, `m`, `h` or `d`
/// suffix, e.g. `3600`, `90m`, `8h`.
#[must_use]
pub fn validator_ttl() -> ValueParser {
    ValueParser::from(move |ttl: &str| -> std::result::Result<u64, String> {
        let ttl = ttl.trim();
        let (digits, unit) = match ttl.char_indices().last() {
            Some((index, suffix)) if suffix.is_ascii_alphabetic() => (&ttl[..index], suffix),
            _ => (ttl, 's'),
        };

        let multiplier = match unit.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86_400,
            _ => return Err(format!("invalid ttl unit: {unit}")),
        };

        match digits.parse::<u64>() {
            Ok(0) | Err(_) => Err(format!("invalid ttl: {ttl}")),
            Ok(value) => value
                .checked_mul(multiplier)
                .ok_or_else(|| format!("ttl too large: {ttl}")),
        }
    })
}

#[must_use]
pub fn with_args(command: Command, default_role: &'static str, stdout_help: &'static str) -> Command {
    command
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Vault username")
                .env("USER"),
        )
        .arg(
            Arg::new(ARG_PASSCODE)
                .short('p')
                .long("passcode")
                .help("YubiKey OTP string or MFA passcode (default: Duo push)")
                .default_value(""),
        )
        .arg(
            Arg::new(ARG_ROLE)
                .short('r')
                .long("role")
                .help("Vault role name")
                .default_value(default_role),
        )
        .arg(
            Arg::new(ARG_STDOUT)
                .short('o')
                .long("stdout")
                .help(stdout_help)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_TTL)
                .short('t')
                .long("ttl")
                .help("Requested lease duration, example: 3600, 90m, 8h")
                .value_parser(validator_ttl()),
        )
}
