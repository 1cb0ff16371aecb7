use crate::{
    prompt::Prompt,
    vault::{
        Secret, VaultClient, VaultError,
        version::{self, BrokerVersion, ProbeError, Protocol},
    },
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::{collections::BTreeMap, fmt, io};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Passcodes shorter than this are assumed to be stale (e.g. recalled from
/// shell history) and are asked for again. A YubiKey OTP is 44 characters.
pub const PASSCODE_MIN_LEN: usize = 44;

/// Token TTL requested by the single-step login.
const LEGACY_TOKEN_TTL: &str = "1h";

const DUO_METHOD: &str = "duo";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("$VAULT_ADDR is undefined")]
    NoBrokerAddress,
    #[error("unable to read password: {0}")]
    PasswordPromptFailed(#[source] io::Error),
    #[error("unable to read passcode: {0}")]
    PasscodePromptFailed(#[source] io::Error),
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error("There was an error talking to vault. Vault says: {0}")]
    LoginRejected(String),
    #[error("error talking to Vault: {0}")]
    Vault(#[source] VaultError),
    #[error("Vault requires {0} MFA methods, only one is supported")]
    MultipleMfaConstraints(usize),
    #[error("Vault requested MFA but offered no method")]
    MissingMfaConstraint,
    #[error("Error parsing login response: {0}")]
    MalformedResponse(String),
}

impl From<VaultError> for AuthError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Status { message, status, .. } => {
                if message.is_empty() {
                    Self::LoginRejected(status.to_string())
                } else {
                    Self::LoginRejected(message)
                }
            }
            other => Self::Vault(other),
        }
    }
}

/// An authenticated Vault client. Lives for one invocation, never persisted.
pub struct BrokerSession {
    client: VaultClient,
    token: SecretString,
    version: BrokerVersion,
}

impl fmt::Debug for BrokerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerSession")
            .field("client", &self.client)
            .field("token", &"***")
            .field("version", &self.version)
            .finish()
    }
}

impl BrokerSession {
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub const fn version(&self) -> BrokerVersion {
        self.version
    }

    /// # Errors
    /// Returns an error if the read fails or the response is not a secret.
    pub async fn read(&self, path: &str, query: &[(&str, String)]) -> Result<Secret, VaultError> {
        self.client.read(path, query, &self.token).await
    }

    /// # Errors
    /// Returns an error if Vault refuses the renewal.
    pub async fn renew_lease(&self, lease_id: &str, increment: u64) -> Result<u64, VaultError> {
        self.client
            .renew_lease(lease_id, increment, &self.token)
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaConstraint {
    pub id: String,
    pub kind: String,
}

/// Pending second factor returned by a login on Vault 1.11+.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaChallenge {
    pub request_id: String,
    pub constraints: Vec<MfaConstraint>,
}

impl MfaChallenge {
    /// The one method to answer.
    ///
    /// # Errors
    /// Fails when Vault offers no method or more than one.
    pub fn single(&self) -> Result<&MfaConstraint, AuthError> {
        match self.constraints.as_slice() {
            [] => Err(AuthError::MissingMfaConstraint),
            [constraint] => Ok(constraint),
            many => Err(AuthError::MultipleMfaConstraints(many.len())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Debug, Deserialize)]
struct LoginAuth {
    #[serde(default)]
    client_token: String,
    mfa_requirement: Option<MfaRequirement>,
}

#[derive(Debug, Deserialize)]
struct MfaRequirement {
    mfa_request_id: String,
    #[serde(default)]
    mfa_constraints: BTreeMap<String, MfaConstraintAny>,
}

#[derive(Debug, Deserialize)]
struct MfaConstraintAny {
    #[serde(default)]
    any: Vec<MfaMethod>,
}

#[derive(Debug, Deserialize)]
struct MfaMethod {
    id: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<MfaRequirement> for MfaChallenge {
    fn from(requirement: MfaRequirement) -> Self {
        let constraints = requirement
            .mfa_constraints
            .into_values()
            .flat_map(|constraint| constraint.any)
            .map(|method| MfaConstraint {
                id: method.id,
                kind: method.kind,
            })
            .collect();

        Self {
            request_id: requirement.mfa_request_id,
            constraints,
        }
    }
}

enum LoginOutcome {
    Token(SecretString),
    Challenge(MfaChallenge),
}

fn parse_login(body: Value) -> Result<LoginOutcome, AuthError> {
    let response: LoginResponse =
        serde_json::from_value(body).map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    let auth = response
        .auth
        .ok_or_else(|| AuthError::MalformedResponse("no auth found".to_string()))?;

    if let Some(requirement) = auth.mfa_requirement {
        return Ok(LoginOutcome::Challenge(requirement.into()));
    }

    if auth.client_token.is_empty() {
        return Err(AuthError::MalformedResponse(
            "no client_token found".to_string(),
        ));
    }

    Ok(LoginOutcome::Token(SecretString::from(auth.client_token)))
}

/// True when `passcode` is too short to be a real one-time code and must be
/// asked for again. An empty passcode means "push", and passes through.
#[must_use]
pub fn needs_fresh_passcode(passcode: &str) -> bool {
    (1..PASSCODE_MIN_LEN).contains(&passcode.chars().count())
}

/// Value submitted for an MFA method. Duo cannot tell a passcode from a
/// device name, so passcodes for it carry a `passcode=` prefix.
#[must_use]
pub fn mfa_payload_value(kind: &str, passcode: &str) -> String {
    if kind == DUO_METHOD && !passcode.is_empty() {
        format!("passcode={passcode}")
    } else {
        passcode.to_string()
    }
}

/// Log into Vault as `username`, answering the second factor with
/// `passcode` (or a fresh one read from `prompt`).
///
/// # Errors
/// Fails fast on a missing address, a failed prompt, an unreadable version or
/// any login or MFA rejection.
#[instrument(skip(client, passcode, prompt))]
pub async fn authenticate<P: Prompt>(
    client: &VaultClient,
    mount: &str,
    username: &str,
    passcode: &str,
    prompt: &P,
) -> Result<BrokerSession, AuthError> {
    if client.address().is_empty() {
        return Err(AuthError::NoBrokerAddress);
    }

    let version = version::probe(client).await?;
    let protocol = version.protocol();

    debug!("using {:?} login for Vault {}", protocol, version);

    let password = prompt
        .password(username)
        .map_err(AuthError::PasswordPromptFailed)?;

    let passcode = if needs_fresh_passcode(passcode) {
        prompt.passcode().map_err(AuthError::PasscodePromptFailed)?
    } else {
        passcode.to_string()
    };

    let login_path = format!("auth/{mount}/login/{username}");

    let token = match protocol {
        Protocol::Legacy => legacy_login(client, &login_path, &password, &passcode).await?,
        Protocol::Modern => modern_login(client, &login_path, &password, &passcode).await?,
    };

    info!("authenticated to Vault as {}", username);

    Ok(BrokerSession {
        client: client.clone(),
        token,
        version,
    })
}

async fn legacy_login(
    client: &VaultClient,
    login_path: &str,
    password: &SecretString,
    passcode: &str,
) -> Result<SecretString, AuthError> {
    let mut body = Map::new();
    body.insert("password".into(), password.expose_secret().into());
    if !passcode.is_empty() {
        body.insert("passcode".into(), passcode.into());
    }
    body.insert("ttl".into(), LEGACY_TOKEN_TTL.into());

    let response = client.write(login_path, &Value::Object(body), None).await?;

    match parse_login(response)? {
        LoginOutcome::Token(token) => Ok(token),
        LoginOutcome::Challenge(_) => Err(AuthError::MalformedResponse(
            "unexpected MFA requirement".to_string(),
        )),
    }
}

async fn modern_login(
    client: &VaultClient,
    login_path: &str,
    password: &SecretString,
    passcode: &str,
) -> Result<SecretString, AuthError> {
    let body = json!({ "password": password.expose_secret() });

    let response = client.write(login_path, &body, None).await?;

    let challenge = match parse_login(response)? {
        LoginOutcome::Token(token) => return Ok(token),
        LoginOutcome::Challenge(challenge) => challenge,
    };

    let constraint = challenge.single()?;

    debug!("answering {} MFA method {}", constraint.kind, constraint.id);

    let mut mfa_payload = Map::new();
    mfa_payload.insert(
        constraint.id.clone(),
        json!([mfa_payload_value(&constraint.kind, passcode)]),
    );

    let payload = json!({
        "mfa_request_id": challenge.request_id,
        "mfa_payload": mfa_payload
    });

    let response = client.write("sys/mfa/validate", &payload, None).await?;

    match parse_login(response)? {
        LoginOutcome::Token(token) => Ok(token),
        LoginOutcome::Challenge(_) => Err(AuthError::LoginRejected(
            "MFA validation did not complete".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::cell::{Cell, RefCell};
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const YUBIKEY_OTP: &str = "cccccbhuinjdtvbfkrbcvbjhhgcfkeklbhjnrkhevlgk";

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    /// Scripted answers, counting how often each prompt was shown.
    struct ScriptedPrompt {
        password: Option<&'static str>,
        passcodes: RefCell<Vec<&'static str>>,
        password_calls: Cell<usize>,
        passcode_calls: Cell<usize>,
    }

    impl ScriptedPrompt {
        fn new(password: &'static str, passcodes: &[&'static str]) -> Self {
            Self {
                password: Some(password),
                passcodes: RefCell::new(passcodes.iter().rev().copied().collect()),
                password_calls: Cell::new(0),
                passcode_calls: Cell::new(0),
            }
        }

        fn interrupted() -> Self {
            Self {
                password: None,
                ..Self::new("", &[])
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn password(&self, _username: &str) -> io::Result<SecretString> {
            self.password_calls.set(self.password_calls.get() + 1);
            self.password
                .map(|p| SecretString::from(p.to_string()))
                .ok_or_else(|| io::Error::new(io::ErrorKind::Interrupted, "^C"))
        }

        fn passcode(&self) -> io::Result<String> {
            self.passcode_calls.set(self.passcode_calls.get() + 1);
            self.passcodes
                .borrow_mut()
                .pop()
                .map(str::to_string)
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no passcode"))
        }
    }

    async fn vault(version: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sys/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": version
            })))
            .mount(&server)
            .await;
        server
    }

    fn token_response(token: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "auth": {"client_token": token, "lease_duration": 3600}
        }))
    }

    fn mfa_response(methods: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "auth": {
                "client_token": "",
                "mfa_requirement": {
                    "mfa_request_id": "req-1",
                    "mfa_constraints": methods
                }
            }
        }))
    }

    #[test]
    fn passcode_length_heuristic() {
        assert!(!needs_fresh_passcode(""));
        assert!(needs_fresh_passcode("1"));
        assert!(needs_fresh_passcode("123456"));
        assert!(needs_fresh_passcode(&"c".repeat(43)));
        assert!(!needs_fresh_passcode(&"c".repeat(44)));
        assert!(!needs_fresh_passcode(YUBIKEY_OTP));
        assert!(!needs_fresh_passcode(&"c".repeat(60)));
    }

    #[test]
    fn passcode_length_counts_characters() {
        // 43 multi-byte characters are still too short
        assert!(needs_fresh_passcode(&"é".repeat(43)));
    }

    #[test]
    fn duo_passcodes_are_prefixed() {
        assert_eq!(mfa_payload_value("duo", "123456"), "passcode=123456");
        assert_eq!(mfa_payload_value("totp", "123456"), "123456");
        assert_eq!(mfa_payload_value("okta", "123456"), "123456");
        assert_eq!(mfa_payload_value("duo", ""), "");
    }

    #[test]
    fn challenge_requires_exactly_one_method() {
        let mut challenge = MfaChallenge {
            request_id: "req-1".to_string(),
            constraints: vec![],
        };
        assert!(matches!(
            challenge.single(),
            Err(AuthError::MissingMfaConstraint)
        ));

        challenge.constraints = vec![
            MfaConstraint {
                id: "a".to_string(),
                kind: "duo".to_string(),
            },
            MfaConstraint {
                id: "b".to_string(),
                kind: "totp".to_string(),
            },
        ];
        assert!(matches!(
            challenge.single(),
            Err(AuthError::MultipleMfaConstraints(2))
        ));
    }

    #[test]
    fn mfa_requirement_flattens_constraints() -> Result<()> {
        let outcome = parse_login(json!({
            "auth": {
                "client_token": "",
                "mfa_requirement": {
                    "mfa_request_id": "req-9",
                    "mfa_constraints": {
                        "corp_duo": {"any": [{"type": "duo", "id": "m-1", "uses_passcode": true}]}
                    }
                }
            }
        }))?;

        let LoginOutcome::Challenge(challenge) = outcome else {
            return Err(anyhow!("expected a challenge"));
        };
        assert_eq!(challenge.request_id, "req-9");
        assert_eq!(
            challenge.constraints,
            vec![MfaConstraint {
                id: "m-1".to_string(),
                kind: "duo".to_string()
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_address_fails_before_prompting() -> Result<()> {
        let client = VaultClient::new("")?;
        let prompt = ScriptedPrompt::new("pw", &[]);

        let err = authenticate(&client, "ldap", "alice", "", &prompt)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert!(matches!(err, AuthError::NoBrokerAddress));
        assert_eq!(prompt.password_calls.get(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn legacy_login_sends_passcode_inline() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.10.3").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .and(body_json(json!({
                "password": "hunter2",
                "passcode": YUBIKEY_OTP,
                "ttl": "1h"
            })))
            .respond_with(token_response("s.legacy"))
            .expect(1)
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("hunter2", &[]);
        let session = authenticate(&client, "ldap", "alice", YUBIKEY_OTP, &prompt).await?;

        assert_eq!(session.token().expose_secret(), "s.legacy");
        assert_eq!(session.version().protocol(), Protocol::Legacy);
        assert_eq!(prompt.passcode_calls.get(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn legacy_login_omits_empty_passcode() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.9.4").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .and(body_json(json!({"password": "hunter2", "ttl": "1h"})))
            .respond_with(token_response("s.push"))
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("hunter2", &[]);
        let session = authenticate(&client, "ldap", "alice", "", &prompt).await?;

        assert_eq!(session.token().expose_secret(), "s.push");
        assert_eq!(prompt.passcode_calls.get(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn short_passcode_is_asked_for_again() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.10.3").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .and(body_json(json!({
                "password": "hunter2",
                "passcode": YUBIKEY_OTP,
                "ttl": "1h"
            })))
            .respond_with(token_response("s.fresh"))
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("hunter2", &[YUBIKEY_OTP]);
        let session = authenticate(&client, "ldap", "alice", "123456", &prompt).await?;

        assert_eq!(session.token().expose_secret(), "s.fresh");
        assert_eq!(prompt.passcode_calls.get(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn modern_login_without_mfa_uses_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.11.0").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .and(body_json(json!({"password": "hunter2"})))
            .respond_with(token_response("s.direct"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/sys/mfa/validate"))
            .respond_with(token_response("s.never"))
            .expect(0)
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("hunter2", &[]);
        let session = authenticate(&client, "ldap", "alice", "", &prompt).await?;

        assert_eq!(session.token().expose_secret(), "s.direct");
        Ok(())
    }

    #[tokio::test]
    async fn modern_login_prefixes_duo_passcode() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.15.2+ent").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .respond_with(mfa_response(json!({
                "corp_duo": {"any": [{"type": "duo", "id": "duo-id"}]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/sys/mfa/validate"))
            .and(body_json(json!({
                "mfa_request_id": "req-1",
                "mfa_payload": {"duo-id": ["passcode=123456"]}
            })))
            .respond_with(token_response("s.duo"))
            .expect(1)
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        // six digits are re-prompted; the operator types the same code again
        let prompt = ScriptedPrompt::new("hunter2", &["123456"]);
        let session = authenticate(&client, "ldap", "alice", "123456", &prompt).await?;

        assert_eq!(session.token().expose_secret(), "s.duo");
        assert_eq!(prompt.passcode_calls.get(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn modern_login_passes_other_methods_unmodified() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.13.1").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .respond_with(mfa_response(json!({
                "corp_totp": {"any": [{"type": "totp", "id": "totp-id"}]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/sys/mfa/validate"))
            .and(body_json(json!({
                "mfa_request_id": "req-1",
                "mfa_payload": {"totp-id": ["123456"]}
            })))
            .respond_with(token_response("s.totp"))
            .expect(1)
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("hunter2", &["123456"]);
        let session = authenticate(&client, "ldap", "alice", "123456", &prompt).await?;

        assert_eq!(session.token().expose_secret(), "s.totp");
        Ok(())
    }

    #[tokio::test]
    async fn modern_login_refuses_several_methods() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.14.0").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .respond_with(mfa_response(json!({
                "corp_duo": {"any": [{"type": "duo", "id": "duo-id"}]},
                "corp_totp": {"any": [{"type": "totp", "id": "totp-id"}]}
            })))
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("hunter2", &[]);
        let err = authenticate(&client, "ldap", "alice", YUBIKEY_OTP, &prompt)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert!(matches!(err, AuthError::MultipleMfaConstraints(2)));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_carries_vault_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.12.0").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": ["ldap operation failed: failed to bind as user"]
            })))
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("wrong", &[]);
        let err = authenticate(&client, "ldap", "alice", "", &prompt)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert!(matches!(err, AuthError::LoginRejected(_)));
        assert!(err.to_string().contains("failed to bind as user"));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_mfa_carries_vault_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.15.0").await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/ldap/login/alice"))
            .respond_with(mfa_response(json!({
                "corp_duo": {"any": [{"type": "duo", "id": "duo-id"}]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/sys/mfa/validate"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "errors": ["mfa denied"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::new("hunter2", &[]);
        let err = authenticate(&client, "ldap", "alice", "", &prompt)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert!(matches!(err, AuthError::LoginRejected(ref message) if message == "mfa denied"));
        Ok(())
    }

    #[tokio::test]
    async fn interrupted_password_prompt_fails() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = vault("1.12.0").await;

        let client = VaultClient::new(&server.uri())?;
        let prompt = ScriptedPrompt::interrupted();
        let err = authenticate(&client, "ldap", "alice", "", &prompt)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert!(matches!(err, AuthError::PasswordPromptFailed(_)));
        Ok(())
    }
}
