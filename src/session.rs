//! The signed-in user's session.
//!
//! A [`Session`] is created from a login response and passed explicitly to
//! whatever needs it; nothing reads it from ambient state. [`SessionStore`]
//! keeps it on disk between invocations: written on login, removed on logout.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::api::AuthResponse;
use crate::model::common::{Role, VoterId};

/// Claims we read from the backend's token. Everything else is ignored.
#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token issued by the backend.
    token: String,
    role: Role,
    #[serde(default)]
    voter_id: Option<VoterId>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The voter id, required for anything done on a voter's behalf.
    pub fn voter_id(&self) -> Result<&str> {
        self.voter_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Unauthorized("voter id not found, log in again".into()))
    }

    /// Fail unless this session holds `role`.
    pub fn require(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::Unauthorized(format!(
                "this requires the {role} role, signed in as {}",
                self.role
            )))
        }
    }

    /// When the backend's token stops being accepted, if it says.
    ///
    /// The signature is not checked: the client has no key, and the backend
    /// re-validates the token on every request anyway.
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data =
            jsonwebtoken::decode::<Claims>(&self.token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(data
            .claims
            .exp
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single()))
    }

    /// Whether the token has expired at `now`. Tokens we cannot read are
    /// assumed live and left for the backend to judge.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Ok(Some(expiry)) => expiry <= now,
            Ok(None) => false,
            Err(e) => {
                debug!("Could not read token expiry: {e}");
                false
            }
        }
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            role: auth.role,
            voter_id: auth.voter_id,
            username: auth.username,
            email: auth.email,
        }
    }
}

/// Keeps the token out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("voter_id", &self.voter_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A session persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.session_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `session`, replacing any previous one.
    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session)?;
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // The file holds a bearer token: owner only.
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path)?;
        // An older file keeps its mode when reopened.
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(json.as_bytes())?;
        info!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// The stored session, if there is one and it has not expired.
    /// An expired session is removed.
    pub fn load(&self) -> Result<Option<Session>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session: Session = serde_json::from_str(&json)?;
        if session.is_expired(Utc::now()) {
            warn!("Stored session has expired, discarding it");
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Remove the stored session. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared session at {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;

    #[test]
    fn built_from_login() {
        let session = Session::from(AuthResponse {
            token: "opaque".into(),
            role: Role::Voter,
            voter_id: Some("VTR-1001".into()),
            username: Some("priya".into()),
            email: None,
        });
        assert_eq!(session.role(), Role::Voter);
        assert_eq!(session.voter_id().unwrap(), "VTR-1001");
        assert_eq!(session.username(), Some("priya"));
        assert!(!format!("{session:?}").contains("opaque"));
    }

    #[test]
    fn role_checks() {
        let admin = Session::example_admin();
        admin.require(Role::Admin).unwrap();
        assert!(matches!(admin.require(Role::Voter), Err(Error::Unauthorized(_))));
        assert!(matches!(admin.voter_id(), Err(Error::Unauthorized(_))));

        let voter = Session::example_voter();
        voter.require(Role::Voter).unwrap();
        assert!(voter.require(Role::Admin).is_err());
    }

    #[test]
    fn token_expiry() {
        let expiry = Utc.timestamp_opt(Utc::now().timestamp() + 3600, 0).unwrap();
        let mut session = Session::example_voter();
        session.token = Session::example_token(expiry);
        assert_eq!(session.expires_at().unwrap(), Some(expiry));
        assert!(!session.is_expired(expiry - Duration::seconds(1)));
        assert!(session.is_expired(expiry));

        session.token = "not-a-jwt".into();
        assert!(session.expires_at().is_err());
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.clear().unwrap());

        let session = Session::example_admin();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn stored_token_is_private() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(path.clone());
        let session = Session::example_voter();
        store.save(&session).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn store_discards_expired_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let mut session = Session::example_voter();
        session.token = Session::example_token(Utc::now() - Duration::minutes(5));
        store.save(&session).unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }
}
