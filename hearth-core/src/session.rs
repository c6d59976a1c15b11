//! Client-side login session.
//!
//! The CLI keeps the bearer token from `login` in a small JSON file. The file
//! is read once at startup through [`SessionContext::init`], which also
//! discards it if it has expired, and removed by [`SessionContext::teardown`]
//! on logout. This only gates what the client tries to do; the server checks
//! tokens on every request regardless.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    pub token: String,
    pub username: String,
    /// Server the token was issued by
    pub server: String,
    pub expires_at: DateTime<Utc>,
}

impl ClientSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Active(ClientSession),
    Expired,
    Absent,
}

pub struct SessionContext {
    path: PathBuf,
}

impl SessionContext {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// ~/.hearth/session.json
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".hearth").join("session.json"))
            .unwrap_or_else(|| PathBuf::from(".hearth/session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session and check its expiry. An expired session file
    /// is deleted.
    pub fn init(&self, now: DateTime<Utc>) -> Result<SessionStatus, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SessionStatus::Absent),
            Err(e) => return Err(e.into()),
        };
        let session: ClientSession = serde_json::from_str(&contents)?;

        if session.is_expired(now) {
            tracing::debug!(path = %self.path.display(), "removing expired session");
            self.teardown()?;
            return Ok(SessionStatus::Expired);
        }
        Ok(SessionStatus::Active(session))
    }

    /// The active session, or an error telling the user to log in.
    pub fn require_active(&self, now: DateTime<Utc>) -> Result<ClientSession, SessionError> {
        match self.init(now)? {
            SessionStatus::Active(session) => Ok(session),
            SessionStatus::Expired => Err(SessionError::Expired),
            SessionStatus::Absent => Err(SessionError::NotLoggedIn),
        }
    }

    pub fn establish(&self, session: &ClientSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Forget the stored session. Returns false if there was none.
    pub fn teardown(&self) -> Result<bool, SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> ClientSession {
        ClientSession {
            token: "abc".to_string(),
            username: "sam".to_string(),
            server: "http://localhost:3000".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_absent_session() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SessionContext::new(dir.path().join("session.json"));
        assert_eq!(ctx.init(Utc::now()).unwrap(), SessionStatus::Absent);
        assert!(matches!(
            ctx.require_active(Utc::now()),
            Err(SessionError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_establish_and_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SessionContext::new(dir.path().join("nested").join("session.json"));
        let now = Utc::now();
        let stored = session(now + Duration::days(1));

        ctx.establish(&stored).unwrap();
        assert_eq!(ctx.init(now).unwrap(), SessionStatus::Active(stored.clone()));
        assert_eq!(ctx.require_active(now).unwrap(), stored);

        assert!(ctx.teardown().unwrap());
        assert!(!ctx.teardown().unwrap());
        assert_eq!(ctx.init(now).unwrap(), SessionStatus::Absent);
    }

    #[test]
    fn test_expired_session_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SessionContext::new(dir.path().join("session.json"));
        let now = Utc::now();
        ctx.establish(&session(now)).unwrap();

        assert_eq!(ctx.init(now).unwrap(), SessionStatus::Expired);
        assert!(!ctx.path().exists());
        assert!(matches!(
            ctx.require_active(now),
            Err(SessionError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_corrupt_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let ctx = SessionContext::new(path);
        assert!(matches!(ctx.init(Utc::now()), Err(SessionError::Corrupt(_))));
    }
}
