//! Durable key/value state: the access token and the last order id.
//!
//! These two values are the only thing the storefront persists. They live in
//! a small JSON file so the TUI and the headless CLI share one sign-in.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub last_order_id: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Resolve the session file path: `FARMSTAND_SESSION_PATH` wins, then
/// `$HOME/.farmstand/session.json`, then the working directory.
pub fn default_path() -> PathBuf {
    if let Ok(p) = std::env::var("FARMSTAND_SESSION_PATH") {
        return PathBuf::from(p);
    }
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".farmstand").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("farmstand-session.json"))
}

/// Load the session, treating a missing or unreadable file as signed-out.
pub fn load(path: &Path) -> Session {
    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("[session] {} is not valid JSON ({e}), starting fresh", path.display());
                Session::default()
            }
        },
        Err(_) => Session::default(),
    }
}

pub fn store(path: &Path, session: &Session) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let text = serde_json::to_string_pretty(session)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("farmstand-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_file_means_signed_out() {
        let s = load(Path::new("/nonexistent/farmstand/session.json"));
        assert_eq!(s, Session::default());
        assert!(s.token().is_none());
    }

    #[test]
    fn round_trips_token_and_last_order() {
        let path = temp_file("roundtrip.json");
        let session = Session {
            access_token: Some("tok_123".to_string()),
            last_order_id: Some("ord_998".to_string()),
        };
        store(&path, &session).unwrap();
        assert_eq!(load(&path), session);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let path = temp_file("corrupt.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load(&path), Session::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_token_reads_as_signed_out() {
        let s = Session { access_token: Some(String::new()), last_order_id: None };
        assert!(s.token().is_none());
    }
}
