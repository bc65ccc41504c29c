//! Session identity and language preference

use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use marquee_core::{DurableStore, Error, Result};
use marquee_storage::TypedStore;

pub(crate) const AUTH_KEY: &str = "auth_user";
pub(crate) const LANGUAGE_KEY: &str = "language";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Display and request language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    /// Tag sent to the remote catalog
    pub fn as_tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(Error::Validation(format!("unsupported language: {other}"))),
        }
    }
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    /// Opaque token, never validated locally
    pub token: String,
}

impl Session {
    fn issue(username: &str, email: &str) -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..9)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect();
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;

        Self {
            id: format!("u-{suffix}"),
            username: username.to_string(),
            email: email.to_string(),
            name: username.to_string(),
            token: format!("tok-{}", to_base36(millis)),
        }
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Process-wide user context, shared by `Arc`
pub struct AppContext<S: DurableStore> {
    store: TypedStore<S>,
    session: RwLock<Option<Session>>,
    language: RwLock<Language>,
}

impl<S: DurableStore> AppContext<S> {
    /// Read session and language from the store
    ///
    /// Unreadable records fall back to no session and English.
    pub fn hydrate(store: TypedStore<S>) -> Self {
        let session = store.load::<Session>(AUTH_KEY).unwrap_or_else(|err| {
            tracing::warn!(target: "marquee", error = %err, "failed to read stored session");
            None
        });
        let language = store
            .load::<Language>(LANGUAGE_KEY)
            .unwrap_or_else(|err| {
                tracing::warn!(target: "marquee", error = %err, "failed to read stored language");
                None
            })
            .unwrap_or_default();

        Self {
            store,
            session: RwLock::new(session),
            language: RwLock::new(language),
        }
    }

    /// Accept any non-blank username and email and persist the session
    pub fn login(&self, username: &str, email: &str) -> Result<Session> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(Error::Validation("username is required".to_string()));
        }
        if email.is_empty() {
            return Err(Error::Validation("email is required".to_string()));
        }

        let session = Session::issue(username, email);
        self.store.save(AUTH_KEY, &session)?;
        *self.session.write() = Some(session.clone());
        tracing::info!(target: "marquee", user = %session.id, "logged in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(AUTH_KEY)?;
        *self.session.write() = None;
        Ok(())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    pub fn language(&self) -> Language {
        *self.language.read()
    }

    /// Switch language and persist the choice
    pub fn set_language(&self, language: Language) -> Result<()> {
        self.store.save(LANGUAGE_KEY, &language)?;
        *self.language.write() = language;
        Ok(())
    }

    pub fn store(&self) -> &TypedStore<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_storage::MemoryStore;

    fn context() -> (MemoryStore, AppContext<MemoryStore>) {
        let raw = MemoryStore::new();
        let ctx = AppContext::hydrate(TypedStore::new(raw.clone()));
        (raw, ctx)
    }

    #[test]
    fn test_defaults_when_store_empty() {
        let (_, ctx) = context();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.language(), Language::En);
    }

    #[test]
    fn test_login_persists_session() {
        let (raw, ctx) = context();
        let session = ctx.login(" neo ", "neo@zion.io").unwrap();

        assert_eq!(session.username, "neo");
        assert_eq!(session.name, "neo");
        assert!(session.id.starts_with("u-"));
        assert_eq!(session.id.len(), 11);
        assert!(session.token.starts_with("tok-"));
        assert!(raw.get("marquee_auth_user").unwrap().is_some());

        let rehydrated = AppContext::hydrate(TypedStore::new(raw));
        assert_eq!(rehydrated.session(), Some(session));
    }

    #[test]
    fn test_blank_login_rejected() {
        let (raw, ctx) = context();
        assert!(ctx.login("   ", "a@b.c").unwrap_err().is_validation());
        assert!(ctx.login("trinity", "").unwrap_err().is_validation());
        assert!(raw.is_empty().unwrap());
    }

    #[test]
    fn test_logout_clears_store() {
        let (raw, ctx) = context();
        ctx.login("neo", "neo@zion.io").unwrap();
        ctx.logout().unwrap();

        assert!(ctx.session().is_none());
        assert!(raw.get("marquee_auth_user").unwrap().is_none());
    }

    #[test]
    fn test_language_round_trips_through_store() {
        let (raw, ctx) = context();
        ctx.set_language(Language::Es).unwrap();
        assert_eq!(raw.get("marquee_language").unwrap().as_deref(), Some("\"es\""));

        let rehydrated = AppContext::hydrate(TypedStore::new(raw));
        assert_eq!(rehydrated.language(), Language::Es);
    }

    #[test]
    fn test_corrupt_records_fall_back() {
        let raw = MemoryStore::new();
        raw.set("marquee_auth_user", "{not json").unwrap();
        raw.set("marquee_language", "\"fr\"").unwrap();

        let ctx = AppContext::hydrate(TypedStore::new(raw.clone()));
        assert!(ctx.session().is_none());
        assert_eq!(ctx.language(), Language::En);
        assert!(raw.is_empty().unwrap());
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Es);
        assert_eq!(Language::En.to_string(), "en");
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
