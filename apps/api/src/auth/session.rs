use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

/// Maps opaque cookie tokens to user ids.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session and returns its token.
    async fn create(&self, user_id: Uuid) -> Result<String, AppError>;
    async fn resolve(&self, token: &str) -> Result<Option<Uuid>, AppError>;
    async fn destroy(&self, token: &str) -> Result<(), AppError>;
}

/// Redis-backed sessions: `session:<token>` → user id, expiring after the configured TTL.
pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    async fn connection(&self) -> Result<MultiplexedConnection, AppError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(e.to_string()))
    }
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Tokens are simple-format UUIDs; anything else is never looked up.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == 32 && token.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: Uuid) -> Result<String, AppError> {
        let token = new_token();
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(session_key(&token))
            .arg(user_id.to_string())
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;
        debug!("Session started for user {user_id}");
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<Uuid>, AppError> {
        if !is_well_formed_token(token) {
            return Ok(None);
        }
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(session_key(token))
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;
        Ok(value.and_then(|raw| Uuid::parse_str(&raw).ok()))
    }

    async fn destroy(&self, token: &str) -> Result<(), AppError> {
        if !is_well_formed_token(token) {
            return Ok(());
        }
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(session_key(token))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default, Clone)]
    pub struct MemorySessionStore {
        sessions: Arc<Mutex<HashMap<String, Uuid>>>,
    }

    impl MemorySessionStore {
        pub fn len(&self) -> usize {
            self.sessions.lock().expect("session mutex poisoned").len()
        }
    }

    #[async_trait]
    impl SessionStore for MemorySessionStore {
        async fn create(&self, user_id: Uuid) -> Result<String, AppError> {
            let token = new_token();
            self.sessions
                .lock()
                .expect("session mutex poisoned")
                .insert(token.clone(), user_id);
            Ok(token)
        }

        async fn resolve(&self, token: &str) -> Result<Option<Uuid>, AppError> {
            Ok(self
                .sessions
                .lock()
                .expect("session mutex poisoned")
                .get(token)
                .copied())
        }

        async fn destroy(&self, token: &str) -> Result<(), AppError> {
            self.sessions
                .lock()
                .expect("session mutex poisoned")
                .remove(token);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tokens_are_well_formed_and_unique() {
        let a = new_token();
        let b = new_token();
        assert!(is_well_formed_token(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        assert!(!is_well_formed_token(""));
        assert!(!is_well_formed_token("session:*"));
        assert!(!is_well_formed_token(&"z".repeat(32)));
    }
}
