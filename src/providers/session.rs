//! Marketplace browser session: cookies plus the user agent they were issued
//! to.
//!
//! Sessions are created lazily on first use, shared by every request until
//! they expire, and refreshed early when the marketplace rejects a request
//! as unauthorised.

use std::time::Duration;

use reqwest::header::{SET_COOKIE, USER_AGENT};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_agent: String,
    /// `name=value; name2=value2`, possibly empty.
    pub cookie_header: String,
    pub expires_at: Instant,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Owns the current [`Session`] for one marketplace.
#[derive(Debug)]
pub struct SessionManager {
    client: reqwest::Client,
    url: String,
    user_agent: String,
    ttl: Duration,
    current: Mutex<Option<Session>>,
}

impl SessionManager {
    pub fn new(client: reqwest::Client, url: &str, user_agent: &str, ttl: Duration) -> Self {
        Self {
            client,
            url: url.to_string(),
            user_agent: user_agent.to_string(),
            ttl,
            current: Mutex::new(None),
        }
    }

    /// Return a live session, establishing one if there is none or it has
    /// expired. `None` means no session could be obtained; callers proceed
    /// without cookies.
    pub async fn get(&self) -> Option<Session> {
        let mut current = self.current.lock().await;
        match current.as_ref() {
            Some(session) if !session.is_expired() => Some(session.clone()),
            _ => self.refresh_locked(&mut current).await,
        }
    }

    /// Force a new session regardless of the current one's age.
    pub async fn refresh(&self) -> Option<Session> {
        let mut current = self.current.lock().await;
        self.refresh_locked(&mut current).await
    }

    /// Drop the current session.
    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
    }

    async fn refresh_locked(&self, current: &mut Option<Session>) -> Option<Session> {
        info!(url = %self.url, "refreshing marketplace session");
        match self.fetch().await {
            Ok(session) => {
                *current = Some(session.clone());
                Some(session)
            }
            Err(e) => {
                // Previous session, if any, stays in place.
                warn!(url = %self.url, error = %e, "failed to refresh marketplace session");
                current.clone()
            }
        }
    }

    async fn fetch(&self) -> Result<Session, reqwest::Error> {
        let resp = self
            .client
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?;

        let cookie_header = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(Session {
            user_agent: self.user_agent.clone(),
            cookie_header,
            expires_at: Instant::now() + self.ttl,
        })
    }
}
