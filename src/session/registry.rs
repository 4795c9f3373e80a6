use std::collections::HashMap;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Session;

pub const SESSION_COOKIE: &str = "session_id";

/// In-memory holding area for sessions between requests.
///
/// Keyed by the `session_id` cookie; nothing survives a restart. Only
/// sessions that differ from [`Session::default`] occupy an entry, so
/// anonymous visitors on the login page cost nothing.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出会话；没有有效 cookie 时签发新的会话 ID
    pub async fn checkout(&self, jar: CookieJar) -> (CookieJar, Uuid, Session) {
        if let Some(id) = session_id(&jar) {
            let session = self
                .sessions
                .read()
                .await
                .get(&id)
                .cloned()
                .unwrap_or_default();
            return (jar, id, session);
        }

        let id = Uuid::new_v4();
        tracing::debug!("Issuing session {}", id);
        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), id, Session::default())
    }

    /// Read-only lookup; unknown or missing ids resolve to `None`.
    pub async fn get(&self, jar: &CookieJar) -> Option<Session> {
        let id = session_id(jar)?;
        self.sessions.read().await.get(&id).cloned()
    }

    /// Saves the session. A default session drops the entry instead.
    pub async fn store(&self, id: Uuid, session: Session) {
        if session == Session::default() {
            self.remove(id).await;
            return;
        }
        self.sessions.write().await.insert(id, session);
    }

    pub async fn remove(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&id)
    }

    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Page;

    #[tokio::test]
    async fn checkout_issues_cookie_for_new_visitors() {
        let registry = SessionRegistry::new();
        let (jar, id, session) = registry.checkout(CookieJar::new()).await;

        assert_eq!(session, Session::default());
        assert_eq!(jar.get(SESSION_COOKIE).unwrap().value(), id.to_string());
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn stored_sessions_come_back_by_cookie() {
        let registry = SessionRegistry::new();
        let (jar, id, mut session) = registry.checkout(CookieJar::new()).await;
        session.current_page = Page::Register;
        registry.store(id, session.clone()).await;

        let (_, same_id, again) = registry.checkout(jar.clone()).await;
        assert_eq!(same_id, id);
        assert_eq!(again, session);
        assert_eq!(registry.get(&jar).await, Some(session));
    }

    #[tokio::test]
    async fn default_sessions_are_not_kept() {
        let registry = SessionRegistry::new();
        let (jar, id, mut session) = registry.checkout(CookieJar::new()).await;
        registry.store(id, session.clone()).await;
        assert_eq!(registry.count().await, 0);

        session.current_page = Page::Register;
        registry.store(id, session).await;
        assert_eq!(registry.count().await, 1);

        registry.store(id, Session::default()).await;
        assert_eq!(registry.count().await, 0);

        // 已签发但未保存的 ID 继续沿用，不再重复下发 cookie
        let (_, same_id, again) = registry.checkout(jar).await;
        assert_eq!(same_id, id);
        assert_eq!(again, Session::default());
    }

    #[tokio::test]
    async fn remove_forgets_the_session() {
        let registry = SessionRegistry::new();
        let (jar, id, mut session) = registry.checkout(CookieJar::new()).await;
        session.current_page = Page::Register;
        registry.store(id, session.clone()).await;

        assert_eq!(registry.remove(id).await, Some(session));
        assert_eq!(registry.get(&jar).await, None);
    }

    #[tokio::test]
    async fn garbage_cookie_gets_fresh_session() {
        let registry = SessionRegistry::new();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not-a-uuid"));

        assert_eq!(registry.get(&jar).await, None);
        let (jar, id, _) = registry.checkout(jar).await;
        assert_eq!(jar.get(SESSION_COOKIE).unwrap().value(), id.to_string());
    }
}
