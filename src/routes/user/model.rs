use serde::{Deserialize, Serialize};

use crate::session::{Page, Session};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub target: Page,
}

/// What the browser needs after any gate action: where it is now and an
/// optional inline notice.
#[derive(Debug, Serialize)]
pub struct GateView {
    pub page: Page,
    pub authenticated: bool,
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

impl GateView {
    pub fn new(session: &Session, notice: Option<&'static str>) -> Self {
        Self {
            page: session.current_page,
            authenticated: session.authenticated,
            username: session.username.clone(),
            notice,
        }
    }
}
