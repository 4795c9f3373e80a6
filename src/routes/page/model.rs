use serde::{Deserialize, Serialize};

use crate::content::Education;
use crate::session::{Page, Session};

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadHint {
    pub prompt: &'static str,
    pub field: &'static str,
    pub accepted: [&'static str; 3],
    pub max_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct MainContent {
    pub heading: &'static str,
    pub upload: UploadHint,
    pub education: Education,
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: &'static str,
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<MainContent>,
}

impl PageView {
    pub fn new(session: &Session, main: Option<MainContent>) -> Self {
        let title = match session.current_page {
            Page::Login => "Login Page",
            Page::Register => "Register Page",
            Page::Main => "Neurological Hand Disorder Detection",
        };
        Self {
            page: session.current_page,
            title,
            username: session.username.clone(),
            main,
        }
    }
}
