//! Login/registration gate.
//!
//! The gate is a plain state machine: a [`Session`] value goes in together
//! with a [`GateEvent`], the next [`Session`] comes back out. Nothing here
//! renders or stores sessions; see [`registry`] for the latter.

mod registry;

pub use registry::{SESSION_COOKIE, SessionRegistry};

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Login,
    Register,
    Main,
}

impl Page {
    /// Parses the external navigation parameter. Unknown values yield `None`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "login" => Some(Page::Login),
            "register" => Some(Page::Register),
            "main" => Some(Page::Main),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    pub authenticated: bool,
    pub username: Option<String>,
    pub current_page: Page,
}

#[derive(Debug, Clone)]
pub enum GateEvent {
    Submit { username: String, password: String },
    NavigateRegister,
    NavigateLogin,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    LoggedIn,
    Registered,
    LoggedOut,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::LoggedIn => "Login successful",
            Notice::Registered => "Registration successful! Please login.",
            Notice::LoggedOut => "Logged out",
        }
    }
}

#[derive(Debug)]
pub struct Transition {
    pub session: Session,
    pub outcome: Result<Option<Notice>, AppError>,
}

impl Transition {
    fn stay(session: Session) -> Self {
        Self {
            session,
            outcome: Ok(None),
        }
    }

    fn to(session: Session, notice: Notice) -> Self {
        Self {
            session,
            outcome: Ok(Some(notice)),
        }
    }

    fn fail(session: Session, error: AppError) -> Self {
        Self {
            session,
            outcome: Err(error),
        }
    }
}

/// Reconciles an externally requested page with the session flag.
///
/// Authenticated sessions always see `Main`. Otherwise only `Login` and
/// `Register` are honoured; a request for `Main` is forced to `Login`.
/// Without a request the session keeps its current page.
pub fn resolve_view(session: &Session, requested: Option<Page>) -> Page {
    if session.authenticated {
        return Page::Main;
    }
    match requested.unwrap_or(session.current_page) {
        Page::Register => Page::Register,
        Page::Login | Page::Main => Page::Login,
    }
}

/// Seeds the session's page from the navigation parameter.
pub fn seed(mut session: Session, requested: Option<Page>) -> Session {
    session.current_page = resolve_view(&session, requested);
    session
}

pub async fn transition(store: &CredentialStore, session: Session, event: GateEvent) -> Transition {
    match (session.current_page, event) {
        // 已登录时再次提交：密码正确则切换为该用户，错误则保持原会话
        (Page::Login | Page::Main, GateEvent::Submit { username, password }) => {
            match store.verify(&username, &password).await {
                Ok(true) => {
                    tracing::info!("User {} logged in", username);
                    Transition::to(
                        Session {
                            authenticated: true,
                            username: Some(username),
                            current_page: Page::Main,
                        },
                        Notice::LoggedIn,
                    )
                }
                Ok(false) => {
                    tracing::warn!("Rejected login for {}", username);
                    Transition::fail(session, AppError::InvalidCredentials)
                }
                Err(e) => Transition::fail(session, e),
            }
        }
        (Page::Login, GateEvent::NavigateRegister) => Transition::stay(Session {
            current_page: Page::Register,
            ..session
        }),
        (Page::Register, GateEvent::NavigateLogin) => Transition::stay(Session {
            current_page: Page::Login,
            ..session
        }),
        (Page::Register, GateEvent::Submit { username, password }) => {
            if username.trim().is_empty() {
                return Transition::fail(
                    session,
                    AppError::InvalidInput("Username must not be empty".into()),
                );
            }
            if password.is_empty() {
                return Transition::fail(
                    session,
                    AppError::InvalidInput("Password must not be empty".into()),
                );
            }
            // 注册成功后停留在注册页，由用户自行返回登录页
            match store.register(&username, &password).await {
                Ok(()) => Transition::to(session, Notice::Registered),
                Err(e) => Transition::fail(session, e),
            }
        }
        (Page::Main, GateEvent::Logout) => {
            tracing::info!(
                "User {} logged out",
                session.username.as_deref().unwrap_or_default()
            );
            Transition::to(Session::default(), Notice::LoggedOut)
        }
        (_, event) => {
            tracing::debug!(
                "Ignoring {} on page {:?}",
                event_name(&event),
                session.current_page
            );
            Transition::stay(session)
        }
    }
}

// 避免把密码写进日志
fn event_name(event: &GateEvent) -> &'static str {
    match event {
        GateEvent::Submit { .. } => "submit",
        GateEvent::NavigateRegister => "navigate_register",
        GateEvent::NavigateLogin => "navigate_login",
        GateEvent::Logout => "logout",
    }
}
