use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState,
    error::AppError,
    session::{self, GateEvent, Page},
    utils::{error_with_data_to_api_response, success_to_api_response},
};

use super::model::{CredentialsRequest, GateView, NavigateRequest};

/// 取出会话、执行一次状态转换、再存回去
async fn run_gate(
    state: &AppState,
    jar: CookieJar,
    requested: Option<Page>,
    event: GateEvent,
) -> Response {
    let (jar, id, current) = state.sessions.checkout(jar).await;
    let current = session::seed(current, requested);
    let transition = session::transition(&state.credentials, current, event).await;
    // 回到初始状态（如登出）时 store 会删除条目
    state.sessions.store(id, transition.session.clone()).await;

    match transition.outcome {
        Ok(notice) => {
            let view = GateView::new(&transition.session, notice.map(|n| n.message()));
            (jar, (StatusCode::OK, success_to_api_response(view))).into_response()
        }
        Err(e) => {
            let view = GateView::new(&transition.session, None);
            (
                jar,
                (
                    e.status(),
                    error_with_data_to_api_response(e.code(), e.to_string(), view),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CredentialsRequest>,
) -> impl IntoResponse {
    let event = GateEvent::Submit {
        username: req.username,
        password: req.password,
    };
    run_gate(&state, jar, Some(Page::Login), event).await
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CredentialsRequest>,
) -> impl IntoResponse {
    let event = GateEvent::Submit {
        username: req.username,
        password: req.password,
    };
    run_gate(&state, jar, Some(Page::Register), event).await
}

#[axum::debug_handler]
pub async fn navigate(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<NavigateRequest>,
) -> Response {
    let event = match req.target {
        Page::Login => GateEvent::NavigateLogin,
        Page::Register => GateEvent::NavigateRegister,
        // 主页面只能通过登录进入
        Page::Main => {
            return AppError::InvalidInput("Use login to reach the main page".into())
                .into_response();
        }
    };
    run_gate(&state, jar, None, event).await
}

#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    run_gate(&state, jar, None, GateEvent::Logout).await
}
