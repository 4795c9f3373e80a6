use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState,
    session::{self, Page},
    utils::success_to_api_response,
};

use super::model::{ACCEPTED_EXTENSIONS, MainContent, PageQuery, PageView, UploadHint};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "handetect",
    }))
}

/// Renders the page selected by the `page` query parameter, reconciled
/// with the caller's session.
#[axum::debug_handler]
pub async fn show_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let requested = query.page.as_deref().and_then(Page::from_param);
    if requested.is_none() && query.page.is_some() {
        tracing::debug!("Ignoring unknown page parameter {:?}", query.page);
    }

    let (jar, id, current) = state.sessions.checkout(jar).await;
    let current = session::seed(current, requested);
    state.sessions.store(id, current.clone()).await;

    let main = (current.current_page == Page::Main).then(|| MainContent {
        heading: "Neurological Hand Disorder Detection",
        upload: UploadHint {
            prompt: "Upload a hand image (JPG or PNG)",
            field: "image",
            accepted: ACCEPTED_EXTENSIONS,
            max_bytes: state.config.max_upload_bytes,
        },
        education: state.content.education.clone(),
    });

    (
        jar,
        (
            StatusCode::OK,
            success_to_api_response(PageView::new(&current, main)),
        ),
    )
}
