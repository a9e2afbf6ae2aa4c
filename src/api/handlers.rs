use crate::api::{pages, AppState};
use crate::utils::error::RelayError;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

/// 1x1 transparent GIF.
pub static PIXEL_GIF: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0xff, 0x00, 0xff, 0xff,
    0xff, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x4c, 0x01, 0x00, 0x3b,
];

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    pub item_id: Option<String>,
}

/// Maps relay errors onto HTTP responses.
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_client_error() {
            tracing::debug!("Rejected request: {}", self.0);
            let message = match self.0 {
                RelayError::ValidationError { message } => message,
                other => other.to_string(),
            };
            return (StatusCode::BAD_REQUEST, message).into_response();
        }

        tracing::error!("Request failed ({:?}): {}", self.0.category(), self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

pub fn pixel_response() -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        PIXEL_GIF.as_slice(),
    )
        .into_response()
}

/// GET /track?item_id=...
pub async fn track(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Response, ApiError> {
    let outcome = state.tracker.track(query.item_id.as_deref()).await?;
    // forwarding keeps running detached
    drop(outcome.forwarding);
    Ok(pixel_response())
}

/// GET /current-tags
pub async fn current_tags(State(state): State<AppState>) -> Html<String> {
    let items = state.tracker.store().snapshot().await;
    let rows = state.listing.render(&items).await;
    Html(pages::listing_page(&rows))
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Html<String> {
    let items = state.tracker.store().snapshot().await;
    Html(pages::status_page(&items, state.started_at))
}

/// GET / and /home
pub async fn home() -> Html<String> {
    Html(pages::home_page())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_bad_request() {
        let response = ApiError::from(RelayError::ValidationError {
            message: "Item ID is required".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let response =
            ApiError::from(RelayError::IoError(std::io::Error::other("boom"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_pixel_response_headers() {
        let response = pixel_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/gif");
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "no-cache, no-store, must-revalidate"
        );
    }
}
