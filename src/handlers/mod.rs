mod input;
mod auth;
mod reservations;
mod admin;

use crate::error::BookingError;
use crate::AppState;
use axum::{
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Every endpoint of the JSON API. Failures are reported in the body with
/// status 200, which is what the browser client expects.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/horarios", get(reservations::list_bookable_slots))
        .route("/api/reservas", post(reservations::create_reservation))
        .route(
            "/api/reservas/:id",
            get(reservations::list_member_reservations)
                .put(reservations::reschedule_reservation)
                .delete(reservations::cancel_reservation),
        )
        .route(
            "/api/admin/horarios",
            post(admin::create_slot).get(admin::list_instructor_slots),
        )
        .route(
            "/api/admin/horarios/:id",
            put(admin::update_slot).delete(admin::delete_slot),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

pub type ApiResult = Result<Json<Value>, ApiError>;

/// `{ "success": false, "message": ... }`
#[derive(Debug)]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Json(json!({ "success": false, "message": self.message })).into_response()
    }
}

/// Turns a core failure into the message the user will see. Store and
/// hashing failures are logged and replaced by `store_message`; the details never leave the
/// server.
pub trait OrApiError<T> {
    fn or_api_error(self, store_message: &str) -> Result<T, ApiError>;
}

impl<T> OrApiError<T> for Result<T, BookingError> {
    fn or_api_error(self, store_message: &str) -> Result<T, ApiError> {
        self.map_err(|err| match err {
            e @ (BookingError::Store(_) | BookingError::PasswordHash(_)) => {
                tracing::error!("{} {}", store_message, e);
                ApiError::new(store_message)
            }
            other => {
                tracing::debug!("Request rejected: {}", other);
                ApiError::new(other.to_string())
            }
        })
    }
}

impl<T> OrApiError<T> for Result<T, sqlx::Error> {
    fn or_api_error(self, store_message: &str) -> Result<T, ApiError> {
        self.map_err(BookingError::from).or_api_error(store_message)
    }
}

pub fn success(payload: Value) -> Json<Value> {
    let mut body = json!({ "success": true });
    if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), payload) {
        body.extend(fields);
    }
    Json(body)
}
