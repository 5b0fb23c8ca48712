use super::input::text;
use super::{success, ApiError, ApiResult, OrApiError};
use crate::db::user::UserRepository;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult {
    let Ok(Json(req)) = payload else {
        return Err(ApiError::new("Faltan datos"));
    };
    let (Some(name), Some(email), Some(password)) = (
        text(req.name.as_deref()),
        text(req.email.as_deref()),
        req.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::new("Faltan datos"));
    };

    let user = UserRepository::new(state.db_pool.clone())
        .register_member(name, email, password)
        .await
        .or_api_error("Error al registrar usuario.")?;

    Ok(success(json!({ "user": user })))
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult {
    let Ok(Json(req)) = payload else {
        return Err(ApiError::new("Credenciales incorrectas."));
    };
    let (Some(email), Some(password)) = (text(req.email.as_deref()), req.password.as_deref()) else {
        return Err(ApiError::new("Credenciales incorrectas."));
    };

    let user = UserRepository::new(state.db_pool.clone())
        .authenticate(email, password)
        .await
        .or_api_error("Error en el login.")?;

    tracing::info!("User {} logged in", user.id);
    Ok(success(json!({ "user": user })))
}
