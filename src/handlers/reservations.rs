use super::input::{id, id_str, text, Loose};
use super::{success, ApiError, ApiResult, OrApiError};
use crate::db::catalog::CatalogRepository;
use crate::db::reservation::ReservationRepository;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(rename = "claseId")]
    class_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    #[serde(rename = "usuarioId")]
    user_id: Option<Loose>,
    #[serde(rename = "horarioId")]
    slot_id: Option<Loose>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    #[serde(rename = "nuevoHorarioId")]
    new_slot_id: Option<Loose>,
}

/// GET /api/horarios
pub async fn list_bookable_slots(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult {
    let Ok(Query(query)) = query else {
        return Err(ApiError::new("Clase no válida."));
    };
    let class_id = match text(query.class_id.as_deref()) {
        None => None,
        Some(raw) => Some(id_str(Some(raw)).ok_or_else(|| ApiError::new("Clase no válida."))?),
    };

    let today = chrono::Utc::now().date_naive();
    let slots = CatalogRepository::new(state.db_pool.clone())
        .list_bookable(today, class_id)
        .await
        .or_api_error("Error al obtener horarios.")?;

    Ok(success(json!({ "horarios": slots })))
}

/// POST /api/reservas
pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> ApiResult {
    let Ok(Json(req)) = payload else {
        return Err(ApiError::new("Datos incompletos."));
    };
    let (Some(user_id), Some(slot_id)) = (id(req.user_id.as_ref()), id(req.slot_id.as_ref())) else {
        return Err(ApiError::new("Datos incompletos."));
    };

    let reservation_id = ReservationRepository::new(state.db_pool.clone())
        .reserve(user_id, slot_id)
        .await
        .or_api_error("Error al registrar reserva.")?;

    Ok(success(json!({ "reservaId": reservation_id })))
}

/// GET /api/reservas/:usuarioId
pub async fn list_member_reservations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult {
    let user_id = id_str(Some(&user_id)).ok_or_else(|| ApiError::new("Usuario no válido."))?;

    let reservations = ReservationRepository::new(state.db_pool.clone())
        .list_for_member(user_id)
        .await
        .or_api_error("Error al obtener reservas.")?;

    Ok(success(json!({ "reservas": reservations })))
}

/// DELETE /api/reservas/:id
pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> ApiResult {
    let reservation_id = id_str(Some(&reservation_id)).ok_or_else(|| ApiError::new("Reserva no encontrada."))?;

    ReservationRepository::new(state.db_pool.clone())
        .cancel(reservation_id)
        .await
        .or_api_error("Error al cancelar reserva.")?;

    Ok(success(json!({})))
}

/// PUT /api/reservas/:id
pub async fn reschedule_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
    payload: Result<Json<RescheduleRequest>, JsonRejection>,
) -> ApiResult {
    let new_slot_id = payload
        .ok()
        .and_then(|Json(req)| id(req.new_slot_id.as_ref()))
        .ok_or_else(|| ApiError::new("Falta el nuevo horario."))?;
    let reservation_id = id_str(Some(&reservation_id)).ok_or_else(|| ApiError::new("Reserva no encontrada."))?;

    ReservationRepository::new(state.db_pool.clone())
        .reschedule(reservation_id, new_slot_id)
        .await
        .or_api_error("Error al cambiar la hora.")?;

    Ok(success(json!({})))
}
