use super::input::{id, id_str, text, Loose};
use super::{success, ApiError, ApiResult, OrApiError};
use crate::db::slot::SlotRepository;
use crate::models::SlotSchedule;
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
pub struct CreateSlotRequest {
    #[serde(rename = "profesorId")]
    instructor_id: Option<Loose>,
    #[serde(rename = "nombreClase")]
    class_name: Option<String>,
    #[serde(rename = "descripcion")]
    description: Option<String>,
    #[serde(flatten)]
    schedule: ScheduleFields,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleFields {
    #[serde(rename = "fecha")]
    date: Option<String>,
    #[serde(rename = "horaInicio")]
    start_time: Option<String>,
    #[serde(rename = "horaFin")]
    end_time: Option<String>,
    #[serde(rename = "cupos")]
    capacity: Option<Loose>,
}

impl ScheduleFields {
    /// `missing` is reported when a field is absent; malformed values get
    /// their own message.
    fn parse(&self, missing: &str) -> Result<SlotSchedule, ApiError> {
        let (Some(date), Some(start), Some(end), Some(capacity)) = (
            text(self.date.as_deref()),
            text(self.start_time.as_deref()),
            text(self.end_time.as_deref()),
            self.capacity.as_ref(),
        ) else {
            return Err(ApiError::new(missing));
        };
        let capacity = capacity
            .as_i64()
            .ok_or_else(|| ApiError::new("Los cupos deben ser un número entero positivo."))?;

        SlotSchedule::parse(date, start, end, capacity).map_err(|e| ApiError::new(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct InstructorQuery {
    #[serde(rename = "profesorId")]
    instructor_id: Option<String>,
}

/// POST /api/admin/horarios
pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSlotRequest>, JsonRejection>,
) -> ApiResult {
    const MISSING: &str = "Faltan datos para crear horario.";

    let Ok(Json(req)) = payload else {
        return Err(ApiError::new(MISSING));
    };
    let (Some(instructor_id), Some(class_name)) = (id(req.instructor_id.as_ref()), text(req.class_name.as_deref())) else {
        return Err(ApiError::new(MISSING));
    };
    let schedule = req.schedule.parse(MISSING)?;
    let description = req.description.as_deref().unwrap_or("");

    let slot_id = SlotRepository::new(state.db_pool.clone())
        .create(instructor_id, class_name, description, &schedule)
        .await
        .or_api_error("Error al crear horario.")?;

    Ok(success(json!({ "horarioId": slot_id })))
}

/// GET /api/admin/horarios?profesorId=
pub async fn list_instructor_slots(
    State(state): State<Arc<AppState>>,
    query: Result<Query<InstructorQuery>, QueryRejection>,
) -> ApiResult {
    let instructor_id = query
        .ok()
        .and_then(|Query(q)| id_str(q.instructor_id.as_deref()))
        .ok_or_else(|| ApiError::new("Falta profesorId."))?;

    let slots = SlotRepository::new(state.db_pool.clone())
        .list_for_instructor(instructor_id)
        .await
        .or_api_error("Error al obtener horarios del profesor.")?;

    Ok(success(json!({ "horarios": slots })))
}

/// PUT /api/admin/horarios/:id
pub async fn update_slot(
    State(state): State<Arc<AppState>>,
    Path(slot_id): Path<String>,
    payload: Result<Json<ScheduleFields>, JsonRejection>,
) -> ApiResult {
    const MISSING: &str = "Faltan datos para actualizar horario.";

    let Ok(Json(fields)) = payload else {
        return Err(ApiError::new(MISSING));
    };
    let schedule = fields.parse(MISSING)?;
    let slot_id = id_str(Some(&slot_id)).ok_or_else(|| ApiError::new("Horario no encontrado."))?;

    SlotRepository::new(state.db_pool.clone())
        .update(slot_id, &schedule)
        .await
        .or_api_error("Error al actualizar horario.")?;

    Ok(success(json!({})))
}

/// DELETE /api/admin/horarios/:id
pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    Path(slot_id): Path<String>,
) -> ApiResult {
    let slot_id = id_str(Some(&slot_id)).ok_or_else(|| ApiError::new("Horario no encontrado."))?;

    SlotRepository::new(state.db_pool.clone())
        .delete(slot_id)
        .await
        .or_api_error("Error al eliminar horario.")?;

    Ok(success(json!({})))
}
