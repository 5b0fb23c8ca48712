use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `Active` may move between slots; `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[serde(rename = "activa")]
    Active,
    #[serde(rename = "cancelada")]
    Cancelled,
}

#[cfg(test)]
#[derive(Debug, Clone, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    /// `None` once the slot it pointed at has been deleted.
    pub slot_id: Option<i64>,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A member's reservation joined with the slot, class and instructor it refers to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MemberReservation {
    pub id: i64,
    #[serde(rename = "estado")]
    pub status: ReservationStatus,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora_inicio")]
    pub start_time: String,
    #[serde(rename = "hora_fin")]
    pub end_time: String,
    #[serde(rename = "horario_id")]
    pub slot_id: i64,
    #[serde(rename = "clase")]
    pub class_name: String,
    #[serde(rename = "clase_id")]
    pub class_id: i64,
    #[serde(rename = "profesor")]
    pub instructor_name: String,
}
