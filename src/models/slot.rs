use crate::error::BookingError;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[cfg(test)]
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Slot {
    pub id: i64,
    pub class_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i64,
}

/// The four fields an instructor controls on a slot, already validated and
/// normalized so that dates compare correctly as plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSchedule {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i64,
}

impl SlotSchedule {
    pub fn parse(date: &str, start_time: &str, end_time: &str, capacity: i64) -> Result<Self, BookingError> {
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| BookingError::Validation("Fecha no válida, use el formato AAAA-MM-DD.".to_string()))?;
        let start_time = parse_time(start_time)?;
        let end_time = parse_time(end_time)?;

        if capacity <= 0 {
            return Err(BookingError::Validation(
                "Los cupos deben ser un número entero positivo.".to_string(),
            ));
        }

        Ok(Self {
            date: date.format(DATE_FORMAT).to_string(),
            start_time: start_time.format(TIME_FORMAT).to_string(),
            end_time: end_time.format(TIME_FORMAT).to_string(),
            capacity,
        })
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, BookingError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| BookingError::Validation("Hora no válida, use el formato HH:MM.".to_string()))
}

/// Seat accounting for one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct Availability {
    #[serde(rename = "cupos")]
    pub capacity: i64,
    #[serde(rename = "reservados")]
    pub occupied: i64,
    #[serde(rename = "disponibles")]
    pub remaining: i64,
}

impl Availability {
    pub fn new(capacity: i64, occupied: i64) -> Self {
        Self {
            capacity,
            occupied,
            remaining: capacity - occupied,
        }
    }

    pub fn has_room(&self) -> bool {
        self.remaining > 0
    }
}

/// An upcoming slot as shown in the member-facing catalog.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookableSlot {
    pub id: i64,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora_inicio")]
    pub start_time: String,
    #[serde(rename = "hora_fin")]
    pub end_time: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub availability: Availability,
    #[serde(rename = "clase")]
    pub class_name: String,
    #[serde(rename = "clase_id")]
    pub class_id: i64,
    #[serde(rename = "profesor")]
    pub instructor_name: String,
}

/// A slot as listed for the instructor who owns it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InstructorSlot {
    pub id: i64,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora_inicio")]
    pub start_time: String,
    #[serde(rename = "hora_fin")]
    pub end_time: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub availability: Availability,
    #[serde(rename = "clase")]
    pub class_name: String,
    #[serde(rename = "clase_id")]
    pub class_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_date_and_times() {
        let schedule = SlotSchedule::parse("2026-1-5", "9:00", "10:30", 12).unwrap();
        assert_eq!(schedule.date, "2026-01-05");
        assert_eq!(schedule.start_time, "09:00");
        assert_eq!(schedule.end_time, "10:30");
        assert_eq!(schedule.capacity, 12);
    }

    #[test]
    fn test_parse_rejects_malformed_fields() {
        assert!(matches!(
            SlotSchedule::parse("18/11/2026", "14:00", "15:00", 10),
            Err(BookingError::Validation(_))
        ));
        assert!(matches!(
            SlotSchedule::parse("2026-11-18", "2pm", "15:00", 10),
            Err(BookingError::Validation(_))
        ));
        assert!(matches!(
            SlotSchedule::parse("2026-11-18", "14:00", "25:00", 10),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_positive_capacity() {
        assert!(SlotSchedule::parse("2026-11-18", "14:00", "15:00", 0).is_err());
        assert!(SlotSchedule::parse("2026-11-18", "14:00", "15:00", -3).is_err());
    }

    #[test]
    fn test_availability_serializes_with_client_names() {
        let availability = Availability::new(10, 4);
        assert!(availability.has_room());

        let json = serde_json::to_value(availability).unwrap();
        assert_eq!(json["cupos"], 10);
        assert_eq!(json["reservados"], 4);
        assert_eq!(json["disponibles"], 6);
    }

    #[test]
    fn test_full_slot_has_no_room() {
        assert!(!Availability::new(1, 1).has_room());
        assert!(!Availability::default().has_room());
    }
}
