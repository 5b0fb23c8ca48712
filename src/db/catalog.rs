use super::capacity::OCCUPIED_SEATS_SQL;
use crate::models::slot::DATE_FORMAT;
use crate::models::BookableSlot;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Slots dated `today` or later, optionally restricted to one class,
    /// earliest first. `disponibles` is never reported below zero here.
    pub async fn list_bookable(&self, today: NaiveDate, class_id: Option<i64>) -> Result<Vec<BookableSlot>, sqlx::Error> {
        let sql = format!(
            "SELECT s.id AS id, s.date AS date, s.start_time AS start_time, s.end_time AS end_time,
                    s.capacity AS capacity, s.occupied AS occupied,
                    MAX(s.capacity - s.occupied, 0) AS remaining,
                    c.name AS class_name, c.id AS class_id, u.name AS instructor_name
             FROM (SELECT s.*, {OCCUPIED_SEATS_SQL} AS occupied FROM slots s) s
             JOIN classes c ON c.id = s.class_id
             JOIN users u ON u.id = c.instructor_id
             WHERE s.date >= ?1 AND (?2 IS NULL OR s.class_id = ?2)
             ORDER BY s.date, s.start_time, s.id"
        );
        sqlx::query_as::<_, BookableSlot>(&sql)
            .bind(today.format(DATE_FORMAT).to_string())
            .bind(class_id)
            .fetch_all(&self.pool)
            .await
    }
}
