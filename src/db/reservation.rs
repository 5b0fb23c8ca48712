use super::capacity::availability_with;
use crate::error::{missing_reference, BookingError, BookingResult};
use crate::models::MemberReservation;
use sqlx::SqlitePool;

/// Creates, cancels and moves reservations. Every capacity check happens in
/// the same statement as the write it guards, so a slot can never end up
/// with more active reservations than seats, however many requests race.
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<crate::models::Reservation>, sqlx::Error> {
        sqlx::query_as::<_, crate::models::Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Book one seat of `slot_id` for `user_id`. Returns the reservation id.
    ///
    /// The row is only inserted when the slot exists and still has a free
    /// seat; an unknown slot therefore counts as full.
    pub async fn reserve(&self, user_id: i64, slot_id: i64) -> BookingResult<i64> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO reservations (user_id, slot_id, status, created_at, updated_at)
             SELECT ?1, s.id, 'active', ?3, ?3
             FROM slots s
             WHERE s.id = ?2
               AND (SELECT COUNT(*) FROM reservations r
                    WHERE r.slot_id = s.id AND r.status = 'active') < s.capacity"
        )
        .bind(user_id)
        .bind(slot_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_reference(e, "Usuario no encontrado."))?;

        if result.rows_affected() == 0 {
            tracing::warn!("Slot {} is full, rejected reservation for user {}", slot_id, user_id);
            return Err(BookingError::CapacityExceeded(
                "No quedan cupos disponibles en este horario.".to_string(),
            ));
        }

        let reservation_id = result.last_insert_rowid();
        tracing::info!("User {} reserved slot {} (reservation {})", user_id, slot_id, reservation_id);
        Ok(reservation_id)
    }

    /// Cancel an active reservation, giving its seat back.
    pub async fn cancel(&self, reservation_id: i64) -> BookingResult<()> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            "UPDATE reservations SET status = 'cancelled', updated_at = ?
             WHERE id = ? AND status = 'active'"
        )
        .bind(now)
        .bind(reservation_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(BookingError::NotFound("Reserva no encontrada.".to_string()));
        }
        tracing::info!("Cancelled reservation {}", reservation_id);
        Ok(())
    }

    /// Move an active reservation to `new_slot_id`. The seat is released on
    /// the old slot and taken on the new one by a single update, so no reader
    /// ever sees it in both slots or in neither.
    pub async fn reschedule(&self, reservation_id: i64, new_slot_id: i64) -> BookingResult<()> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE reservations SET slot_id = ?1, updated_at = ?3
             WHERE id = ?2 AND status = 'active'
               AND (SELECT COUNT(*) FROM reservations r
                    WHERE r.slot_id = ?1 AND r.status = 'active')
                   < (SELECT capacity FROM slots WHERE id = ?1)"
        )
        .bind(new_slot_id)
        .bind(reservation_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Same transaction as the update, so this reads the state it saw.
            let target = availability_with(&mut *tx, new_slot_id).await?;
            if !target.has_room() {
                tracing::warn!("Slot {} is full, reservation {} not moved", new_slot_id, reservation_id);
                return Err(BookingError::CapacityExceeded(
                    "No quedan cupos en el nuevo horario.".to_string(),
                ));
            }
            return Err(BookingError::NotFound("Reserva no encontrada.".to_string()));
        }

        tx.commit().await?;
        tracing::info!("Moved reservation {} to slot {}", reservation_id, new_slot_id);
        Ok(())
    }

    /// All reservations of a member, cancelled ones included, earliest slot
    /// first. Reservations whose slot was deleted are not listed.
    pub async fn list_for_member(&self, user_id: i64) -> Result<Vec<MemberReservation>, sqlx::Error> {
        sqlx::query_as::<_, MemberReservation>(
            "SELECT r.id AS id, r.status AS status,
                    s.date AS date, s.start_time AS start_time, s.end_time AS end_time,
                    s.id AS slot_id, c.name AS class_name, c.id AS class_id,
                    u.name AS instructor_name
             FROM reservations r
             JOIN slots s ON s.id = r.slot_id
             JOIN classes c ON c.id = s.class_id
             JOIN users u ON u.id = c.instructor_id
             WHERE r.user_id = ?
             ORDER BY s.date, s.start_time, r.id"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
