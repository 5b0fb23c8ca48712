use crate::models::Availability;
use sqlx::SqliteExecutor;

/// Active reservations of the slot aliased `s`.
pub const OCCUPIED_SEATS_SQL: &str =
    "(SELECT COUNT(*) FROM reservations r WHERE r.slot_id = s.id AND r.status = 'active')";

/// Pool-backed entry point to `availability_with`; the booking paths call
/// the function directly inside their own statements or transactions.
#[cfg(test)]
pub struct CapacityRepository {
    pool: sqlx::SqlitePool,
}

#[cfg(test)]
impl CapacityRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn availability(&self, slot_id: i64) -> Result<Availability, sqlx::Error> {
        availability_with(&self.pool, slot_id).await
    }
}

/// Seat accounting for a slot. An unknown slot reports `{0, 0, 0}`
/// instead of failing. `remaining` is not clamped here.
pub async fn availability_with<'e, E>(executor: E, slot_id: i64) -> Result<Availability, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT s.capacity, {OCCUPIED_SEATS_SQL} AS occupied FROM slots s WHERE s.id = ?");
    let row = sqlx::query_as::<_, (i64, i64)>(&sql)
        .bind(slot_id)
        .fetch_optional(executor)
        .await?;

    Ok(row
        .map(|(capacity, occupied)| Availability::new(capacity, occupied))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_fixtures::{instructor, member, slot_with_capacity};
    use crate::db::reservation::ReservationRepository;

    #[tokio::test]
    async fn test_unknown_slot_is_empty() {
        let pool = crate::db::test_pool().await;
        let repo = CapacityRepository::new(pool);

        assert_eq!(repo.availability(999).await.unwrap(), Availability::new(0, 0));
    }

    #[tokio::test]
    async fn test_counts_only_active_reservations() {
        let pool = crate::db::test_pool().await;
        let prof = instructor(&pool, "prof@gym.cl").await;
        let slot = slot_with_capacity(&pool, prof, "Yoga", 3).await;
        let reservations = ReservationRepository::new(pool.clone());

        let m1 = member(&pool, "m1@gym.cl").await;
        let m2 = member(&pool, "m2@gym.cl").await;
        let first = reservations.reserve(m1, slot).await.unwrap();
        reservations.reserve(m2, slot).await.unwrap();
        reservations.cancel(first).await.unwrap();

        let availability = CapacityRepository::new(pool).availability(slot).await.unwrap();
        assert_eq!(availability.capacity, 3);
        assert_eq!(availability.occupied, 1);
        assert_eq!(availability.remaining, 2);
    }
}
