use super::capacity::OCCUPIED_SEATS_SQL;
use super::class;
use crate::error::{BookingError, BookingResult};
use crate::models::{InstructorSlot, Role, SlotSchedule};
use sqlx::SqlitePool;

pub struct SlotRepository {
    pool: SqlitePool,
}

impl SlotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<crate::models::Slot>, sqlx::Error> {
        sqlx::query_as::<_, crate::models::Slot>("SELECT * FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Schedule a slot under the instructor's class called `class_name`,
    /// creating the class the first time the name is used. Returns the slot id.
    pub async fn create(
        &self,
        instructor_id: i64,
        class_name: &str,
        description: &str,
        schedule: &SlotSchedule,
    ) -> BookingResult<i64> {
        let mut tx = self.pool.begin().await?;

        let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = ?")
            .bind(instructor_id)
            .fetch_optional(&mut *tx)
            .await?;
        match role {
            Some(Role::Instructor) => {}
            Some(Role::Member) => {
                return Err(BookingError::Unauthorized(
                    "Solo un profesor puede crear horarios.".to_string(),
                ))
            }
            None => return Err(BookingError::NotFound("Profesor no encontrado.".to_string())),
        }

        let class_id = class::find_or_create(&mut *tx, instructor_id, class_name.trim(), description.trim()).await?;

        let slot_id = sqlx::query(
            "INSERT INTO slots (class_id, date, start_time, end_time, capacity)
             VALUES (?, ?, ?, ?, ?)"
        )
        .bind(class_id)
        .bind(&schedule.date)
        .bind(&schedule.start_time)
        .bind(&schedule.end_time)
        .bind(schedule.capacity)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        tracing::info!(
            "Instructor {} scheduled slot {} of class {} on {} {}-{} ({} seats)",
            instructor_id,
            slot_id,
            class_id,
            schedule.date,
            schedule.start_time,
            schedule.end_time,
            schedule.capacity
        );
        Ok(slot_id)
    }

    /// Every slot of every class the instructor owns, earliest first.
    /// `remaining` is floored at 0 after a capacity cut.
    pub async fn list_for_instructor(&self, instructor_id: i64) -> Result<Vec<InstructorSlot>, sqlx::Error> {
        let sql = format!(
            "SELECT s.id AS id, s.date AS date, s.start_time AS start_time, s.end_time AS end_time,
                    s.capacity AS capacity, s.occupied AS occupied, MAX(s.capacity - s.occupied, 0) AS remaining,
                    c.name AS class_name, c.id AS class_id
             FROM (SELECT s.*, {OCCUPIED_SEATS_SQL} AS occupied FROM slots s) s
             JOIN classes c ON c.id = s.class_id
             WHERE c.instructor_id = ?
             ORDER BY s.date, s.start_time, s.id"
        );
        sqlx::query_as::<_, InstructorSlot>(&sql)
            .bind(instructor_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Overwrite date, times and capacity. Existing reservations are kept even
    /// if the new capacity is below the current occupancy.
    pub async fn update(&self, slot_id: i64, schedule: &SlotSchedule) -> BookingResult<()> {
        let result = sqlx::query(
            "UPDATE slots SET date = ?, start_time = ?, end_time = ?, capacity = ? WHERE id = ?"
        )
        .bind(&schedule.date)
        .bind(&schedule.start_time)
        .bind(&schedule.end_time)
        .bind(schedule.capacity)
        .bind(slot_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(BookingError::NotFound("Horario no encontrado.".to_string()));
        }
        tracing::info!("Updated slot {}", slot_id);
        Ok(())
    }

    /// Remove the slot. Its reservations stay behind, detached from any slot.
    pub async fn delete(&self, slot_id: i64) -> BookingResult<()> {
        let result = sqlx::query("DELETE FROM slots WHERE id = ?")
            .bind(slot_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BookingError::NotFound("Horario no encontrado.".to_string()));
        }
        tracing::info!("Deleted slot {}", slot_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::reservation::ReservationRepository;
    use crate::db::test_fixtures::{instructor, member, slot_on, slot_with_capacity, tomorrow};
    use crate::db::test_pool;

    fn schedule(date: &str, start: &str, capacity: i64) -> SlotSchedule {
        SlotSchedule::parse(date, start, "23:00", capacity).unwrap()
    }

    #[tokio::test]
    async fn test_same_class_name_is_reused_per_instructor() {
        let pool = test_pool().await;
        let repo = SlotRepository::new(pool.clone());
        let sebastian = instructor(&pool, "sebastian@gym.cl").await;
        let carla = instructor(&pool, "carla@gym.cl").await;

        repo.create(sebastian, "Pilates", "Suelo", &schedule("2030-01-01", "10:00", 5)).await.unwrap();
        repo.create(sebastian, "Pilates", "Otra descripción", &schedule("2030-01-02", "10:00", 5)).await.unwrap();
        repo.create(carla, "Pilates", "", &schedule("2030-01-01", "10:00", 5)).await.unwrap();

        let sebastian_classes = class::get_by_instructor(&pool, sebastian).await.unwrap();
        assert_eq!(sebastian_classes.len(), 1);
        assert_eq!(sebastian_classes[0].description, "Suelo");

        let carla_classes = class::get_by_instructor(&pool, carla).await.unwrap();
        assert_eq!(carla_classes.len(), 1);
        assert_ne!(carla_classes[0].id, sebastian_classes[0].id);

        assert_eq!(repo.list_for_instructor(sebastian).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_instructor(carla).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_an_existing_instructor() {
        let pool = test_pool().await;
        let repo = SlotRepository::new(pool.clone());
        let alumno = member(&pool, "alumno@gym.cl").await;

        assert!(matches!(
            repo.create(999, "Yoga", "", &schedule("2030-01-01", "10:00", 5)).await,
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(
            repo.create(alumno, "Yoga", "", &schedule("2030-01-01", "10:00", 5)).await,
            Err(BookingError::Unauthorized(_))
        ));
        assert!(class::get_by_instructor(&pool, alumno).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_for_instructor_is_ordered_by_date_then_time() {
        let pool = test_pool().await;
        let prof = instructor(&pool, "prof@gym.cl").await;
        let late = slot_on(&pool, prof, "Spinning", "2030-03-02", "18:00", 5).await;
        let early_morning = slot_on(&pool, prof, "Yoga", "2030-03-01", "08:00", 5).await;
        let early_evening = slot_on(&pool, prof, "Spinning", "2030-03-01", "19:00", 5).await;

        let ids: Vec<i64> = SlotRepository::new(pool)
            .list_for_instructor(prof)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![early_morning, early_evening, late]);
    }

    #[tokio::test]
    async fn test_update_overwrites_schedule() {
        let pool = test_pool().await;
        let repo = SlotRepository::new(pool.clone());
        let prof = instructor(&pool, "prof@gym.cl").await;
        let slot = slot_with_capacity(&pool, prof, "Yoga", 5).await;

        repo.update(slot, &schedule("2031-05-05", "07:30", 20)).await.unwrap();

        let stored = repo.get_by_id(slot).await.unwrap().unwrap();
        assert_eq!(stored.date, "2031-05-05");
        assert_eq!(stored.start_time, "07:30");
        assert_eq!(stored.capacity, 20);
    }

    #[tokio::test]
    async fn test_capacity_cut_below_occupancy_floors_remaining() {
        let pool = test_pool().await;
        let repo = SlotRepository::new(pool.clone());
        let reservations = ReservationRepository::new(pool.clone());
        let prof = instructor(&pool, "prof@gym.cl").await;
        let slot = slot_with_capacity(&pool, prof, "Yoga", 3).await;
        for email in ["m1@gym.cl", "m2@gym.cl", "m3@gym.cl"] {
            let alumno = member(&pool, email).await;
            reservations.reserve(alumno, slot).await.unwrap();
        }

        repo.update(slot, &schedule(&tomorrow(), "10:00", 1)).await.unwrap();

        let listed = repo.list_for_instructor(prof).await.unwrap();
        assert_eq!(listed[0].availability.capacity, 1);
        assert_eq!(listed[0].availability.occupied, 3);
        assert_eq!(listed[0].availability.remaining, 0);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_slot_are_not_found() {
        let repo = SlotRepository::new(test_pool().await);

        assert!(matches!(
            repo.update(42, &schedule(&tomorrow(), "10:00", 5)).await,
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(repo.delete(42).await, Err(BookingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_leaves_reservations_orphaned() {
        let pool = test_pool().await;
        let repo = SlotRepository::new(pool.clone());
        let reservations = ReservationRepository::new(pool.clone());
        let prof = instructor(&pool, "prof@gym.cl").await;
        let alumno = member(&pool, "alumno@gym.cl").await;
        let slot = slot_with_capacity(&pool, prof, "Yoga", 5).await;
        let reservation = reservations.reserve(alumno, slot).await.unwrap();

        repo.delete(slot).await.unwrap();

        assert!(repo.get_by_id(slot).await.unwrap().is_none());
        let orphan = reservations.get_by_id(reservation).await.unwrap().unwrap();
        assert_eq!(orphan.slot_id, None);
        assert!(reservations.list_for_member(alumno).await.unwrap().is_empty());
    }
}
