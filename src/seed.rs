use crate::db::slot::SlotRepository;
use crate::db::user::UserRepository;
use crate::models::slot::DATE_FORMAT;
use crate::models::{Role, SlotSchedule};
use anyhow::{Context, Result};
use sqlx::SqlitePool;

pub const DEMO_INSTRUCTOR_EMAIL: &str = "profesor@gym.cl";
pub const DEMO_MEMBER_EMAIL: &str = "alumno@gym.cl";
const DEMO_PASSWORD: &str = "1234";

/// Load a demo instructor, a demo member and a class with two slots
/// tomorrow. Does nothing once any user exists.
pub async fn load_demo_data(pool: &SqlitePool) -> Result<()> {
    let users = UserRepository::new(pool.clone());
    if users.count().await? > 0 {
        tracing::info!("Users already present, skipping demo data");
        return Ok(());
    }

    let instructor = users
        .create("Sebastian", DEMO_INSTRUCTOR_EMAIL, DEMO_PASSWORD, Role::Instructor)
        .await
        .context("Failed to create demo instructor")?;
    users
        .create("Alumno Demo", DEMO_MEMBER_EMAIL, DEMO_PASSWORD, Role::Member)
        .await
        .context("Failed to create demo member")?;
    tracing::info!("Created demo instructor and member");

    let date = (chrono::Utc::now().date_naive() + chrono::Days::new(1))
        .format(DATE_FORMAT)
        .to_string();
    let slots = SlotRepository::new(pool.clone());
    for (start, end) in [("14:00", "15:00"), ("15:00", "16:00")] {
        let schedule = SlotSchedule::parse(&date, start, end, 10)?;
        slots
            .create(instructor.id, "Pilates", "Clase de pilates de prueba", &schedule)
            .await
            .context("Failed to create demo slot")?;
    }
    tracing::info!("Created demo class with 2 slots on {}", date);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::CatalogRepository;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_demo_data_is_loaded_once() {
        let pool = test_pool().await;

        load_demo_data(&pool).await.unwrap();
        load_demo_data(&pool).await.unwrap();

        let users = UserRepository::new(pool.clone());
        assert_eq!(users.count().await.unwrap(), 2);
        assert!(users.authenticate(DEMO_INSTRUCTOR_EMAIL, DEMO_PASSWORD).await.is_ok());

        let today = chrono::Utc::now().date_naive();
        let slots = CatalogRepository::new(pool).list_bookable(today, None).await.unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.class_name == "Pilates" && s.availability.remaining == 10));
    }
}
