use crate::auth::{hash_password, verify_password};
use crate::error::{duplicate_key, BookingError, BookingResult};
use crate::models::{PublicUser, Role, User};
use sqlx::SqlitePool;

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }

    /// Store a new user. The email is the unique key.
    pub async fn create(&self, name: &str, email: &str, password: &str, role: Role) -> BookingResult<PublicUser> {
        let now = chrono::Utc::now().timestamp();
        let password_hash = hash_password(password).map_err(BookingError::PasswordHash)?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *"
        )
        .bind(name.trim())
        .bind(normalize_email(email))
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_key(e, "El email ya está registrado."))?;

        tracing::info!("Registered user {} ({:?})", user.id, user.role);
        Ok(user.into())
    }

    /// Self-service registration always yields a member account.
    pub async fn register_member(&self, name: &str, email: &str, password: &str) -> BookingResult<PublicUser> {
        self.create(name, email, password, Role::Member).await
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> BookingResult<PublicUser> {
        match self.get_by_email(email).await? {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user.into()),
            _ => Err(BookingError::Unauthorized("Credenciales incorrectas.".to_string())),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
