use sqlx::SqliteExecutor;

/// Id of the instructor's class with this name, inserting it first if it
/// does not exist yet. One statement, so two concurrent callers can never
/// produce two rows. The description of an existing class is left as is.
pub async fn find_or_create<'e, E>(
    executor: E,
    instructor_id: i64,
    name: &str,
    description: &str,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO classes (name, description, instructor_id)
         VALUES (?, ?, ?)
         ON CONFLICT (name, instructor_id) DO UPDATE SET name = excluded.name
         RETURNING id"
    )
    .bind(name)
    .bind(description)
    .bind(instructor_id)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
pub async fn get_by_instructor(
    pool: &sqlx::SqlitePool,
    instructor_id: i64,
) -> Result<Vec<crate::models::Class>, sqlx::Error> {
    sqlx::query_as::<_, crate::models::Class>("SELECT * FROM classes WHERE instructor_id = ? ORDER BY name")
        .bind(instructor_id)
        .fetch_all(pool)
        .await
}
