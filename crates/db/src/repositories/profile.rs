use crate::models::DbProfile;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_profile(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<DbProfile>> {
    tracing::debug!("Getting profile for user: {}", user_id);

    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        SELECT user_id, school_id, role, first_name, last_name, email
        FROM profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if profile.is_none() {
        tracing::debug!("No profile for user: {}", user_id);
    }

    Ok(profile)
}
