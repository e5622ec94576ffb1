use axum::Json;
use catalyst_core::models::school::Profile;

use crate::middleware::auth::Session;

pub async fn get_profile(session: Session) -> Json<Profile> {
    Json(session.profile)
}
