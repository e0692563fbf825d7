//! User profile routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{Tier, UpdateProfileRequest, User};
use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;

/// Recompute a user's tier from their created-event count and persist it if
/// it changed. Idempotent; called on every profile view.
pub(crate) async fn recompute_tier(
    repo: &UserRepository,
    mut user: UserEntity,
) -> Result<UserEntity, sqlx::Error> {
    let derived = Tier::from_created_count(user.created_events.len());
    if derived.as_str() != user.tier {
        repo.set_tier(user.id, derived).await?;
        user.tier = derived.as_str().to_string();
        tracing::info!(
            user_id = %user.id,
            tier = %derived,
            event_count = user.created_events.len(),
            "User tier updated"
        );
    }
    Ok(user)
}

/// Get the authenticated user's profile.
///
/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let user = repo
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let user = recompute_tier(&repo, user).await?;
    Ok(Json(user.into()))
}

/// Get a user's profile.
///
/// GET /api/v1/users/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let user = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let user = recompute_tier(&repo, user).await?;
    Ok(Json(user.into()))
}

/// Update the caller's profile.
///
/// PUT /api/v1/users/:user_id
///
/// Users can only update their own profile; identity and moderation fields
/// are not writable through this endpoint.
pub async fn update_profile(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    if user_auth.user_id != user_id {
        return Err(ApiError::Forbidden(
            "You can only update your own profile".to_string(),
        ));
    }

    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let name = request.name.as_deref().map(str::trim);

    let user = repo
        .update_profile(
            user_id,
            name,
            request.bio.as_deref(),
            request.hashtags.as_deref(),
            request.profile_pic.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user_id, "Profile updated");
    Ok(Json(user.into()))
}
