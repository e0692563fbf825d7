//! Event routes: creation with companion chat-room provisioning, listings,
//! and approval.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::users::recompute_tier;
use domain::models::{ChatRoom, CreateEventRequest, Event, EventStatus};
use persistence::entities::{ChatEntity, EventEntity};
use persistence::repositories::{ChatRepository, EventRepository, NewEvent, UserRepository};

/// Response body for event creation.
///
/// `chat_room` is null in the rare case that companion-room provisioning
/// failed twice; the event still exists and the room can be provisioned
/// later through the idempotent creation path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    pub event: Event,
    pub chat_room: Option<ChatRoom>,
}

/// Provision the companion chat room, retrying once on failure.
async fn provision_room(
    chats: &ChatRepository,
    event: &EventEntity,
    creator_id: Uuid,
) -> Option<ChatEntity> {
    for attempt in 1..=2 {
        match chats.create_for_event(event, creator_id).await {
            Ok(chat) => return Some(chat),
            Err(e) => {
                tracing::warn!(
                    event_id = %event.id,
                    attempt,
                    error = %e,
                    "Companion chat room creation failed"
                );
            }
        }
    }
    None
}

/// Create a new event and its companion chat room.
///
/// POST /api/v1/events
///
/// The event is admitted on creation (auto-approval policy). The creator
/// becomes the sole member, and admin, of the companion room.
pub async fn create_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    request.validate()?;

    let start_time = request
        .parsed_start_time()
        .ok_or_else(|| ApiError::Validation("Invalid start time".to_string()))?;
    let end_time = request
        .parsed_end_time()
        .ok_or_else(|| ApiError::Validation("Invalid end time".to_string()))?;

    let events = EventRepository::new(state.pool.clone());
    let chats = ChatRepository::new(state.pool.clone());
    let users = UserRepository::new(state.pool.clone());

    let event = events
        .create(NewEvent {
            sport: &request.sport,
            location: &request.location,
            event_date: request.event_date,
            start_time,
            end_time,
            description: &request.description,
            screenshot: request.screenshot.as_deref(),
            creator_id: user_auth.user_id,
            total_participants: request.total_participants,
        })
        .await?;

    users
        .append_created_event(user_auth.user_id, event.id)
        .await?;

    let chat_room = provision_room(&chats, &event, user_auth.user_id).await;

    // Tier recomputation is best-effort; a failure must not lose the event.
    match users.find_by_id(user_auth.user_id).await {
        Ok(Some(user)) => {
            if let Err(e) = recompute_tier(&users, user).await {
                tracing::warn!(user_id = %user_auth.user_id, error = %e, "Tier recomputation failed");
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(user_id = %user_auth.user_id, error = %e, "Tier recomputation failed");
        }
    }

    tracing::info!(
        event_id = %event.id,
        sport = %event.sport,
        creator_id = %user_auth.user_id,
        chat_created = chat_room.is_some(),
        "Event created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            event: event.into(),
            chat_room: chat_room.map(Into::into),
        }),
    ))
}

/// List all events, newest first.
///
/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepository::new(state.pool.clone()).list_all().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// List admitted events that still have open slots.
///
/// GET /api/v1/events/open
pub async fn list_open_events(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepository::new(state.pool.clone()).list_open().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// List the caller's events.
///
/// GET /api/v1/events/mine
pub async fn list_my_events(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepository::new(state.pool.clone())
        .list_by_creator(user_auth.user_id)
        .await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Get a single event.
///
/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepository::new(state.pool.clone())
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
    Ok(Json(event.into()))
}

/// Ensure the companion chat room exists for an event.
///
/// POST /api/v1/events/:event_id/chat
///
/// Idempotent: returns the existing room when one was already provisioned.
/// Used to repair events whose room creation failed at creation time; the
/// caller becomes the room admin only when the room does not exist yet and
/// the caller created the event.
pub async fn ensure_chat(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ChatRoom>, ApiError> {
    let event = EventRepository::new(state.pool.clone())
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    if event.creator_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the event creator can provision its chat room".to_string(),
        ));
    }

    let chat = ChatRepository::new(state.pool.clone())
        .create_for_event(&event, event.creator_id)
        .await?;

    Ok(Json(chat.into()))
}

/// Admit a specific event.
///
/// POST /api/v1/events/:event_id/approve
pub async fn approve_event(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepository::new(state.pool.clone())
        .set_status(event_id, EventStatus::Admitted)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    tracing::info!(event_id = %event_id, "Event admitted");
    Ok(Json(event.into()))
}

/// Admit the caller's most recent pending event, if any.
///
/// POST /api/v1/events/approve
///
/// Returns null when the caller has no pending events.
pub async fn approve_latest_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Option<Event>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());

    let pending = repo.latest_pending_for_creator(user_auth.user_id).await?;
    let Some(pending) = pending else {
        return Ok(Json(None));
    };

    let event = repo
        .set_status(pending.id, EventStatus::Admitted)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    tracing::info!(event_id = %event.id, "Event admitted");
    Ok(Json(Some(event.into())))
}
