//! Chat room routes: membership, settings, and messages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{
    ChatMessage, ChatRoom, Event, PublicProfile, RenameRoomRequest, SendMessageRequest,
    UpdateRoomSettingsRequest,
};
use persistence::repositories::{
    ChatRepository, EventRepository, MessageRepository, UserRepository,
};

/// Room detail with its linked event, if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: ChatRoom,
    pub event: Option<Event>,
}

/// Request body for an admin adding a member.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// Response body for a self-exit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitResponse {
    pub success: bool,
}

/// List the caller's rooms, most recently active first.
///
/// GET /api/v1/chats
pub async fn list_rooms(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Vec<ChatRoom>>, ApiError> {
    let rooms = ChatRepository::new(state.pool.clone())
        .list_for_user(user_auth.user_id)
        .await?;
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// Get a room with its linked event.
///
/// GET /api/v1/chats/:chat_id
pub async fn get_room(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<RoomDetail>, ApiError> {
    let room = ChatRepository::new(state.pool.clone())
        .find_by_id(chat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat room not found".to_string()))?;

    let event = match room.event_id {
        Some(event_id) => EventRepository::new(state.pool.clone())
            .find_by_id(event_id)
            .await?
            .map(Into::into),
        None => None,
    };

    Ok(Json(RoomDetail {
        room: room.into(),
        event,
    }))
}

/// Join a room.
///
/// POST /api/v1/chats/:chat_id/join
///
/// Joining a room you are already in is a no-op that returns the current
/// state.
pub async fn join_room(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ChatRoom>, ApiError> {
    let room = ChatRepository::new(state.pool.clone())
        .join(chat_id, user_auth.user_id)
        .await?;

    tracing::info!(
        chat_id = %chat_id,
        user_id = %user_auth.user_id,
        member_count = room.members.len(),
        "User joined chat"
    );
    Ok(Json(room.into()))
}

/// Leave a room.
///
/// POST /api/v1/chats/:chat_id/exit
///
/// The room admin cannot exit. Exiting a room you are not in succeeds
/// without a write.
pub async fn exit_room(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ExitResponse>, ApiError> {
    let room = ChatRepository::new(state.pool.clone())
        .self_exit(chat_id, user_auth.user_id)
        .await?;

    tracing::info!(
        chat_id = %chat_id,
        user_id = %user_auth.user_id,
        member_count = room.members.len(),
        "User exited chat"
    );
    Ok(Json(ExitResponse { success: true }))
}

/// List member profiles in member order (admin first).
///
/// GET /api/v1/chats/:chat_id/members
pub async fn list_members(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Vec<PublicProfile>>, ApiError> {
    let room = ChatRepository::new(state.pool.clone())
        .find_by_id(chat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat room not found".to_string()))?;

    let profiles = UserRepository::new(state.pool.clone())
        .find_public_profiles(&room.members)
        .await?;

    // Restore member-list order; the admin comes first.
    let mut ordered = Vec::with_capacity(room.members.len());
    for member_id in &room.members {
        if let Some(profile) = profiles.iter().find(|p| p.id == *member_id) {
            ordered.push(profile.clone().into());
        }
    }

    Ok(Json(ordered))
}

/// Admin adds a member.
///
/// POST /api/v1/chats/:chat_id/members
pub async fn add_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<ChatRoom>, ApiError> {
    let room = ChatRepository::new(state.pool.clone())
        .admin_add(chat_id, user_auth.user_id, request.user_id)
        .await?;

    tracing::info!(
        chat_id = %chat_id,
        admin_id = %user_auth.user_id,
        user_id = %request.user_id,
        member_count = room.members.len(),
        "Member added to chat"
    );
    Ok(Json(room.into()))
}

/// Admin removes a member. The admin itself can never be removed.
///
/// DELETE /api/v1/chats/:chat_id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((chat_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ChatRoom>, ApiError> {
    let room = ChatRepository::new(state.pool.clone())
        .admin_remove(chat_id, user_auth.user_id, user_id)
        .await?;

    tracing::info!(
        chat_id = %chat_id,
        admin_id = %user_auth.user_id,
        user_id = %user_id,
        member_count = room.members.len(),
        "Member removed from chat"
    );
    Ok(Json(room.into()))
}

/// Admin updates room settings.
///
/// PUT /api/v1/chats/:chat_id/settings
///
/// A slot split that exceeds the chat limit is rescaled proportionally; a
/// changed limit is mirrored onto the linked event's capacity.
pub async fn update_settings(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
    Json(request): Json<UpdateRoomSettingsRequest>,
) -> Result<Json<ChatRoom>, ApiError> {
    request.validate()?;

    let room = ChatRepository::new(state.pool.clone())
        .update_settings(chat_id, user_auth.user_id, &request)
        .await?;

    tracing::info!(chat_id = %chat_id, admin_id = %user_auth.user_id, "Chat settings updated");
    Ok(Json(room.into()))
}

/// Admin renames the room.
///
/// PUT /api/v1/chats/:chat_id/name
pub async fn rename_room(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
    Json(request): Json<RenameRoomRequest>,
) -> Result<Json<ChatRoom>, ApiError> {
    request.validate()?;
    let name = request.name.trim();

    let room = ChatRepository::new(state.pool.clone())
        .rename(chat_id, user_auth.user_id, name)
        .await?;

    tracing::info!(chat_id = %chat_id, name = %name, "Chat renamed");
    Ok(Json(room.into()))
}

/// Admin deletes the room.
///
/// DELETE /api/v1/chats/:chat_id
///
/// Room deletion has never been wired up (the admin-exit flow points at it,
/// but no deletion call exists); this endpoint makes that explicit instead
/// of guessing cascade semantics.
pub async fn delete_room(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let room: ChatRoom = ChatRepository::new(state.pool.clone())
        .find_by_id(chat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat room not found".to_string()))?
        .into();

    if !room.is_admin(user_auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only the chat admin can delete the room".to_string(),
        ));
    }

    Err(ApiError::Unimplemented(
        "Chat room deletion is not implemented".to_string(),
    ))
}

/// List messages in a room, oldest first. Members only.
///
/// GET /api/v1/chats/:chat_id/messages
pub async fn list_messages(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let room: ChatRoom = ChatRepository::new(state.pool.clone())
        .find_by_id(chat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat room not found".to_string()))?
        .into();

    if !room.is_member(user_auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only members can read this chat".to_string(),
        ));
    }

    let messages = MessageRepository::new(state.pool.clone())
        .list_for_chat(chat_id)
        .await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Send a message. Members only.
///
/// POST /api/v1/chats/:chat_id/messages
///
/// Only admin-sent messages bump the room's last-active timestamp.
pub async fn send_message(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(chat_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    request.validate()?;

    let chats = ChatRepository::new(state.pool.clone());
    let room: ChatRoom = chats
        .find_by_id(chat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat room not found".to_string()))?
        .into();

    if !room.is_member(user_auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only members can send messages to this chat".to_string(),
        ));
    }

    let message = MessageRepository::new(state.pool.clone())
        .create(chat_id, user_auth.user_id, &request.body)
        .await?;

    if room.is_admin(user_auth.user_id) {
        chats.bump_last_active(chat_id).await?;
    }

    Ok((StatusCode::CREATED, Json(message.into())))
}
