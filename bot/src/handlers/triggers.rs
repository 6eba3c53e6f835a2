//! Trigger handlers
//!
//! The inbound trigger surface: roster changes, declaration changes and
//! manual refreshes, each enqueueing a render job for the tournament.
//! Command parsing and permissions live in the surrounding command layer,
//! not here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{ChannelId, NewTournament, ParticipantId, Region, TournamentId};
use crate::error::AppError;
use crate::AppState;

/// Request to create a new tournament
#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub description: Option<String>,
    pub region: String,
    pub channel_id: String,
    pub capacity: Option<usize>,
}

/// Response for a created tournament
#[derive(Debug, Serialize)]
pub struct TournamentResponse {
    pub id: String,
    pub name: String,
    pub region: String,
    pub channel_id: String,
    pub capacity: usize,
}

/// Request body naming a participant
#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    pub participant_id: Uuid,
}

/// Request body with a premade target selection
#[derive(Debug, Deserialize)]
pub struct PremadeTargetsRequest {
    pub targets: Vec<Uuid>,
}

/// POST /tournaments
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<Json<TournamentResponse>, AppError> {
    let region: Region = request
        .region
        .parse()
        .map_err(AppError::BadRequest)?;

    let tournament = state
        .tournament_service
        .create(NewTournament {
            name: request.name,
            description: request.description,
            region,
            channel_id: ChannelId(request.channel_id),
            capacity: request.capacity,
        })
        .await?;

    Ok(Json(TournamentResponse {
        id: tournament.id.to_string(),
        name: tournament.name,
        region: tournament.region.to_string(),
        channel_id: tournament.channel_id.to_string(),
        capacity: tournament.capacity,
    }))
}

/// DELETE /tournaments/:id
pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .tournament_service
        .delete(&TournamentId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /tournaments/:id/participants
pub async fn join_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ParticipantRequest>,
) -> Result<StatusCode, AppError> {
    state
        .tournament_service
        .join(&TournamentId(id), ParticipantId(request.participant_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tournaments/:id/participants/:participant_id
pub async fn leave_tournament(
    State(state): State<AppState>,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .tournament_service
        .leave(&TournamentId(id), &ParticipantId(participant_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /tournaments/:id/premades/:participant_id
pub async fn set_premades(
    State(state): State<AppState>,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<PremadeTargetsRequest>,
) -> Result<StatusCode, AppError> {
    let targets: Vec<ParticipantId> = request.targets.into_iter().map(ParticipantId).collect();
    state
        .tournament_service
        .set_premade_targets(&TournamentId(id), ParticipantId(participant_id), &targets)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /tournaments/:id/premades/:participant_id/opt-out
pub async fn opt_out(
    State(state): State<AppState>,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .tournament_service
        .opt_out(&TournamentId(id), ParticipantId(participant_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tournaments/:id/premades/:participant_id
pub async fn reset_premades(
    State(state): State<AppState>,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .tournament_service
        .reset_declarations(&TournamentId(id), ParticipantId(participant_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /tournaments/:id/refresh
pub async fn refresh_tournament(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .tournament_service
        .refresh(&TournamentId(id))
        .await?;
    Ok(StatusCode::ACCEPTED)
}
