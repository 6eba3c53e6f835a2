//! Tournament operations service
//!
//! Application-level operations on a tournament: roster changes, premade
//! declaration changes and lifecycle. Every mutation saves the document
//! and then enqueues a render job for the tournament, so the published
//! view catches up asynchronously.

use std::sync::Arc;

use crate::app::render_queue::RenderQueue;
use crate::app::sync::ViewSyncService;
use crate::domain::entities::{NewTournament, ParticipantId, Tournament, TournamentId};
use crate::domain::ports::{MessageGateway, ParticipantRepository, TournamentRepository};
use crate::error::{AppError, DomainError};

/// Service for tournament roster and declaration operations
pub struct TournamentService<TR, PR, MG>
where
    TR: TournamentRepository,
    PR: ParticipantRepository,
    MG: MessageGateway,
{
    tournaments: Arc<TR>,
    participants: Arc<PR>,
    sync: Arc<ViewSyncService<TR, PR, MG>>,
    queue: Arc<RenderQueue>,
}

impl<TR, PR, MG> TournamentService<TR, PR, MG>
where
    TR: TournamentRepository,
    PR: ParticipantRepository,
    MG: MessageGateway,
{
    pub fn new(
        tournaments: Arc<TR>,
        participants: Arc<PR>,
        sync: Arc<ViewSyncService<TR, PR, MG>>,
        queue: Arc<RenderQueue>,
    ) -> Self {
        Self {
            tournaments,
            participants,
            sync,
            queue,
        }
    }

    async fn load(&self, id: &TournamentId) -> Result<Tournament, AppError> {
        self.tournaments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tournament {}", id)))
    }

    /// Create a tournament and schedule its first render.
    pub async fn create(&self, new: NewTournament) -> Result<Tournament, AppError> {
        let tournament = Tournament::create(new);
        self.tournaments.save(&tournament).await?;
        self.queue.enqueue(tournament.id).await;
        Ok(tournament)
    }

    /// Add a participant to the roster.
    pub async fn join(
        &self,
        id: &TournamentId,
        participant_id: ParticipantId,
    ) -> Result<(), AppError> {
        let mut tournament = self.load(id).await?;
        if self
            .participants
            .find_by_id(&participant_id)
            .await?
            .is_none()
        {
            return Err(AppError::Domain(DomainError::NotFound(format!(
                "Participant {}",
                participant_id
            ))));
        }
        tournament.add_participant(participant_id)?;
        self.tournaments.save(&tournament).await?;
        self.queue.enqueue(tournament.id).await;
        Ok(())
    }

    /// Remove a participant from the roster, along with every declaration
    /// that names them.
    pub async fn leave(
        &self,
        id: &TournamentId,
        participant_id: &ParticipantId,
    ) -> Result<(), AppError> {
        let mut tournament = self.load(id).await?;
        tournament.remove_participant(participant_id)?;
        self.tournaments.save(&tournament).await?;
        self.queue.enqueue(tournament.id).await;
        Ok(())
    }

    /// Replace a participant's premade selection.
    pub async fn set_premade_targets(
        &self,
        id: &TournamentId,
        issuer: ParticipantId,
        targets: &[ParticipantId],
    ) -> Result<(), AppError> {
        let mut tournament = self.load(id).await?;
        if !tournament.is_participant(&issuer) {
            return Err(AppError::Domain(DomainError::Forbidden(format!(
                "Participant {} must join tournament {} before selecting premades",
                issuer, tournament.name
            ))));
        }
        if let Some(stranger) = targets.iter().find(|t| !tournament.is_participant(t)) {
            return Err(AppError::Domain(DomainError::Validation(format!(
                "Premade target {} is not a tournament participant",
                stranger
            ))));
        }
        tournament.set_premade_targets(issuer, targets)?;
        self.tournaments.save(&tournament).await?;
        self.queue.enqueue(tournament.id).await;
        Ok(())
    }

    /// Exclude a participant from grouping entirely.
    pub async fn opt_out(
        &self,
        id: &TournamentId,
        issuer: ParticipantId,
    ) -> Result<(), AppError> {
        let mut tournament = self.load(id).await?;
        if !tournament.is_participant(&issuer) {
            return Err(AppError::Domain(DomainError::Forbidden(format!(
                "Participant {} is not in tournament {}",
                issuer, tournament.name
            ))));
        }
        tournament.opt_out(issuer);
        self.tournaments.save(&tournament).await?;
        self.queue.enqueue(tournament.id).await;
        Ok(())
    }

    /// Drop a participant's declarations, opt-out marker included.
    pub async fn reset_declarations(
        &self,
        id: &TournamentId,
        issuer: ParticipantId,
    ) -> Result<(), AppError> {
        let mut tournament = self.load(id).await?;
        tournament.clear_declarations(issuer);
        self.tournaments.save(&tournament).await?;
        self.queue.enqueue(tournament.id).await;
        Ok(())
    }

    /// Manually request a render pass.
    pub async fn refresh(&self, id: &TournamentId) -> Result<(), AppError> {
        let tournament = self.load(id).await?;
        self.queue.enqueue(tournament.id).await;
        Ok(())
    }

    /// Delete a tournament: retire its view messages, then remove the
    /// document.
    pub async fn delete(&self, id: &TournamentId) -> Result<(), AppError> {
        let tournament = self.load(id).await?;
        self.sync.retire_views(&tournament).await;
        self.tournaments.delete(id).await?;
        Ok(())
    }
}
