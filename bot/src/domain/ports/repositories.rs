//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//! Documents are saved whole; the document is the unit of persistence.

use async_trait::async_trait;

use crate::domain::entities::{Participant, ParticipantId, Tournament, TournamentId};
use crate::error::DomainError;

/// Repository for Tournament documents
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Find a tournament by ID
    async fn find_by_id(&self, id: &TournamentId) -> Result<Option<Tournament>, DomainError>;

    /// All tournaments (used to resume view synchronization on startup)
    async fn find_all(&self) -> Result<Vec<Tournament>, DomainError>;

    /// Save the whole document, creating it if it does not exist
    async fn save(&self, tournament: &Tournament) -> Result<(), DomainError>;

    /// Delete a tournament document
    async fn delete(&self, id: &TournamentId) -> Result<(), DomainError>;
}

/// Repository for Participant documents
///
/// Participants are owned by the account-linking layer; this crate only
/// reads them and never mutates their rating records.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Find a participant by ID
    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError>;

    /// Find several participants, preserving the order of `ids`.
    /// Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[ParticipantId]) -> Result<Vec<Participant>, DomainError>;

    /// Find a participant by their chat platform account id
    async fn find_by_platform_id(
        &self,
        platform_id: &str,
    ) -> Result<Option<Participant>, DomainError>;
}
