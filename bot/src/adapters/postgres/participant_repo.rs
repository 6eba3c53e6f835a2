//! PostgreSQL adapter for ParticipantRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::entities::{Participant, ParticipantId};
use crate::domain::ports::ParticipantRepository;
use crate::entity::participants;
use crate::error::DomainError;

/// PostgreSQL implementation of ParticipantRepository
pub struct PostgresParticipantRepository {
    db: DatabaseConnection,
}

impl PostgresParticipantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: participants::Model) -> Result<Participant, DomainError> {
    serde_json::from_value(model.doc)
        .map_err(|e| DomainError::Database(format!("corrupt participant document: {}", e)))
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepository {
    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError> {
        let result = participants::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(to_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[ParticipantId]) -> Result<Vec<Participant>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let results = participants::Entity::find()
            .filter(participants::Column::Id.is_in(uuids))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut by_id: HashMap<ParticipantId, Participant> = HashMap::new();
        for model in results {
            let participant = to_domain(model)?;
            by_id.insert(participant.id, participant);
        }
        // preserve the caller's order, skip unknown ids
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn find_by_platform_id(
        &self,
        platform_id: &str,
    ) -> Result<Option<Participant>, DomainError> {
        let result = participants::Entity::find()
            .filter(participants::Column::PlatformId.eq(platform_id))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(to_domain).transpose()
    }
}
