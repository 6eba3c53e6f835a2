//! PostgreSQL adapter for TournamentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::entities::{Tournament, TournamentId};
use crate::domain::ports::TournamentRepository;
use crate::entity::tournaments;
use crate::error::DomainError;

/// PostgreSQL implementation of TournamentRepository
pub struct PostgresTournamentRepository {
    db: DatabaseConnection,
}

impl PostgresTournamentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: tournaments::Model) -> Result<Tournament, DomainError> {
    serde_json::from_value(model.doc)
        .map_err(|e| DomainError::Database(format!("corrupt tournament document: {}", e)))
}

#[async_trait]
impl TournamentRepository for PostgresTournamentRepository {
    async fn find_by_id(&self, id: &TournamentId) -> Result<Option<Tournament>, DomainError> {
        let result = tournaments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(to_domain).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Tournament>, DomainError> {
        let results = tournaments::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(to_domain).collect()
    }

    async fn save(&self, tournament: &Tournament) -> Result<(), DomainError> {
        let doc = serde_json::to_value(tournament)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let now = Utc::now().fixed_offset();

        let exists = tournaments::Entity::find_by_id(tournament.id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .is_some();

        let model = tournaments::ActiveModel {
            id: Set(tournament.id.0),
            doc: Set(doc),
            updated_at: Set(now),
        };

        if exists {
            model
                .update(&self.db)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        } else {
            model
                .insert(&self.db)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }
        Ok(())
    }

    async fn delete(&self, id: &TournamentId) -> Result<(), DomainError> {
        tournaments::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(())
    }
}
