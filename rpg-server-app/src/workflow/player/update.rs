use std::sync::Arc;

use crate::domain::{
    PlayerId, RepoError, RepoUpdateError,
    player::{Player, PlayerChanges, PlayerRepository},
};

#[async_trait::async_trait]
pub trait UpdatePlayerUseCase {
    async fn update_player(
        &self,
        id: PlayerId,
        changes: PlayerChanges,
    ) -> Result<Player, UpdatePlayerError>;
}

#[derive(Debug)]
pub enum UpdatePlayerError {
    PlayerNotFound,
    RepositoryError,
}

pub struct UpdatePlayerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> UpdatePlayerUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> UpdatePlayerUseCase
    for UpdatePlayerUseCaseImpl<PR>
{
    async fn update_player(
        &self,
        id: PlayerId,
        changes: PlayerChanges,
    ) -> Result<Player, UpdatePlayerError> {
        // nothing to write, the stored record is returned as is
        if changes.is_empty() {
            return match self.player_repository.get_player(id).await {
                Ok(Some(player)) => Ok(player),
                Ok(None) => Err(UpdatePlayerError::PlayerNotFound),
                Err(RepoError::StorageError(e)) => {
                    log::error!("Error getting player {}: {}", id, e);
                    Err(UpdatePlayerError::RepositoryError)
                }
            };
        }

        match self
            .player_repository
            .update_player(id, move |player| changes.apply(player))
            .await
        {
            Ok(player) => {
                log::info!(
                    "Updated player {} ({}), now level {}",
                    player.id,
                    player.profile.name,
                    player.progress.level
                );
                Ok(player)
            }
            Err(RepoUpdateError::NotFound) => Err(UpdatePlayerError::PlayerNotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to update player {}: {}", id, e);
                Err(UpdatePlayerError::RepositoryError)
            }
        }
    }
}
