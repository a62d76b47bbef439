use std::sync::Arc;

use crate::domain::{
    PlayerId, RepoError,
    player::{Player, PlayerRepository},
};

#[async_trait::async_trait]
pub trait DeletePlayerUseCase {
    async fn delete_player(&self, id: PlayerId) -> Result<Player, DeletePlayerError>;
}

#[derive(Debug)]
pub enum DeletePlayerError {
    PlayerNotFound,
    RepositoryError,
}

pub struct DeletePlayerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> DeletePlayerUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> DeletePlayerUseCase
    for DeletePlayerUseCaseImpl<PR>
{
    async fn delete_player(&self, id: PlayerId) -> Result<Player, DeletePlayerError> {
        match self.player_repository.delete_player(id).await {
            Ok(Some(player)) => {
                log::info!("Deleted player {} ({})", player.id, player.profile.name);
                Ok(player)
            }
            Ok(None) => Err(DeletePlayerError::PlayerNotFound),
            Err(RepoError::StorageError(e)) => {
                log::error!("Failed to delete player {}: {}", id, e);
                Err(DeletePlayerError::RepositoryError)
            }
        }
    }
}
