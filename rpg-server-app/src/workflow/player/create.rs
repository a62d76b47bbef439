use std::sync::Arc;

use crate::domain::{
    RepoError,
    player::{Player, PlayerProfile, PlayerRepository},
};

#[async_trait::async_trait]
pub trait CreatePlayerUseCase {
    async fn create_player(&self, profile: PlayerProfile) -> Result<Player, CreatePlayerError>;
}

#[derive(Debug)]
pub enum CreatePlayerError {
    RepositoryError,
}

pub struct CreatePlayerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> CreatePlayerUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> CreatePlayerUseCase
    for CreatePlayerUseCaseImpl<PR>
{
    async fn create_player(&self, profile: PlayerProfile) -> Result<Player, CreatePlayerError> {
        let progress = profile.progress();
        match self
            .player_repository
            .create_player(profile, progress)
            .await
        {
            Ok(player) => {
                log::info!(
                    "Created player {} ({}) at level {}",
                    player.id,
                    player.profile.name,
                    player.progress.level
                );
                Ok(player)
            }
            Err(RepoError::StorageError(e)) => {
                log::error!("Failed to create player: {}", e);
                Err(CreatePlayerError::RepositoryError)
            }
        }
    }
}
