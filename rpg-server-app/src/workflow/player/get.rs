use std::sync::Arc;

use crate::domain::{
    PlayerId, RepoError,
    player::{Player, PlayerRepository},
};

#[async_trait::async_trait]
pub trait GetPlayerUseCase {
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, GetPlayerError>;
}

#[derive(Debug)]
pub enum GetPlayerError {
    RepositoryError,
}

pub struct GetPlayerUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> GetPlayerUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> GetPlayerUseCase for GetPlayerUseCaseImpl<PR> {
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, GetPlayerError> {
        match self.player_repository.get_player(id).await {
            Ok(player) => Ok(player),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error getting player {}: {}", id, e);
                Err(GetPlayerError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rpg_core::{Profession, Race};

    use crate::domain::player::{PlayerProfile, mock::MockPlayerRepository};

    use super::*;

    #[tokio::test]
    async fn test_get_returns_created_player() {
        let repo = Arc::new(MockPlayerRepository::default());
        let profile = PlayerProfile {
            name: "Lorm".to_string(),
            title: "Keeper".to_string(),
            race: Race::Dwarf,
            profession: Profession::Cleric,
            birthday: Utc.with_ymd_and_hms(2003, 7, 4, 12, 0, 0).unwrap(),
            banned: true,
            experience: 42,
        };
        let created = repo
            .create_player(profile.clone(), profile.progress())
            .await
            .unwrap();

        let use_case = GetPlayerUseCaseImpl::new(repo);
        assert_eq!(use_case.get_player(created.id).await.unwrap(), Some(created));
        assert_eq!(use_case.get_player(PlayerId(999_999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_storage_failure() {
        let repo = Arc::new(MockPlayerRepository::default());
        repo.set_unavailable(true);
        let use_case = GetPlayerUseCaseImpl::new(repo);
        assert!(matches!(
            use_case.get_player(PlayerId(1)).await,
            Err(GetPlayerError::RepositoryError)
        ));
    }
}
