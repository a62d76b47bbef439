use std::sync::Arc;

use chrono::Utc;

use crate::domain::{RepoError, player::PlayerRepository, query::PlayerFilter};

#[async_trait::async_trait]
pub trait CountPlayersUseCase {
    async fn count_players(&self, filter: PlayerFilter) -> Result<u64, CountPlayersError>;
}

#[derive(Debug)]
pub enum CountPlayersError {
    RepositoryError,
}

pub struct CountPlayersUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> CountPlayersUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> CountPlayersUseCase
    for CountPlayersUseCaseImpl<PR>
{
    async fn count_players(&self, filter: PlayerFilter) -> Result<u64, CountPlayersError> {
        let predicates = filter.predicates(Utc::now());
        match self.player_repository.count_players(&predicates).await {
            Ok(count) => Ok(count),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error counting players: {}", e);
                Err(CountPlayersError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rpg_core::{Profession, Race};

    use crate::domain::{
        player::{PlayerProfile, mock::MockPlayerRepository},
        query::{Range, Selector},
    };

    use super::*;

    #[tokio::test]
    async fn test_count_ignores_pagination() {
        let repo = Arc::new(MockPlayerRepository::default());
        for (i, race) in [Race::Giant, Race::Troll, Race::Giant, Race::Hobbit, Race::Giant]
            .into_iter()
            .enumerate()
        {
            let profile = PlayerProfile {
                name: format!("P{}", i),
                title: "t".to_string(),
                race,
                profession: Profession::Druid,
                birthday: Utc.with_ymd_and_hms(2002, 2, 2, 0, 0, 0).unwrap(),
                banned: false,
                experience: i as i32 * 1000,
            };
            repo.create_player(profile.clone(), profile.progress())
                .await
                .unwrap();
        }
        let use_case = CountPlayersUseCaseImpl::new(repo);

        assert_eq!(use_case.count_players(PlayerFilter::default()).await.unwrap(), 5);

        let giants = PlayerFilter {
            race: Selector::Only(Race::Giant),
            ..Default::default()
        };
        assert_eq!(use_case.count_players(giants).await.unwrap(), 3);

        let experienced = PlayerFilter {
            experience: Range {
                min: Some(2000),
                max: None,
            },
            ..Default::default()
        };
        assert_eq!(use_case.count_players(experienced).await.unwrap(), 3);
    }
}
