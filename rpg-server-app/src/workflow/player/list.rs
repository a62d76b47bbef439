use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Pagination, RepoError,
    player::{Player, PlayerRepository},
    query::{PlayerFilter, PlayerOrder, PlayerQuery},
};

#[async_trait::async_trait]
pub trait ListPlayersUseCase {
    async fn list_players(
        &self,
        filter: PlayerFilter,
        order: PlayerOrder,
        pagination: Pagination,
    ) -> Result<Vec<Player>, ListPlayersError>;
}

#[derive(Debug)]
pub enum ListPlayersError {
    RepositoryError,
}

pub struct ListPlayersUseCaseImpl<PR: PlayerRepository> {
    player_repository: Arc<PR>,
}

impl<PR: PlayerRepository> ListPlayersUseCaseImpl<PR> {
    pub fn new(player_repository: Arc<PR>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<PR: PlayerRepository + Send + Sync + 'static> ListPlayersUseCase
    for ListPlayersUseCaseImpl<PR>
{
    async fn list_players(
        &self,
        filter: PlayerFilter,
        order: PlayerOrder,
        pagination: Pagination,
    ) -> Result<Vec<Player>, ListPlayersError> {
        let query = PlayerQuery {
            predicates: filter.predicates(Utc::now()),
            order,
            pagination,
        };
        log::debug!("Listing players with {:?}", query);
        match self.player_repository.query_players(&query).await {
            Ok(players) => Ok(players),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error querying players: {}", e);
                Err(ListPlayersError::RepositoryError)
            }
        }
    }
}
