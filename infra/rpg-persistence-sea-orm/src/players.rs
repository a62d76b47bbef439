use chrono::DateTime;
use rpg_core::{Profession, Progress, Race};
use rpg_server_app::domain::{
    PlayerId, RepoError, RepoUpdateError,
    player::{Player, PlayerProfile, PlayerRepository},
    query::{PlayerOrder, PlayerPredicate, PlayerQuery},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionError, TransactionTrait,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use crate::entity::player;

pub struct PlayerRepositoryImpl {
    db: DatabaseConnection,
}

impl PlayerRepositoryImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_player(model: player::Model) -> Result<Player, RepoError> {
        let corrupt = |field: &str, value: &dyn std::fmt::Display| {
            RepoError::StorageError(format!(
                "Player {} has an invalid {}: {}",
                model.id, field, value
            ))
        };
        let race = model
            .race
            .parse::<Race>()
            .map_err(|_| corrupt("race", &model.race))?;
        let profession = model
            .profession
            .parse::<Profession>()
            .map_err(|_| corrupt("profession", &model.profession))?;
        let birthday = DateTime::from_timestamp_millis(model.birthday)
            .ok_or_else(|| corrupt("birthday", &model.birthday))?;

        Ok(Player {
            id: PlayerId(model.id),
            profile: PlayerProfile {
                name: model.name,
                title: model.title,
                race,
                profession,
                birthday,
                banned: model.banned,
                experience: model.experience,
            },
            progress: Progress {
                level: model.level,
                until_next_level: model.until_next_level,
            },
        })
    }

    fn profile_to_model(profile: &PlayerProfile, progress: Progress) -> player::ActiveModel {
        player::ActiveModel {
            id: NotSet,
            name: Set(profile.name.clone()),
            title: Set(profile.title.clone()),
            race: Set(profile.race.as_str().to_string()),
            profession: Set(profile.profession.as_str().to_string()),
            birthday: Set(profile.birthday.timestamp_millis()),
            banned: Set(profile.banned),
            experience: Set(profile.experience),
            level: Set(progress.level),
            until_next_level: Set(progress.until_next_level),
        }
    }

    /// Case-sensitive literal substring test. `LIKE` would follow the column
    /// collation and treat `%` and `_` as wildcards.
    fn column_contains(backend: DbBackend, column: player::Column, part: &str) -> SimpleExpr {
        let (function, haystack): (&str, SimpleExpr) = match backend {
            DbBackend::MySql => ("INSTR", Expr::col(column).cast_as(Alias::new("BINARY"))),
            DbBackend::Postgres => ("STRPOS", Expr::col(column).into()),
            _ => ("INSTR", Expr::col(column).into()),
        };
        Expr::expr(
            Func::cust(Alias::new(function))
                .arg(haystack)
                .arg(part.to_string()),
        )
        .gt(0)
    }

    fn predicate_condition(backend: DbBackend, predicates: &[PlayerPredicate]) -> Condition {
        predicates
            .iter()
            .fold(Condition::all(), |condition, predicate| {
                let expr = match predicate {
                    PlayerPredicate::NameContains(part) => {
                        Self::column_contains(backend, player::Column::Name, part)
                    }
                    PlayerPredicate::TitleContains(part) => {
                        Self::column_contains(backend, player::Column::Title, part)
                    }
                    PlayerPredicate::BirthdayBetween(after, before) => {
                        player::Column::Birthday.between(*after, *before)
                    }
                    PlayerPredicate::ExperienceBetween(min, max) => {
                        player::Column::Experience.between(*min, *max)
                    }
                    PlayerPredicate::LevelBetween(min, max) => {
                        player::Column::Level.between(*min, *max)
                    }
                    PlayerPredicate::RaceIs(race) => player::Column::Race.eq(race.as_str()),
                    PlayerPredicate::ProfessionIs(profession) => {
                        player::Column::Profession.eq(profession.as_str())
                    }
                    PlayerPredicate::BannedIs(banned) => player::Column::Banned.eq(*banned),
                };
                condition.add(expr)
            })
    }

    fn apply_order(query: Select<player::Entity>, order: PlayerOrder) -> Select<player::Entity> {
        let query = match order {
            PlayerOrder::Id => query,
            PlayerOrder::Name => query.order_by_asc(player::Column::Name),
            PlayerOrder::Experience => query.order_by_asc(player::Column::Experience),
            PlayerOrder::Birthday => query.order_by_asc(player::Column::Birthday),
            PlayerOrder::Level => query.order_by_asc(player::Column::Level),
        };
        query.order_by_asc(player::Column::Id)
    }
}

#[async_trait::async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn create_player(
        &self,
        profile: PlayerProfile,
        progress: Progress,
    ) -> Result<Player, RepoError> {
        let model = Self::profile_to_model(&profile, progress)
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Self::model_to_player(model)
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        player::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?
            .map(Self::model_to_player)
            .transpose()
    }

    async fn query_players(&self, query: &PlayerQuery) -> Result<Vec<Player>, RepoError> {
        let backend = self.db.get_database_backend();
        let select =
            player::Entity::find().filter(Self::predicate_condition(backend, &query.predicates));
        let models = Self::apply_order(select, query.order)
            .offset(query.pagination.offset)
            .limit(query.pagination.limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        models.into_iter().map(Self::model_to_player).collect()
    }

    async fn count_players(&self, predicates: &[PlayerPredicate]) -> Result<u64, RepoError> {
        player::Entity::find()
            .filter(Self::predicate_condition(
                self.db.get_database_backend(),
                predicates,
            ))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update_fn: impl FnOnce(Player) -> Player + Send + 'static,
    ) -> Result<Player, RepoUpdateError> {
        let res = self
            .db
            .transaction::<_, Player, RepoUpdateError>(|txn| {
                Box::pin(async move {
                    let model = player::Entity::find_by_id(id.0)
                        .one(txn)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
                        .ok_or(RepoUpdateError::NotFound)?;

                    let updated = update_fn(Self::model_to_player(model)?);
                    let mut active_model =
                        Self::profile_to_model(&updated.profile, updated.progress);
                    active_model.id = Set(id.0);

                    let model = active_model
                        .update(txn)
                        .await
                        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
                    Ok(Self::model_to_player(model)?)
                })
            })
            .await;
        match res {
            Ok(player) => Ok(player),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => {
                Err(RepoUpdateError::StorageError(e.to_string()))
            }
        }
    }

    async fn delete_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        let res = self
            .db
            .transaction::<_, Option<Player>, RepoError>(|txn| {
                Box::pin(async move {
                    let Some(model) = player::Entity::find_by_id(id.0)
                        .one(txn)
                        .await
                        .map_err(|e| RepoError::StorageError(e.to_string()))?
                    else {
                        return Ok(None);
                    };
                    let removed = Self::model_to_player(model)?;

                    player::Entity::delete_by_id(id.0)
                        .exec(txn)
                        .await
                        .map_err(|e| RepoError::StorageError(e.to_string()))?;
                    Ok(Some(removed))
                })
            })
            .await;
        match res {
            Ok(removed) => Ok(removed),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => Err(RepoError::StorageError(e.to_string())),
        }
    }
}
