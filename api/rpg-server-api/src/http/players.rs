use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Datelike, Utc};
use rpg_core::{Profession, Race};
use rpg_server_app::{
    domain::{
        Pagination, PlayerId,
        player::{Player, PlayerChanges, PlayerProfile},
        query::{PlayerFilter, PlayerOrder, Range, Selector},
    },
    workflow::player::{
        count::CountPlayersError, create::CreatePlayerError, delete::DeletePlayerError,
        get::GetPlayerError, list::ListPlayersError, update::UpdatePlayerError,
    },
};
use validator::{Validate, ValidationError};

use crate::{app::ServiceError, http::AppState};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayer {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: i64,
    pub banned: bool,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

impl From<Player> for JsonPlayer {
    fn from(player: Player) -> Self {
        Self {
            id: player.id.0,
            name: player.profile.name,
            title: player.profile.title,
            race: player.profile.race,
            profession: player.profile.profession,
            birthday: player.profile.birthday.timestamp_millis(),
            banned: player.profile.banned,
            experience: player.profile.experience,
            level: player.progress.level,
            until_next_level: player.progress.until_next_level,
        }
    }
}

/// Body of create and update requests. `id`, `level` and `untilNextLevel`
/// are accepted but never applied.
#[derive(Debug, Default, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayerRequest {
    #[allow(dead_code)]
    id: Option<i64>,
    #[validate(length(min = 1, max = 12))]
    name: Option<String>,
    #[validate(length(max = 30))]
    title: Option<String>,
    race: Option<Race>,
    profession: Option<Profession>,
    #[validate(custom(function = "validate_birthday"))]
    birthday: Option<i64>,
    banned: Option<bool>,
    #[validate(range(min = 0, max = 10_000_000))]
    experience: Option<i32>,
    #[allow(dead_code)]
    level: Option<i32>,
    #[allow(dead_code)]
    until_next_level: Option<i32>,
}

fn validate_birthday(birthday: i64) -> Result<(), ValidationError> {
    let date = DateTime::from_timestamp_millis(birthday)
        .ok_or_else(|| ValidationError::new("birthday_out_of_range"))?;
    if birthday < 0 || !(2000..=3000).contains(&date.year()) {
        return Err(ValidationError::new("birthday_year"));
    }
    if date >= Utc::now() {
        return Err(ValidationError::new("birthday_in_future"));
    }
    Ok(())
}

fn birthday_from_millis(millis: i64) -> Result<DateTime<Utc>, ServiceError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ServiceError::BadRequest(format!("Invalid birthday: {}", millis)))
}

impl JsonPlayerRequest {
    fn validated(self) -> Result<Self, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::BadRequest(format!("Invalid player: {}", e)))?;
        Ok(self)
    }

    fn into_profile(self) -> Result<PlayerProfile, ServiceError> {
        let request = self.validated()?;
        let missing = |field: &str| ServiceError::BadRequest(format!("Missing field: {}", field));
        Ok(PlayerProfile {
            name: request.name.ok_or_else(|| missing("name"))?,
            title: request.title.ok_or_else(|| missing("title"))?,
            race: request.race.ok_or_else(|| missing("race"))?,
            profession: request.profession.ok_or_else(|| missing("profession"))?,
            birthday: birthday_from_millis(request.birthday.ok_or_else(|| missing("birthday"))?)?,
            banned: request.banned.unwrap_or(false),
            experience: request.experience.ok_or_else(|| missing("experience"))?,
        })
    }

    fn into_changes(self) -> Result<PlayerChanges, ServiceError> {
        let request = self.validated()?;
        Ok(PlayerChanges {
            name: request.name,
            title: request.title,
            race: request.race,
            profession: request.profession,
            birthday: request.birthday.map(birthday_from_millis).transpose()?,
            banned: request.banned,
            experience: request.experience,
        })
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayersFilter {
    name: Option<String>,
    title: Option<String>,
    after: Option<i64>,
    before: Option<i64>,
    min_experience: Option<i32>,
    max_experience: Option<i32>,
    min_level: Option<i32>,
    max_level: Option<i32>,
    race: Option<String>,
    profession: Option<String>,
    banned: Option<String>,
    page_number: Option<i32>,
    page_size: Option<i32>,
    order: Option<String>,
}

impl JsonPlayersFilter {
    fn to_filter(&self) -> Result<PlayerFilter, ServiceError> {
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.trim().is_empty());
        let race = non_empty(&self.race)
            .map(|s| Selector::<Race>::parse(&s))
            .transpose()
            .map_err(|e| ServiceError::BadRequest(format!("Invalid race filter: {}", e)))?
            .unwrap_or_default();
        let profession = non_empty(&self.profession)
            .map(|s| Selector::<Profession>::parse(&s))
            .transpose()
            .map_err(|e| ServiceError::BadRequest(format!("Invalid profession filter: {}", e)))?
            .unwrap_or_default();
        let banned = non_empty(&self.banned)
            .map(|s| Selector::<bool>::parse(&s.to_lowercase()))
            .transpose()
            .map_err(|_| {
                ServiceError::BadRequest("Invalid banned filter, expected ANY, true or false".to_string())
            })?
            .unwrap_or_default();

        Ok(PlayerFilter {
            name: self.name.clone(),
            title: self.title.clone(),
            birthday: Range {
                min: self.after,
                max: self.before,
            },
            experience: Range {
                min: self.min_experience,
                max: self.max_experience,
            },
            level: Range {
                min: self.min_level,
                max: self.max_level,
            },
            race,
            profession,
            banned,
        })
    }

    fn order(&self) -> Result<PlayerOrder, ServiceError> {
        self.order
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<PlayerOrder>())
            .transpose()
            .map_err(|e| ServiceError::BadRequest(format!("Invalid order: {}", e)))
            .map(Option::unwrap_or_default)
    }

    fn pagination(&self) -> Result<Pagination, ServiceError> {
        let non_negative = |value: Option<i32>, name: &str, default: u64| match value {
            None => Ok(default),
            Some(value) => u64::try_from(value).map_err(|_| {
                ServiceError::BadRequest(format!("Invalid {}: {}, must not be negative", name, value))
            }),
        };
        Ok(Pagination::page(
            non_negative(self.page_number, "pageNumber", 0)?,
            non_negative(self.page_size, "pageSize", Pagination::DEFAULT_PAGE_SIZE)?,
        ))
    }
}

fn parse_player_id(id: &str) -> Result<PlayerId, ServiceError> {
    match id.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(PlayerId(id)),
        _ => Err(ServiceError::BadRequest(format!("Invalid player ID: {}", id))),
    }
}

fn json_rejection(rejection: JsonRejection) -> ServiceError {
    ServiceError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

fn query_rejection(rejection: QueryRejection) -> ServiceError {
    ServiceError::BadRequest(format!("Invalid query: {}", rejection.body_text()))
}

pub async fn get_all(
    State(app_state): State<AppState>,
    filter: Result<Query<JsonPlayersFilter>, QueryRejection>,
) -> Result<Json<Vec<JsonPlayer>>, ServiceError> {
    let Query(filter) = filter.map_err(query_rejection)?;
    let player_filter = filter.to_filter()?;
    let order = filter.order()?;
    let pagination = filter.pagination()?;

    match app_state
        .app
        .player_list_use_case
        .list_players(player_filter, order, pagination)
        .await
    {
        Ok(players) => Ok(Json(players.into_iter().map(JsonPlayer::from).collect())),
        Err(ListPlayersError::RepositoryError) => {
            Err(ServiceError::Internal("Error querying players".to_string()))
        }
    }
}

pub async fn count(
    State(app_state): State<AppState>,
    filter: Result<Query<JsonPlayersFilter>, QueryRejection>,
) -> Result<Json<u64>, ServiceError> {
    let Query(filter) = filter.map_err(query_rejection)?;
    let player_filter = filter.to_filter()?;

    match app_state
        .app
        .player_count_use_case
        .count_players(player_filter)
        .await
    {
        Ok(count) => Ok(Json(count)),
        Err(CountPlayersError::RepositoryError) => {
            Err(ServiceError::Internal("Error counting players".to_string()))
        }
    }
}

pub async fn get_by_id(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<JsonPlayer>, ServiceError> {
    let id = parse_player_id(&id)?;
    match app_state.app.player_get_use_case.get_player(id).await {
        Ok(Some(player)) => Ok(Json(player.into())),
        Ok(None) => Err(ServiceError::NotFound(format!("Player {} not found", id))),
        Err(GetPlayerError::RepositoryError) => {
            Err(ServiceError::Internal("Error retrieving player".to_string()))
        }
    }
}

pub async fn create(
    State(app_state): State<AppState>,
    body: Result<Json<JsonPlayerRequest>, JsonRejection>,
) -> Result<Json<JsonPlayer>, ServiceError> {
    let Json(request) = body.map_err(json_rejection)?;
    let profile = request.into_profile()?;

    match app_state
        .app
        .player_create_use_case
        .create_player(profile)
        .await
    {
        Ok(player) => Ok(Json(player.into())),
        Err(CreatePlayerError::RepositoryError) => {
            Err(ServiceError::Internal("Error creating player".to_string()))
        }
    }
}

pub async fn update(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    body: Result<Json<JsonPlayerRequest>, JsonRejection>,
) -> Result<Json<JsonPlayer>, ServiceError> {
    let id = parse_player_id(&id)?;
    let Json(request) = body.map_err(json_rejection)?;
    let changes = request.into_changes()?;

    match app_state
        .app
        .player_update_use_case
        .update_player(id, changes)
        .await
    {
        Ok(player) => Ok(Json(player.into())),
        Err(UpdatePlayerError::PlayerNotFound) => {
            Err(ServiceError::NotFound(format!("Player {} not found", id)))
        }
        Err(UpdatePlayerError::RepositoryError) => {
            Err(ServiceError::Internal("Error updating player".to_string()))
        }
    }
}

pub async fn delete(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_player_id(&id)?;
    match app_state.app.player_delete_use_case.delete_player(id).await {
        Ok(_) => Ok(StatusCode::OK),
        Err(DeletePlayerError::PlayerNotFound) => {
            Err(ServiceError::NotFound(format!("Player {} not found", id)))
        }
        Err(DeletePlayerError::RepositoryError) => {
            Err(ServiceError::Internal("Error deleting player".to_string()))
        }
    }
}
