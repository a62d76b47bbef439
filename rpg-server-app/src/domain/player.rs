use chrono::{DateTime, Utc};
use rpg_core::{Profession, Progress, Race};

use crate::domain::{
    PlayerId, RepoError, RepoUpdateError,
    query::{PlayerPredicate, PlayerQuery},
};

/// Everything about a player a client may set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: DateTime<Utc>,
    pub banned: bool,
    pub experience: i32,
}

impl PlayerProfile {
    pub fn progress(&self) -> Progress {
        Progress::from_experience(self.experience)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub profile: PlayerProfile,
    pub progress: Progress,
}

/// Sparse set of profile fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerChanges {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub birthday: Option<DateTime<Utc>>,
    pub banned: Option<bool>,
    pub experience: Option<i32>,
}

impl PlayerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.title.is_none()
            && self.race.is_none()
            && self.profession.is_none()
            && self.birthday.is_none()
            && self.banned.is_none()
            && self.experience.is_none()
    }

    /// Overwrites every present field and recomputes the progress.
    pub fn apply(self, mut player: Player) -> Player {
        let profile = &mut player.profile;
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(title) = self.title {
            profile.title = title;
        }
        if let Some(race) = self.race {
            profile.race = race;
        }
        if let Some(profession) = self.profession {
            profile.profession = profession;
        }
        if let Some(birthday) = self.birthday {
            profile.birthday = birthday;
        }
        if let Some(banned) = self.banned {
            profile.banned = banned;
        }
        if let Some(experience) = self.experience {
            profile.experience = experience;
        }
        player.progress = player.profile.progress();
        player
    }
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    /// Persists a new player; the store assigns the id.
    async fn create_player(
        &self,
        profile: PlayerProfile,
        progress: Progress,
    ) -> Result<Player, RepoError>;
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
    async fn query_players(&self, query: &PlayerQuery) -> Result<Vec<Player>, RepoError>;
    async fn count_players(&self, predicates: &[PlayerPredicate]) -> Result<u64, RepoError>;
    /// Read-modify-write of a single player inside one transaction.
    async fn update_player(
        &self,
        id: PlayerId,
        update_fn: impl FnOnce(Player) -> Player + Send + 'static,
    ) -> Result<Player, RepoUpdateError>;
    /// Removes the player inside one transaction, returning what was removed.
    async fn delete_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
}

#[cfg(test)]
pub mod mock {
    use std::{collections::BTreeMap, sync::Arc};

    use parking_lot::Mutex;

    use super::*;

    #[derive(Default, Clone)]
    pub struct MockPlayerRepository {
        players: Arc<Mutex<BTreeMap<PlayerId, Player>>>,
        next_id: Arc<Mutex<i64>>,
        writes: Arc<Mutex<usize>>,
        unavailable: Arc<Mutex<bool>>,
    }

    impl MockPlayerRepository {
        pub fn writes(&self) -> usize {
            *self.writes.lock()
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.lock() = unavailable;
        }

        fn check_available(&self) -> Result<(), RepoError> {
            if *self.unavailable.lock() {
                return Err(RepoError::StorageError("connection refused".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl PlayerRepository for MockPlayerRepository {
        async fn create_player(
            &self,
            profile: PlayerProfile,
            progress: Progress,
        ) -> Result<Player, RepoError> {
            self.check_available()?;
            let id = {
                let mut next_id = self.next_id.lock();
                *next_id += 1;
                PlayerId(*next_id)
            };
            let player = Player {
                id,
                profile,
                progress,
            };
            self.players.lock().insert(id, player.clone());
            *self.writes.lock() += 1;
            Ok(player)
        }

        async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
            self.check_available()?;
            Ok(self.players.lock().get(&id).cloned())
        }

        async fn query_players(&self, query: &PlayerQuery) -> Result<Vec<Player>, RepoError> {
            self.check_available()?;
            let mut players: Vec<Player> = self
                .players
                .lock()
                .values()
                .filter(|p| query.predicates.iter().all(|pred| pred.matches(p)))
                .cloned()
                .collect();
            players.sort_by(|a, b| query.order.compare(a, b));
            Ok(players
                .into_iter()
                .skip(query.pagination.offset as usize)
                .take(query.pagination.limit as usize)
                .collect())
        }

        async fn count_players(&self, predicates: &[PlayerPredicate]) -> Result<u64, RepoError> {
            self.check_available()?;
            Ok(self
                .players
                .lock()
                .values()
                .filter(|p| predicates.iter().all(|pred| pred.matches(p)))
                .count() as u64)
        }

        async fn update_player(
            &self,
            id: PlayerId,
            update_fn: impl FnOnce(Player) -> Player + Send + 'static,
        ) -> Result<Player, RepoUpdateError> {
            self.check_available()?;
            let mut players = self.players.lock();
            let current = players.get(&id).cloned().ok_or(RepoUpdateError::NotFound)?;
            let updated = update_fn(current);
            players.insert(id, updated.clone());
            *self.writes.lock() += 1;
            Ok(updated)
        }

        async fn delete_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
            self.check_available()?;
            let removed = self.players.lock().remove(&id);
            if removed.is_some() {
                *self.writes.lock() += 1;
            }
            Ok(removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn player() -> Player {
        let profile = PlayerProfile {
            name: "Drimon".to_string(),
            title: "Hunter".to_string(),
            race: Race::Human,
            profession: Profession::Warrior,
            birthday: Utc.with_ymd_and_hms(2010, 1, 19, 6, 0, 0).unwrap(),
            banned: false,
            experience: 0,
        };
        Player {
            id: PlayerId(1),
            progress: profile.progress(),
            profile,
        }
    }

    #[test]
    fn test_empty_changes() {
        assert!(PlayerChanges::default().is_empty());
        let changes = PlayerChanges {
            banned: Some(false),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let original = player();
        let changes = PlayerChanges {
            title: Some(String::new()),
            experience: Some(300),
            ..Default::default()
        };
        let updated = changes.apply(original.clone());

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.profile.name, "Drimon");
        assert_eq!(updated.profile.title, "");
        assert_eq!(updated.profile.race, Race::Human);
        assert_eq!(updated.profile.birthday, original.profile.birthday);
        assert_eq!(updated.profile.experience, 300);
        assert_eq!(updated.progress.level, 2);
        assert_eq!(updated.progress.until_next_level, 300);
    }

    #[test]
    fn test_apply_recomputes_progress_without_experience_change() {
        let mut stale = player();
        stale.progress = Progress {
            level: 7,
            until_next_level: 1,
        };
        let updated = PlayerChanges {
            banned: Some(true),
            ..Default::default()
        }
        .apply(stale);
        assert!(updated.profile.banned);
        assert_eq!(updated.progress, Progress::from_experience(0));
    }
}
