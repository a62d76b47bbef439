use std::{cmp::Ordering, str::FromStr};

use chrono::{DateTime, Utc};
use rpg_core::{Profession, Race};
use thiserror::Error;

use crate::domain::{Pagination, player::Player};

/// Either no constraint or an exact match on a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<T> {
    Any,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::Any
    }
}

impl<T: FromStr> Selector<T> {
    /// `ANY` (any case) selects everything, anything else must parse as `T`.
    pub fn parse(value: &str) -> Result<Self, T::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("any") {
            Ok(Selector::Any)
        } else {
            value.parse().map(Selector::Only)
        }
    }
}

/// Inclusive bounds, each of which may be left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Range<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: Copy> Range<T> {
    fn bounds(&self, default_min: T, default_max: T) -> Option<(T, T)> {
        if self.min.is_none() && self.max.is_none() {
            return None;
        }
        Some((
            self.min.unwrap_or(default_min),
            self.max.unwrap_or(default_max),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub title: Option<String>,
    /// Epoch milliseconds.
    pub birthday: Range<i64>,
    pub experience: Range<i32>,
    pub level: Range<i32>,
    pub race: Selector<Race>,
    pub profession: Selector<Profession>,
    pub banned: Selector<bool>,
}

impl PlayerFilter {
    /// Predicates that all have to hold. `now` is the default upper birthday bound.
    pub fn predicates(&self, now: DateTime<Utc>) -> Vec<PlayerPredicate> {
        let mut predicates = Vec::new();

        if let Some(name) = self.name.as_ref().filter(|s| !s.is_empty()) {
            predicates.push(PlayerPredicate::NameContains(name.clone()));
        }
        if let Some(title) = self.title.as_ref().filter(|s| !s.is_empty()) {
            predicates.push(PlayerPredicate::TitleContains(title.clone()));
        }
        if let Some((after, before)) = self.birthday.bounds(0, now.timestamp_millis()) {
            predicates.push(PlayerPredicate::BirthdayBetween(after, before));
        }
        if let Some((min, max)) = self.experience.bounds(0, i32::MAX) {
            predicates.push(PlayerPredicate::ExperienceBetween(min, max));
        }
        if let Some((min, max)) = self.level.bounds(0, i32::MAX) {
            predicates.push(PlayerPredicate::LevelBetween(min, max));
        }
        if let Selector::Only(race) = self.race {
            predicates.push(PlayerPredicate::RaceIs(race));
        }
        if let Selector::Only(profession) = self.profession {
            predicates.push(PlayerPredicate::ProfessionIs(profession));
        }
        if let Selector::Only(banned) = self.banned {
            predicates.push(PlayerPredicate::BannedIs(banned));
        }

        predicates
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerPredicate {
    NameContains(String),
    TitleContains(String),
    BirthdayBetween(i64, i64),
    ExperienceBetween(i32, i32),
    LevelBetween(i32, i32),
    RaceIs(Race),
    ProfessionIs(Profession),
    BannedIs(bool),
}

impl PlayerPredicate {
    /// In-memory evaluation. Substring matches are case-sensitive and literal.
    pub fn matches(&self, player: &Player) -> bool {
        let profile = &player.profile;
        match self {
            PlayerPredicate::NameContains(part) => profile.name.contains(part.as_str()),
            PlayerPredicate::TitleContains(part) => profile.title.contains(part.as_str()),
            PlayerPredicate::BirthdayBetween(after, before) => {
                (*after..=*before).contains(&profile.birthday.timestamp_millis())
            }
            PlayerPredicate::ExperienceBetween(min, max) => {
                (*min..=*max).contains(&profile.experience)
            }
            PlayerPredicate::LevelBetween(min, max) => (*min..=*max).contains(&player.progress.level),
            PlayerPredicate::RaceIs(race) => profile.race == *race,
            PlayerPredicate::ProfessionIs(profession) => profile.profession == *profession,
            PlayerPredicate::BannedIs(banned) => profile.banned == *banned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
    Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order: '{0}'")]
pub struct ParseOrderError(pub String);

impl FromStr for PlayerOrder {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ID" => Ok(PlayerOrder::Id),
            "NAME" => Ok(PlayerOrder::Name),
            "EXPERIENCE" => Ok(PlayerOrder::Experience),
            "BIRTHDAY" => Ok(PlayerOrder::Birthday),
            "LEVEL" => Ok(PlayerOrder::Level),
            _ => Err(ParseOrderError(s.trim().to_string())),
        }
    }
}

impl PlayerOrder {
    /// Ascending by the ordered field, ties broken by id.
    pub fn compare(&self, a: &Player, b: &Player) -> Ordering {
        let primary = match self {
            PlayerOrder::Id => Ordering::Equal,
            PlayerOrder::Name => a.profile.name.cmp(&b.profile.name),
            PlayerOrder::Experience => a.profile.experience.cmp(&b.profile.experience),
            PlayerOrder::Birthday => a.profile.birthday.cmp(&b.profile.birthday),
            PlayerOrder::Level => a.progress.level.cmp(&b.progress.level),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerQuery {
    pub predicates: Vec<PlayerPredicate>,
    pub order: PlayerOrder,
    pub pagination: Pagination,
}
