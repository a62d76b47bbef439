/// Upper bound for a player's experience, inclusive.
pub const MAX_EXPERIENCE: i32 = 10_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub level: i32,
    pub until_next_level: i32,
}

impl Progress {
    /// Negative experience counts as zero.
    pub fn from_experience(experience: i32) -> Self {
        let experience = i64::from(experience.max(0));
        let root = ((2500 + 200 * experience) as f64).sqrt() as i64;
        let level = (root - 50) / 100;
        let until_next_level = 50 * (level + 1) * (level + 2) - experience;
        Progress {
            level: level as i32,
            until_next_level: until_next_level as i32,
        }
    }
}
