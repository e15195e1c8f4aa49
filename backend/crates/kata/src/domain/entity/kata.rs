use chrono::{DateTime, Utc};
use kernel::id::{KataId, UserId};

use crate::domain::value_object::{
    kata_level::KataLevel, kata_name::KataName, kata_stars::KataStars,
};

/// Editable kata fields (create and full update)
#[derive(Debug, Clone)]
pub struct KataDraft {
    pub name: KataName,
    pub description: String,
    pub level: KataLevel,
    pub intents: i32,
    pub solution: String,
}

/// Kata document
#[derive(Debug, Clone, PartialEq)]
pub struct Kata {
    pub kata_id: KataId,
    pub name: KataName,
    pub description: String,
    pub level: KataLevel,
    pub intents: i32,
    pub stars: KataStars,
    pub creator: UserId,
    pub solution: String,
    /// Unique, insertion order
    pub participants: Vec<UserId>,
    /// Stored object names
    pub files: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Kata {
    pub fn create(draft: KataDraft, creator: UserId, participants: Vec<UserId>) -> Self {
        let now = Utc::now();
        let mut kata = Self {
            kata_id: KataId::new(),
            name: draft.name,
            description: draft.description,
            level: draft.level,
            intents: draft.intents,
            stars: KataStars::default(),
            creator,
            solution: draft.solution,
            participants: Vec::with_capacity(participants.len()),
            files: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        for participant in participants {
            kata.push_participant(participant);
        }
        kata
    }

    /// Overwrite the editable fields; stars, participants, files and creator stay
    pub fn apply(&mut self, draft: KataDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.level = draft.level;
        self.intents = draft.intents;
        self.solution = draft.solution;
        self.touch();
    }

    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }

    /// `false` if already a participant
    pub fn join(&mut self, user: UserId) -> bool {
        let added = self.push_participant(user);
        if added {
            self.touch();
        }
        added
    }

    pub fn rate(&mut self, user: UserId, stars: u8) {
        self.stars.rate(user, stars);
        self.touch();
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    pub fn attach_files(&mut self, names: impl IntoIterator<Item = String>) {
        for name in names {
            if !self.has_file(&name) {
                self.files.push(name);
            }
        }
        self.touch();
    }

    fn push_participant(&mut self, user: UserId) -> bool {
        if self.is_participant(&user) {
            return false;
        }
        self.participants.push(user);
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
