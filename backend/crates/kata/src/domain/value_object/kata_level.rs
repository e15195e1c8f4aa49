use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty of a kata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KataLevel {
    #[default]
    Basic,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid kata level: {0}")]
pub struct InvalidKataLevel(pub String);

impl KataLevel {
    pub const ALL: [KataLevel; 3] = [KataLevel::Basic, KataLevel::Medium, KataLevel::High];

    pub const fn code(&self) -> &'static str {
        match self {
            KataLevel::Basic => "Basic",
            KataLevel::Medium => "Medium",
            KataLevel::High => "High",
        }
    }

    /// Difficulty order, used when sorting by level
    pub const fn rank(&self) -> u8 {
        match self {
            KataLevel::Basic => 0,
            KataLevel::Medium => 1,
            KataLevel::High => 2,
        }
    }

    fn matching(raw: &str) -> Option<Self> {
        let upper = raw.to_uppercase();
        if upper.contains("BASIC") {
            Some(KataLevel::Basic)
        } else if upper.contains("MEDIUM") {
            Some(KataLevel::Medium)
        } else if upper.contains("HIGH") {
            Some(KataLevel::High)
        } else {
            None
        }
    }

    /// Body input: anything unrecognized is `Basic`
    pub fn from_lenient(raw: &str) -> Self {
        Self::matching(raw).unwrap_or_default()
    }

    /// Query filters: unrecognized input is an error
    pub fn parse_filter(raw: &str) -> Result<Self, InvalidKataLevel> {
        Self::matching(raw).ok_or_else(|| InvalidKataLevel(raw.to_string()))
    }

    /// Stored codes only
    pub fn from_code(code: &str) -> Result<Self, InvalidKataLevel> {
        Self::ALL
            .into_iter()
            .find(|level| level.code() == code)
            .ok_or_else(|| InvalidKataLevel(code.to_string()))
    }
}

impl fmt::Display for KataLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
