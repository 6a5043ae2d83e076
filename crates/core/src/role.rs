use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Platform roles. The set is a fixed contract shared with the external
/// auth collaborator; menu configuration is partitioned by these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Enrolled learner.
    Student,
    /// Course professor / content creator.
    Professor,
    /// Tutor assigned to student groups.
    Tutor,
    /// Establishment director.
    Director,
    /// Deputy establishment director.
    DeputyDirector,
    /// Platform administrator.
    Administrator,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professor => "professor",
            Self::Tutor => "tutor",
            Self::Director => "director",
            Self::DeputyDirector => "deputy_director",
            Self::Administrator => "administrator",
        }
    }

    /// Returns all known roles in bootstrap order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Student,
            Role::Professor,
            Role::Tutor,
            Role::Director,
            Role::DeputyDirector,
            Role::Administrator,
        ];

        ALL
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "professor" => Ok(Self::Professor),
            "tutor" => Ok(Self::Tutor),
            "director" => Ok(Self::Director),
            "deputy_director" => Ok(Self::DeputyDirector),
            "administrator" => Ok(Self::Administrator),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}
