#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an identity. Fixed at registration.
///
/// Roles form a closed set with no hierarchy: an operation lists every role
/// it admits, see [`Role::is_in`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates and runs events.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "organizer"))]
    Organizer,
    /// Forms teams and submits projects.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "participant"))]
    Participant,
    /// Reviews submissions.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "judge"))]
    Judge,
}

impl Role {
    pub const ALL: &'static [Role] = &[Self::Organizer, Self::Participant, Self::Judge];

    /// Membership test against an operation's allow-list.
    pub fn is_in(self, allowed: &[Role]) -> bool {
        allowed.contains(&self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organizer => "organizer",
            Self::Participant => "participant",
            Self::Judge => "judge",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role '{0}'. Valid values: organizer, participant, judge")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organizer" => Ok(Self::Organizer),
            "participant" => Ok(Self::Participant),
            "judge" => Ok(Self::Judge),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}
