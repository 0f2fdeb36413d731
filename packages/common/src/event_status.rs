#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of an event.
///
/// Stages are totally ordered from [`EventStatus::Draft`] to
/// [`EventStatus::Completed`]. Organizers move an event forward explicitly;
/// deadlines stored on the event are advisory and never advance the status.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Being prepared by its organizer. Hidden from the public.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "draft"))]
    #[default]
    Draft,
    /// Published; participants may form teams.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "active"))]
    Active,
    /// Teams may still form, and may submit projects.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "submissions_open"))]
    SubmissionsOpen,
    /// No more teams or submissions.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "submissions_closed"))]
    SubmissionsClosed,
    /// Submissions are being evaluated.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "judging"))]
    Judging,
    /// Terminal.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "completed"))]
    Completed,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move event from '{from}' to '{to}'")]
pub struct TransitionError {
    pub from: EventStatus,
    pub to: EventStatus,
}

impl EventStatus {
    /// All statuses in lifecycle order.
    pub const ALL: &'static [EventStatus] = &[
        Self::Draft,
        Self::Active,
        Self::SubmissionsOpen,
        Self::SubmissionsClosed,
        Self::Judging,
        Self::Completed,
    ];

    /// Position of this status in the lifecycle, starting at 0 for `Draft`.
    pub fn ordinal(self) -> usize {
        match self {
            Self::Draft => 0,
            Self::Active => 1,
            Self::SubmissionsOpen => 2,
            Self::SubmissionsClosed => 3,
            Self::Judging => 4,
            Self::Completed => 5,
        }
    }

    /// The status that directly follows this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.ordinal() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the event appears in public listings.
    pub fn is_publicly_visible(self) -> bool {
        !matches!(self, Self::Draft)
    }

    /// Whether new teams may be created or joined.
    pub fn accepts_teams(self) -> bool {
        matches!(self, Self::Active | Self::SubmissionsOpen)
    }

    /// Whether teams may create their submission.
    pub fn accepts_submissions(self) -> bool {
        matches!(self, Self::SubmissionsOpen)
    }

    /// Transitions only move forward; skipping stages is allowed.
    pub fn can_transition_to(self, target: Self) -> bool {
        target.ordinal() > self.ordinal()
    }

    /// Validate a transition, returning the new status on success.
    pub fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: self,
                to: target,
            })
        }
    }

    /// Returns the wire representation (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::SubmissionsOpen => "submissions_open",
            Self::SubmissionsClosed => "submissions_closed",
            Self::Judging => "judging",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid status '{invalid}'. Valid values: draft, active, submissions_open, submissions_closed, judging, completed"
)]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for EventStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                invalid: s.to_string(),
            })
    }
}
