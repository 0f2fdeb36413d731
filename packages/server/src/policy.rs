//! Role allow-lists, one per operation.
//!
//! There is no role hierarchy: an operation admits exactly the roles listed
//! here, checked with [`AuthUser::require_role`](crate::extractors::auth::AuthUser::require_role).

use common::Role;

pub const CREATE_EVENT: &[Role] = &[Role::Organizer];
pub const LIST_ORGANIZED_EVENTS: &[Role] = &[Role::Organizer];
pub const UPDATE_EVENT_STATUS: &[Role] = &[Role::Organizer];

pub const CREATE_TEAM: &[Role] = &[Role::Participant];
pub const JOIN_TEAM: &[Role] = &[Role::Participant];
pub const LIST_OWN_TEAMS: &[Role] = &[Role::Participant];

pub const CREATE_SUBMISSION: &[Role] = &[Role::Participant];
/// Passing this check only allows the lookup; membership, event ownership
/// or the judge role decide visibility.
pub const READ_TEAM_SUBMISSION: &[Role] = &[Role::Organizer, Role::Participant, Role::Judge];
