pub mod event;
pub mod submission;
pub mod team;
pub mod team_member;
pub mod user;
