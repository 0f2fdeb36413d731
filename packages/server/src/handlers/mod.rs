pub mod auth;
pub mod event;
pub mod submission;
pub mod team;
