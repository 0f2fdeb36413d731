pub mod auth;
pub mod event;
pub mod shared;
pub mod submission;
pub mod team;
