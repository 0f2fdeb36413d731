pub mod credentials;
pub mod event;
pub mod hash;
pub mod jwt;
pub mod team;
