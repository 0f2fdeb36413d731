pub mod event_status;
pub mod role;

pub use event_status::{EventStatus, TransitionError};
pub use role::Role;
