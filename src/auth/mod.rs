//! Caller identity and role
//!
//! Identity and the data-owner role are asserted by headers set by the
//! gateway in front of this service; they are not verified here.

mod caller;

pub use caller::Caller;

/// Header carrying the caller's user name
pub const USER_HEADER: &str = "x-user";

/// Header carrying the data-owner role as a JSON boolean
pub const DATA_OWNER_HEADER: &str = "x-data-owner";
