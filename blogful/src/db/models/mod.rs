//! Database record and request types.
//!
//! Each table has three shapes: a create request (fields the client supplies), an update request
//! (every column optional, `None` meaning "keep the stored value") and a response (a full row).

pub mod articles;
pub mod comments;
pub mod users;
