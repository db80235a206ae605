//! HTTP request handlers.
//!
//! Every resource follows the same shape: a collection route (`GET` list, `POST` create) and an
//! item route (`GET`, `PATCH`, `DELETE`). Item handlers resolve the record first, answering 404
//! when it is absent, and pass the found record on to the verb-specific work. Records are
//! sanitized on the way out, never on the way in.

pub mod articles;
pub mod comments;
pub mod users;
