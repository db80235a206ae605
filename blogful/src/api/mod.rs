//! HTTP API: request handlers, request/response models and extractors.

pub mod extract;
pub mod handlers;
pub mod models;
