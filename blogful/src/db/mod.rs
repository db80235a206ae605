//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL, plus an in-memory
//! backend with the same behaviour for tests and database-less runs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │  Arc<dyn Repository<..>>
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers for PostgreSQL, db::in_memory)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: PostgreSQL repository implementations for CRUD operations
//! - [`in_memory`]: In-process repositories sharing one set of tables
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Referential integrity
//!
//! Both backends enforce the same rules: an article's author must be an existing user and is
//! cleared when that user is deleted; comments must reference an existing article and user and
//! are removed with either; usernames are unique.

pub mod errors;
pub mod handlers;
pub mod in_memory;
pub mod models;
