//! Base repository trait for database operations.

use crate::db::errors::Result;

/// Base repository trait providing common database operations.
///
/// A repository is the data access layer for one table. It has separate associated types for
/// create requests, update requests and responses, and is object safe so the application state
/// can hold either the PostgreSQL or the in-memory implementation behind an `Arc<dyn _>`.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// The request type for creating entities
    type CreateRequest: Send + Sync;

    /// The request type for updating entities
    type UpdateRequest: Send + Sync;

    /// The response/DTO type returned by operations
    type Response: Send;

    /// The identifier type for lookups
    type Id: Send + Sync + Copy;

    /// Create a new entity. The store assigns the id and creation timestamp.
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List every entity in insertion order
    async fn list(&self) -> Result<Vec<Self::Response>>;

    /// Apply the supplied fields of `request` to the entity. Callers check existence first.
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<()>;

    /// Delete an entity by ID
    async fn delete(&self, id: Self::Id) -> Result<()>;
}
