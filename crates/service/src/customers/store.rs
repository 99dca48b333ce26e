use async_trait::async_trait;
use serde_json::{Map, Value};

use super::domain::{Customer, UserId};
use crate::errors::ServiceError;

/// Per-user partitioned customer storage.
/// Implementations can be in-memory, file-backed, or remote KV; every
/// operation is scoped to a single user's partition.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Create an empty partition for `user` if it has none. Idempotent.
    async fn ensure_partition(&self, user: &UserId);

    /// All customers of `user`, in no particular order.
    async fn list(&self, user: &UserId) -> Vec<Customer>;

    async fn get(&self, user: &UserId, id: &str) -> Option<Customer>;

    /// Store `customer` under its `id`, replacing any previous record with that id.
    async fn upsert(&self, user: &UserId, customer: Customer) -> Result<Customer, ServiceError>;

    /// Merge `patch` into an existing record. `Ok(None)` when the record does not exist.
    async fn merge(
        &self,
        user: &UserId,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<Customer>, ServiceError>;

    /// Remove a record; returns whether it existed.
    async fn remove(&self, user: &UserId, id: &str) -> Result<bool, ServiceError>;
}
