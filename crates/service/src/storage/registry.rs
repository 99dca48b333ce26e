use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};

use crate::customers::{Customer, CustomerStore, UserId};
use crate::errors::ServiceError;

/// Process-wide in-memory store of all partitions.
///
/// Sharded per user: operations on one user's partition are serialised by the
/// shard lock, different users do not contend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct Registry {
    partitions: DashMap<UserId, HashMap<String, Customer>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_partition(&self, user: &UserId) -> bool {
        self.partitions.contains_key(user)
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}

#[async_trait]
impl CustomerStore for Registry {
    async fn ensure_partition(&self, user: &UserId) {
        self.partitions.entry(user.clone()).or_default();
    }

    async fn list(&self, user: &UserId) -> Vec<Customer> {
        self.partitions
            .get(user)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn get(&self, user: &UserId, id: &str) -> Option<Customer> {
        self.partitions.get(user).and_then(|p| p.get(id).cloned())
    }

    async fn upsert(&self, user: &UserId, customer: Customer) -> Result<Customer, ServiceError> {
        let id = customer
            .id()
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Storage("customer has no id".into()))?;
        let mut partition = self.partitions.entry(user.clone()).or_default();
        partition.insert(id, customer.clone());
        Ok(customer)
    }

    async fn merge(
        &self,
        user: &UserId,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<Customer>, ServiceError> {
        let Some(mut partition) = self.partitions.get_mut(user) else {
            return Ok(None);
        };
        let Some(customer) = partition.get_mut(id) else {
            return Ok(None);
        };
        customer.merge(patch);
        Ok(Some(customer.clone()))
    }

    async fn remove(&self, user: &UserId, id: &str) -> Result<bool, ServiceError> {
        Ok(self
            .partitions
            .get_mut(user)
            .map(|mut p| p.remove(id).is_some())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn customer(v: Value) -> Customer {
        serde_json::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn registry_crud_within_partition() -> Result<(), anyhow::Error> {
        let store = Registry::new();
        let u = user("alice");

        // initially empty
        assert!(store.list(&u).await.is_empty());

        store.upsert(&u, customer(json!({"id": "a", "name": "Ann"}))).await?;
        store.upsert(&u, customer(json!({"id": "b", "name": "Bob"}))).await?;
        assert_eq!(store.list(&u).await.len(), 2);
        assert_eq!(store.get(&u, "a").await.unwrap().get("name"), Some(&json!("Ann")));

        // upsert replaces the whole record
        store.upsert(&u, customer(json!({"id": "a"}))).await?;
        assert_eq!(store.get(&u, "a").await.unwrap().get("name"), None);

        let merged = store
            .merge(&u, "b", json!({"name": "Bobby"}).as_object().cloned().unwrap())
            .await?
            .unwrap();
        assert_eq!(merged.get("name"), Some(&json!("Bobby")));

        assert!(store.remove(&u, "b").await?);
        assert!(!store.remove(&u, "b").await?);
        assert!(store.get(&u, "b").await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn partitions_are_isolated() -> Result<(), anyhow::Error> {
        let store = Registry::new();
        store.upsert(&user("u1"), customer(json!({"id": "c1"}))).await?;

        let other = user("u2");
        assert!(store.get(&other, "c1").await.is_none());
        assert!(store.list(&other).await.is_empty());
        assert!(store.merge(&other, "c1", Map::new()).await?.is_none());
        assert!(!store.remove(&other, "c1").await?);
        assert!(store.get(&user("u1"), "c1").await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn ensure_partition_is_idempotent() {
        let store = Registry::new();
        let u = user("u1");
        assert!(!store.has_partition(&u));
        store.ensure_partition(&u).await;
        store.ensure_partition(&u).await;
        assert!(store.has_partition(&u));
        assert_eq!(store.partition_count(), 1);
    }

    #[tokio::test]
    async fn upsert_without_id_fails() {
        let store = Registry::new();
        let res = store.upsert(&user("u1"), customer(json!({"name": "x"}))).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
    }
}
