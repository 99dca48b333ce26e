use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::domain::{Customer, UpdatedCustomer, UserId, ID_KEY};
use super::store::CustomerStore;
use crate::errors::ServiceError;

pub const MISSING_CUSTOMER_ON_ADD: &str = "Request body should contain \"customer\" object.";
pub const MISSING_CUSTOMER_ON_UPDATE: &str = "Invalid request body.";
pub const INVALID_CUSTOMER_ID: &str = "Customer id must be a string or number.";
pub const IMMUTABLE_CUSTOMER_ID: &str = "Customer id cannot be changed.";
pub const MISSING_CUSTOMER_ID: &str = "Customer ID is required.";
pub const NO_SUCH_CUSTOMER: &str = "No such customer.";

/// The five customer operations, each confined to the caller's partition.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// Make sure `user` owns a partition. Runs once per identified request.
    pub async fn identify(&self, user: &UserId) {
        self.store.ensure_partition(user).await;
    }

    /// Store `customer`, generating an id when none is supplied.
    /// An existing record with the same id is replaced.
    pub async fn add(
        &self,
        user: &UserId,
        customer: Option<Value>,
    ) -> Result<Customer, ServiceError> {
        let mut fields = customer_object(customer)
            .ok_or_else(|| ServiceError::Validation(MISSING_CUSTOMER_ON_ADD.into()))?;
        let id = match normalize_id(fields.get(ID_KEY))? {
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };
        fields.insert(ID_KEY.to_string(), Value::String(id.clone()));

        let stored = self.store.upsert(user, Customer::from_fields(fields)).await?;
        debug!(user_id = %user, customer_id = %id, "customer stored");
        Ok(stored)
    }

    pub async fn list(&self, user: &UserId) -> Vec<Customer> {
        self.store.list(user).await
    }

    pub async fn show(&self, user: &UserId, id: &str) -> Result<Customer, ServiceError> {
        self.store
            .get(user, id)
            .await
            .ok_or_else(|| ServiceError::customer_not_found(id))
    }

    /// Overwrite the supplied keys on an existing record.
    pub async fn update(
        &self,
        user: &UserId,
        id: Option<&str>,
        customer: Option<Value>,
    ) -> Result<UpdatedCustomer, ServiceError> {
        let mut patch = customer_object(customer)
            .ok_or_else(|| ServiceError::Validation(MISSING_CUSTOMER_ON_UPDATE.into()))?;
        let id = id.ok_or_else(|| ServiceError::MissingParameter(MISSING_CUSTOMER_ID.into()))?;

        if patch.contains_key(ID_KEY) {
            match normalize_id(patch.get(ID_KEY))? {
                Some(new_id) if new_id == id => {
                    patch.insert(ID_KEY.to_string(), Value::String(new_id));
                }
                _ => return Err(ServiceError::Validation(IMMUTABLE_CUSTOMER_ID.into())),
            }
        }

        let updated_keys: Vec<String> = patch.keys().cloned().collect();
        let customer = self
            .store
            .merge(user, id, patch)
            .await?
            .ok_or_else(|| ServiceError::customer_not_found(id))?;
        debug!(user_id = %user, customer_id = %id, keys = updated_keys.len(), "customer updated");
        Ok(UpdatedCustomer { customer, updated_keys })
    }

    /// Remove a record and return its id.
    pub async fn delete(&self, user: &UserId, id: Option<&str>) -> Result<String, ServiceError> {
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::Validation(String::new()))?;
        if !self.store.remove(user, id).await? {
            return Err(ServiceError::NotFound(NO_SUCH_CUSTOMER.into()));
        }
        debug!(user_id = %user, customer_id = %id, "customer deleted");
        Ok(id.to_string())
    }
}

fn customer_object(value: Option<Value>) -> Option<Map<String, Value>> {
    match value {
        Some(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

/// `Ok(None)` means "generate one": the key is absent, null or an empty string.
fn normalize_id(value: Option<&Value>) -> Result<Option<String>, ServiceError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(ServiceError::Validation(INVALID_CUSTOMER_ID.into())),
    }
}
