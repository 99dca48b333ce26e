//! Service layer for the per-user customer registry.
//! - `customers` holds the domain types, the `CustomerStore` seam and the operations.
//! - `storage` holds store implementations.

pub mod customers;
pub mod errors;
pub mod storage;

pub use customers::{Customer, CustomerService, CustomerStore, UpdatedCustomer, UserId};
pub use errors::ServiceError;
pub use storage::Registry;
