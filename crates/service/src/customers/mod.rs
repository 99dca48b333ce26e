pub mod domain;
pub mod service;
pub mod store;

pub use domain::{Customer, UpdatedCustomer, UserId};
pub use service::CustomerService;
pub use store::CustomerStore;
