use std::sync::Arc;

use service::{CustomerService, CustomerStore};

use crate::identity::{HeaderIdentity, IdentifyCaller};

#[derive(Clone)]
pub struct AppState {
    pub customers: CustomerService,
    pub identity: Arc<dyn IdentifyCaller>,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self {
            customers: CustomerService::new(store),
            identity: Arc::new(HeaderIdentity::default()),
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentifyCaller>) -> Self {
        self.identity = identity;
        self
    }
}
