use std::sync::Arc;

use log::Logger;

use crate::origin::AllowList;
use crate::store::MovieStore;

pub type SafeStore = dyn MovieStore + Send + Sync;

/// Everything a handler needs, cloned into each route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub store: Arc<SafeStore>,
    pub origins: Arc<AllowList>,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, store: Arc<SafeStore>, origins: Arc<AllowList>) -> Self {
        Self {
            logger,
            store,
            origins,
        }
    }
}
