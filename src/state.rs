//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::channels::{self, Channel};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Vec<Channel>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: Arc::new(channels::builtin_catalog()),
        }
    }
}
