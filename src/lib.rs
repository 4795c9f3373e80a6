use std::sync::Arc;

use classify::Classifier;
use config::Config;
use content::StaticContent;
use credentials::CredentialStore;
use session::SessionRegistry;

pub mod classify;
pub mod config;
pub mod content;
pub mod credentials;
pub mod error;
pub mod middleware;
pub mod presenter;
pub mod router;
pub mod routes;
pub mod session;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub credentials: CredentialStore,
    pub sessions: SessionRegistry,
    pub classifier: Arc<dyn Classifier>,
    pub content: Arc<StaticContent>,
}

impl AppState {
    pub fn new(config: Config, classifier: Arc<dyn Classifier>, content: StaticContent) -> Self {
        Self {
            credentials: CredentialStore::new(config.credentials_path.clone()),
            sessions: SessionRegistry::new(),
            classifier,
            content: Arc::new(content),
            config,
        }
    }
}
