use std::sync::Arc;
use tracing::debug;

use crate::config::Config;
use crate::core::sources::SourceManager;
use crate::core::transport::{HttpTransport, ReqwestTransport};
use crate::core::translation::TranslationManager;
use crate::error::Result;

/// Builds the managers from one config and one shared transport
pub struct SimpleServices {
    config: Arc<Config>,
    transport: Arc<dyn HttpTransport>,
}

impl SimpleServices {
    pub fn new(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.proxy_settings())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn create_source_manager(&self) -> SourceManager {
        debug!("Creating source manager");
        SourceManager::new(self.transport.clone(), &self.config.source_settings())
    }

    pub fn create_translation_manager(&self) -> TranslationManager {
        debug!("Creating translation manager");
        TranslationManager::new(&self.config, self.transport.clone())
    }
}
