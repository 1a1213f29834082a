//! Config-driven provider that rebuilds itself when sizes change.

use std::sync::Arc;

use lodestone_config::{ConfigStore, ReloadListener};
use parking_lot::RwLock;
use tracing::{info, warn};

use super::provider::ClusterShapeProvider;
use super::size::ClusterSizeConfig;
use crate::error::ProceduralResult;
use crate::noise::WorldSeed;

/// A [`ClusterShapeProvider`] whose size configuration follows a config category.
///
/// Register it with [`ConfigStore::register`]; every reload re-reads the four
/// size keys and swaps in a new provider that keeps the old noise field. A
/// reload with invalid sizes is logged and the previous provider stays active.
#[derive(Debug)]
pub struct ReloadableProvider {
    category: String,
    current: RwLock<Arc<ClusterShapeProvider>>,
}

impl ReloadableProvider {
    /// Reads `category` from `store` and builds the first provider.
    ///
    /// # Errors
    ///
    /// Any error of [`ClusterSizeConfig::from_store`].
    pub fn new(store: &ConfigStore, category: &str, seed: WorldSeed) -> ProceduralResult<Self> {
        let size = ClusterSizeConfig::from_store(store, category)?;
        let provider = ClusterShapeProvider::new(size, seed)?;
        Ok(Self {
            category: category.to_owned(),
            current: RwLock::new(Arc::new(provider)),
        })
    }

    /// The provider in effect right now.
    ///
    /// Shapes already derived keep working after a reload.
    #[must_use]
    pub fn current(&self) -> Arc<ClusterShapeProvider> {
        Arc::clone(&*self.current.read())
    }

    /// Config category this provider reads its sizes from.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl ReloadListener for ReloadableProvider {
    fn reload(&self, config: &ConfigStore) {
        let rebuilt = ClusterSizeConfig::from_store(config, &self.category).and_then(|size| {
            let noise = Arc::clone(self.current.read().noise());
            ClusterShapeProvider::with_shared_noise(size, noise)
        });

        match rebuilt {
            Ok(provider) => {
                info!(category = %self.category, size = ?provider.size_config(), "cluster sizes reloaded");
                *self.current.write() = Arc::new(provider);
            }
            Err(error) => {
                warn!(category = %self.category, %error, "keeping previous cluster sizes");
            }
        }
    }
}
