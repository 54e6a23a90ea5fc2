//! Application state shared by front ends.

use std::sync::Arc;

use crate::accounts::AccountService;
use crate::catalog::{CatalogClient, CatalogError, Renderer};
use crate::config::BookpediaConfig;
use crate::session::{CartSession, Prompter};
use crate::storage::{FileStorage, Storage};

/// Application state shared across commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// storage profile, catalog client and account service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BookpediaConfig,
    storage: Arc<dyn Storage>,
    catalog: CatalogClient,
    accounts: AccountService,
    renderer: Renderer,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state backed by the configured profile directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn new(config: BookpediaConfig) -> Result<Self, CatalogError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(config.profile_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create application state over an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn with_storage(
        config: BookpediaConfig,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let accounts = AccountService::new(Arc::clone(&storage));
        let renderer = Renderer::new(config.catalog.covers_url.as_str());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                catalog,
                accounts,
                renderer,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &BookpediaConfig {
        &self.inner.config
    }

    /// Get the storage backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    /// Get a reference to the listing renderer.
    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }

    /// Start a cart session over this state's storage, with the account
    /// service as identity source.
    #[must_use]
    pub fn cart_session(&self, prompter: Box<dyn Prompter>) -> CartSession {
        CartSession::initialize(
            Arc::clone(&self.inner.storage),
            Arc::new(self.inner.accounts.clone()),
            prompter,
        )
    }
}
