//! Shared application state.

use std::sync::Arc;

use crate::auth::{Authenticator, ConfigTokens, DisabledSessions};
use crate::config::ServerConfig;
use crate::shopify::{AdminClient, ShopifyApi};

/// Application state shared across all request handlers.
///
/// Cheap to clone; all fields are behind a single `Arc` and immutable after
/// startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ServerConfig,
    authenticator: Authenticator,
    shopify: Arc<dyn ShopifyApi>,
}

impl AppState {
    /// Build production state from configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let authenticator = Authenticator::new(
            config.intake.clone(),
            config.shopify.store.clone(),
            Box::new(ConfigTokens::new(
                config.shopify.store.clone(),
                config.shopify.access_token.clone(),
            )),
            Box::new(DisabledSessions),
        );
        let shopify = Arc::new(AdminClient::new(config.shopify.api_version.clone()));

        Self::with_parts(config, authenticator, shopify)
    }

    /// Build state from explicit collaborators. Tests inject fakes here.
    #[must_use]
    pub fn with_parts(
        config: ServerConfig,
        authenticator: Authenticator,
        shopify: Arc<dyn ShopifyApi>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                authenticator,
                shopify,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.authenticator
    }

    #[must_use]
    pub fn shopify(&self) -> &dyn ShopifyApi {
        self.inner.shopify.as_ref()
    }
}
