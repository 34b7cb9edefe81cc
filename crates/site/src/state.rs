//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::db::InquiryStore;
use crate::services::{AdminGate, InquiryService, Notifier};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the inquiry store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    inquiries: InquiryService,
    notifier: Notifier,
    admin: AdminGate,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("notifier", &self.inner.notifier)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `store` - Inquiry store backend
    #[must_use]
    pub fn new(config: SiteConfig, store: Arc<dyn InquiryStore>) -> Self {
        let footer = format!("{} | {}", config.site_name, config.base_url);
        let notifier = Notifier::new(config.notify_webhook_url.clone(), Some(footer));
        let admin = AdminGate::new(&config.admin);

        Self {
            inner: Arc::new(AppStateInner {
                inquiries: InquiryService::new(store),
                notifier,
                admin,
                config,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the inquiry service.
    #[must_use]
    pub fn inquiries(&self) -> &InquiryService {
        &self.inner.inquiries
    }

    /// Get a reference to the new-inquiry notifier.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Get a reference to the admin session gate.
    #[must_use]
    pub fn admin(&self) -> &AdminGate {
        &self.inner.admin
    }
}
