use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::layout::PageConfig;
use crate::media::MediaStore;
use crate::store::{AccountRepository, PortfolioRepository};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub portfolio: Arc<dyn PortfolioRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub media: Arc<dyn MediaStore>,
    pub config: Config,
    /// Page geometry and typefaces for the PDF export.
    pub page_config: PageConfig,
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::auth::session::memory::MemorySessionStore;
    use crate::layout::default_page_config;
    use crate::media::memory::MemoryMediaStore;
    use crate::store::memory::MemoryStore;

    /// Handles onto the in-memory backends behind a test `AppState`.
    pub struct TestBackends {
        pub store: MemoryStore,
        pub sessions: MemorySessionStore,
        pub media: MemoryMediaStore,
    }

    pub fn test_state_with(config: Config) -> (AppState, TestBackends) {
        let store = MemoryStore::default();
        let sessions = MemorySessionStore::default();
        let media = MemoryMediaStore::default();
        let state = AppState {
            portfolio: Arc::new(store.clone()),
            accounts: Arc::new(store.clone()),
            sessions: Arc::new(sessions.clone()),
            media: Arc::new(media.clone()),
            config,
            page_config: default_page_config(),
        };
        (
            state,
            TestBackends {
                store,
                sessions,
                media,
            },
        )
    }

    pub fn test_state() -> (AppState, TestBackends) {
        test_state_with(Config::for_tests())
    }
}
