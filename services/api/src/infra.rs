use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use brand_board::accounts::{AccountService, PasswordHasher, SessionDirectory, TokenAuthority};
use brand_board::brands::BrandService;
use brand_board::config::AppConfig;
use brand_board::contacts::ContactService;
use brand_board::error::ApiError;
use brand_board::leaderboard::LeaderboardState;
use brand_board::notify::LogNotifier;
use brand_board::store::{MemoryImageStore, MemoryStore};
use brand_board::subscribers::SubscriberService;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every feature service wired to one shared in-process store.
pub(crate) struct Platform {
    pub(crate) authority: Arc<TokenAuthority>,
    pub(crate) sessions: Arc<dyn SessionDirectory>,
    pub(crate) images: Arc<MemoryImageStore>,
    pub(crate) accounts: Arc<AccountService<MemoryStore>>,
    pub(crate) brands: Arc<BrandService<MemoryStore, MemoryImageStore>>,
    pub(crate) leaderboard: LeaderboardState<MemoryStore>,
    pub(crate) contacts: Arc<ContactService<MemoryStore, LogNotifier>>,
    pub(crate) subscribers: Arc<SubscriberService<MemoryStore>>,
}

impl Platform {
    pub(crate) fn build(config: &AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let images = Arc::new(MemoryImageStore::new(config.media.public_base_url.clone()));
        let authority = Arc::new(TokenAuthority::from_config(&config.auth));
        let sessions: Arc<dyn SessionDirectory> = store.clone();

        Self {
            accounts: Arc::new(AccountService::new(
                store.clone(),
                authority.clone(),
                PasswordHasher::new(config.auth.bcrypt_cost),
            )),
            brands: Arc::new(BrandService::new(store.clone(), images.clone())),
            leaderboard: LeaderboardState::new(store.clone()),
            contacts: Arc::new(ContactService::new(
                store.clone(),
                Arc::new(LogNotifier),
                config.notifications.notify_email.clone(),
            )),
            subscribers: Arc::new(SubscriberService::new(store)),
            authority,
            sessions,
            images,
        }
    }

    /// Create the configured admin account when it does not exist yet.
    pub(crate) fn bootstrap_admin(&self, config: &AppConfig) -> Result<(), ApiError> {
        if let Some(admin) = &config.auth.bootstrap_admin {
            let user = self.accounts.ensure_admin(&admin.email, &admin.password)?;
            info!(user_id = %user.id, "bootstrap admin available");
        }
        Ok(())
    }
}
