//! Application shell for DomainMaster.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter injection),
//! the TOML configuration and the JSON file store. Batch refreshes run through
//! [`AppState::refresh_all`], which folds every refreshed record back into the store
//! as soon as it is produced.

pub mod adapters;
pub mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use domain_master_core::error::{CoreError, CoreResult};
use domain_master_core::services::{
    DEFAULT_REQUEST_DELAY, DomainService, RefreshHooks, RefreshService, ServiceContext,
};
use domain_master_core::traits::DomainRepository;
use domain_master_core::types::{
    Domain, LookupOutcome, RefreshProgress, RefreshSummary, UpdateStatus,
};
use domain_master_rdap::DomainLookup;

use crate::adapters::JsonDomainRepository;
use crate::config::AppConfig;

pub use domain_master_core::services::NoopRefreshHooks;

/// Application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds the store and the lookup client)
    pub ctx: Arc<ServiceContext>,
    /// Domain service
    pub domain_service: DomainService,
    /// Refresh service
    pub refresh_service: RefreshService,
}

impl AppState {
    /// Refresh every stored domain, in stored order.
    ///
    /// Each refreshed record is written to the store before the next lookup starts.
    /// An unexpected lookup error aborts the run; records refreshed up to that point stay saved.
    pub async fn refresh_all(&self, hooks: &dyn RefreshHooks) -> CoreResult<RefreshSummary> {
        let domains = self.domain_service.list().await?;
        self.run_refresh(domains, hooks).await
    }

    /// Refresh the named domains, in the given order.
    ///
    /// # Errors
    /// `DomainNotFound` if any name is not tracked; nothing is refreshed in that case.
    pub async fn refresh_names<S: AsRef<str>>(
        &self,
        names: &[S],
        hooks: &dyn RefreshHooks,
    ) -> CoreResult<RefreshSummary> {
        let stored = self.domain_service.list().await?;
        let mut selected: Vec<Domain> = Vec::with_capacity(names.len());
        for raw in names {
            let name = Domain::normalize_name(raw.as_ref());
            if selected.iter().any(|d| d.name == name) {
                continue;
            }
            let domain = stored
                .iter()
                .find(|d| d.name == name)
                .ok_or_else(|| CoreError::DomainNotFound(name.clone()))?;
            selected.push(domain.clone());
        }
        self.run_refresh(selected, hooks).await
    }

    async fn run_refresh(
        &self,
        domains: Vec<Domain>,
        hooks: &dyn RefreshHooks,
    ) -> CoreResult<RefreshSummary> {
        let total = domains.len();
        let folding = StoreFoldingHooks::new(&self.domain_service, hooks);

        match self.refresh_service.refresh_all(domains, &folding).await {
            Ok(_) => {
                let summary = folding.summary(total);
                log::info!(
                    "Refresh finished: {} processed, {} success, {} manual check{}",
                    summary.processed,
                    summary.success,
                    summary.manual_check,
                    if summary.cancelled { " (cancelled)" } else { "" }
                );
                Ok(summary)
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Refresh aborted: {e}");
                } else {
                    log::error!("Refresh aborted: {e}");
                }
                Err(e)
            }
        }
    }
}

/// Merges each lookup into the currently stored record, then forwards to the caller's hooks.
struct StoreFoldingHooks<'a> {
    domain_service: &'a DomainService,
    inner: &'a dyn RefreshHooks,
    success: AtomicUsize,
    manual_check: AtomicUsize,
}

impl<'a> StoreFoldingHooks<'a> {
    fn new(domain_service: &'a DomainService, inner: &'a dyn RefreshHooks) -> Self {
        Self {
            domain_service,
            inner,
            success: AtomicUsize::new(0),
            manual_check: AtomicUsize::new(0),
        }
    }

    fn summary(&self, total: usize) -> RefreshSummary {
        let success = self.success.load(Ordering::SeqCst);
        let manual_check = self.manual_check.load(Ordering::SeqCst);
        let processed = success + manual_check;
        RefreshSummary {
            processed,
            success,
            manual_check,
            cancelled: processed < total,
        }
    }
}

#[async_trait]
impl RefreshHooks for StoreFoldingHooks<'_> {
    async fn on_progress(&self, progress: &RefreshProgress) {
        self.inner.on_progress(progress).await;
    }

    async fn on_item_updated(&self, domain: &Domain, outcome: &LookupOutcome) -> CoreResult<()> {
        let stored = self.domain_service.apply_refreshed(domain, outcome).await?;
        match outcome.update_status() {
            UpdateStatus::Success => self.success.fetch_add(1, Ordering::SeqCst),
            UpdateStatus::ManualCheck => self.manual_check.fetch_add(1, Ordering::SeqCst),
        };
        // 回调拿到的是存储中的最新记录（含批次期间的用户编辑）
        self.inner
            .on_item_updated(stored.as_ref().unwrap_or(domain), outcome)
            .await
    }

    fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `domain_repository`: how domain records are stored
/// - `lookup`: how registration data is fetched
///
/// # Optional
/// - `request_delay`: pause after each refreshed item, defaults to one second
pub struct AppStateBuilder {
    domain_repository: Option<Arc<dyn DomainRepository>>,
    lookup: Option<Arc<dyn DomainLookup>>,
    request_delay: Duration,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            domain_repository: None,
            lookup: None,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Builder wired from configuration: JSON file store and RDAP client.
    ///
    /// # Errors
    /// Returns the RDAP client's configuration error (e.g. an invalid base URL).
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let client = config.rdap.build_client()?;
        let data_file = config.storage.data_file();
        log::debug!(
            "Using data file {} and resolver {}",
            data_file.display(),
            client.base_url()
        );
        Ok(Self::new()
            .domain_repository(Arc::new(JsonDomainRepository::new(data_file)))
            .lookup(Arc::new(client))
            .request_delay(config.rdap.request_delay()))
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn DomainRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn lookup(mut self, lookup: Arc<dyn DomainLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    #[must_use]
    pub const fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let domain_repository = self.domain_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_repository is required".to_string())
        })?;
        let lookup = self
            .lookup
            .ok_or_else(|| CoreError::ValidationError("lookup is required".to_string()))?;

        let ctx = Arc::new(ServiceContext::new(domain_repository, Arc::clone(&lookup)));
        let domain_service = DomainService::new(Arc::clone(&ctx));
        let refresh_service = RefreshService::new(lookup).with_delay(self.request_delay);

        Ok(AppState {
            ctx,
            domain_service,
            refresh_service,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
