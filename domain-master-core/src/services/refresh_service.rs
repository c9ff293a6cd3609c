//! 批量 RDAP 刷新服务
//!
//! 按原有顺序逐个查询，每项之后固定等待，不做并发。
//! 服务只修改自己的工作副本，写回存储由调用方通过 [`RefreshHooks`] 完成。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use domain_master_rdap::{DomainLookup, LookupOutcome};

use crate::error::CoreResult;
use crate::types::{Domain, RefreshProgress};

/// 每次查询后的默认等待
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// 刷新过程回调
///
/// 所有方法都有默认实现，调用方按需覆盖。
#[async_trait]
pub trait RefreshHooks: Send + Sync {
    /// 每项查询之前调用
    async fn on_progress(&self, _progress: &RefreshProgress) {}

    /// 每项合并完成后立即调用；返回错误会中止整批
    ///
    /// `domain` 是合并到批次开始时快照上的结果，`outcome` 是本次查询结果本身，
    /// 写回存储时应将 `outcome` 合并到当前存储的记录上。
    async fn on_item_updated(&self, _domain: &Domain, _outcome: &LookupOutcome) -> CoreResult<()> {
        Ok(())
    }

    /// 每项开始前检查，返回 `true` 则提前结束
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// 空回调
pub struct NoopRefreshHooks;

#[async_trait]
impl RefreshHooks for NoopRefreshHooks {}

/// 批量刷新服务
pub struct RefreshService {
    lookup: Arc<dyn DomainLookup>,
    delay: Duration,
}

impl RefreshService {
    #[must_use]
    pub fn new(lookup: Arc<dyn DomainLookup>) -> Self {
        Self {
            lookup,
            delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// 设置每项之后的等待时长
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// 刷新单个记录（不等待）
    pub async fn refresh_one(&self, domain: &Domain) -> CoreResult<Domain> {
        let (merged, _) = self.lookup_and_merge(domain).await?;
        Ok(merged)
    }

    async fn lookup_and_merge(&self, domain: &Domain) -> CoreResult<(Domain, LookupOutcome)> {
        let outcome = self.lookup.lookup(&domain.name).await?;
        log::info!(
            "[Refresh] {}: {}",
            domain.name,
            outcome.update_status()
        );
        Ok((domain.with_lookup(&outcome, Utc::now()), outcome))
    }

    /// 依次刷新整个集合
    ///
    /// 返回完整的集合：已处理的记录为合并后的版本，其余保持不变。
    /// 查询返回 `Err` 时整批中止并向上传播，之前已通过回调发出的记录保持更新。
    pub async fn refresh_all(
        &self,
        domains: Vec<Domain>,
        hooks: &dyn RefreshHooks,
    ) -> CoreResult<Vec<Domain>> {
        let total = domains.len();
        log::info!(
            "[Refresh] Starting refresh of {total} domain(s), delay {}ms",
            self.delay.as_millis()
        );

        let mut updated = domains;
        for index in 0..total {
            if hooks.is_cancelled() {
                log::info!("[Refresh] Cancelled after {index} of {total}");
                return Ok(updated);
            }

            let name = updated[index].name.clone();
            hooks
                .on_progress(&RefreshProgress {
                    current: index + 1,
                    total,
                    domain: name.clone(),
                })
                .await;

            let (merged, outcome) = match self.lookup_and_merge(&updated[index]).await {
                Ok(pair) => pair,
                Err(e) => {
                    log::error!("[Refresh] Aborting at {name} ({}/{total}): {e}", index + 1);
                    return Err(e);
                }
            };
            hooks.on_item_updated(&merged, &outcome).await?;
            updated[index] = merged;

            tokio::time::sleep(self.delay).await;
        }

        log::info!("[Refresh] Finished {total} domain(s)");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use domain_master_rdap::{LookupOutcome, RdapError, RdapRecord, UpdateStatus};
    use tokio::time::Instant;

    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::{RecordingHooks, ScriptedLookup, domain_named};
    use crate::types::DomainStatus;

    fn success(registrar: Option<&str>) -> LookupOutcome {
        LookupOutcome::Success(RdapRecord {
            registration_date: NaiveDate::from_ymd_opt(2020, 1, 15),
            expiration_date: NaiveDate::from_ymd_opt(2027, 1, 15),
            registrar: registrar.map(ToString::to_string),
            raw: "{}".to_string(),
        })
    }

    fn portfolio(names: &[&str]) -> Vec<Domain> {
        names.iter().map(|name| domain_named(name)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn progress_and_updates_follow_input_order() {
        let lookup = Arc::new(
            ScriptedLookup::new()
                .with("a.com", Ok(success(Some("Registrar A"))))
                .with("b.com", Ok(LookupOutcome::NotFound { status: 404 })),
        );
        let service = RefreshService::new(lookup.clone());
        let hooks = RecordingHooks::default();

        let result = service
            .refresh_all(portfolio(&["a.com", "b.com", "c.cn"]), &hooks)
            .await
            .unwrap();

        let progress = hooks.progress();
        assert_eq!(
            progress.iter().map(|p| p.current).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert!(progress.iter().all(|p| p.total == 3));
        assert_eq!(
            progress.iter().map(|p| p.domain.as_str()).collect::<Vec<_>>(),
            ["a.com", "b.com", "c.cn"]
        );
        assert_eq!(hooks.updated().len(), 3);
        assert_eq!(lookup.calls(), ["a.com", "b.com", "c.cn"]);

        assert_eq!(result[0].registrar, "Registrar A");
        assert_eq!(result[0].update_status, Some(UpdateStatus::Success));
        assert_eq!(result[1].update_status, Some(UpdateStatus::ManualCheck));
        assert!(result.iter().all(|d| d.last_updated.is_some()));
        assert_eq!(hooks.updated(), result);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_after_every_item() {
        let service = RefreshService::new(Arc::new(ScriptedLookup::new()))
            .with_delay(Duration::from_millis(1500));
        let started = Instant::now();

        service
            .refresh_all(portfolio(&["a.com", "b.com", "c.com", "d.com"]), &NoopRefreshHooks)
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(4 * 1500));
    }

    #[tokio::test(start_paused = true)]
    async fn default_delay_is_one_second() {
        let service = RefreshService::new(Arc::new(ScriptedLookup::new()));
        assert_eq!(service.delay(), Duration::from_secs(1));

        let started = Instant::now();
        service
            .refresh_all(portfolio(&["only.com"]), &NoopRefreshHooks)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_known_registrar_and_ownership() {
        let mut owned = domain_named("example.com");
        owned.registrar = "GoDaddy".to_string();
        owned.status = DomainStatus::Owned;
        owned.notes = "main site".to_string();
        let service = RefreshService::new(Arc::new(
            ScriptedLookup::new().with("example.com", Ok(success(None))),
        ));

        let result = service
            .refresh_all(vec![owned.clone()], &NoopRefreshHooks)
            .await
            .unwrap();

        assert_eq!(result[0].registrar, "GoDaddy");
        assert_eq!(result[0].status, DomainStatus::Owned);
        assert_eq!(result[0].notes, "main site");
        assert_eq!(result[0].registration_date, NaiveDate::from_ymd_opt(2020, 1, 15));
    }

    #[tokio::test(start_paused = true)]
    async fn unexpected_error_aborts_the_batch() {
        let lookup = Arc::new(ScriptedLookup::new().with(
            "b.com",
            Err(RdapError::UnexpectedStatus {
                domain: "b.com".into(),
                status: 429,
            }),
        ));
        let service = RefreshService::new(lookup.clone());
        let hooks = RecordingHooks::default();

        let result = service
            .refresh_all(portfolio(&["a.com", "b.com", "c.com"]), &hooks)
            .await;

        assert!(matches!(
            result,
            Err(CoreError::Lookup(RdapError::UnexpectedStatus { status: 429, .. }))
        ));
        let updated = hooks.updated();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].name, "a.com");
        assert_eq!(lookup.calls(), ["a.com", "b.com"]);
        assert_eq!(hooks.progress().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hook_error_aborts_the_batch() {
        struct FailingStore(AtomicUsize);

        #[async_trait]
        impl RefreshHooks for FailingStore {
            async fn on_item_updated(
                &self,
                _domain: &Domain,
                _outcome: &LookupOutcome,
            ) -> CoreResult<()> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Err(CoreError::StorageError("disk full".into()))
            }
        }

        let lookup = Arc::new(ScriptedLookup::new());
        let hooks = FailingStore(AtomicUsize::new(0));
        let result = RefreshService::new(lookup.clone())
            .refresh_all(portfolio(&["a.com", "b.com"]), &hooks)
            .await;

        assert!(matches!(result, Err(CoreError::StorageError(_))));
        assert_eq!(hooks.0.load(Ordering::SeqCst), 1);
        assert_eq!(lookup.calls(), ["a.com"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_before_next_item() {
        let lookup = Arc::new(ScriptedLookup::new());
        let hooks = RecordingHooks::cancel_after(2);

        let result = RefreshService::new(lookup.clone())
            .refresh_all(portfolio(&["a.com", "b.com", "c.com"]), &hooks)
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        assert!(result[0].update_status.is_some());
        assert!(result[1].update_status.is_some());
        assert!(result[2].update_status.is_none());
        assert_eq!(lookup.calls(), ["a.com", "b.com"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_collection_is_a_no_op() {
        let hooks = RecordingHooks::default();
        let result = RefreshService::new(Arc::new(ScriptedLookup::new()))
            .refresh_all(Vec::new(), &hooks)
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(hooks.progress().is_empty());
    }

    #[tokio::test]
    async fn refresh_one_does_not_wait() {
        let service = RefreshService::new(Arc::new(
            ScriptedLookup::new().with("example.com", Ok(success(Some("Registrar")))),
        ))
        .with_delay(Duration::from_secs(3600));

        let merged = service.refresh_one(&domain_named("example.com")).await.unwrap();

        assert_eq!(merged.registrar, "Registrar");
        assert_eq!(merged.update_status, Some(UpdateStatus::Success));
    }
}
