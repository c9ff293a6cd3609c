//! 域名管理服务

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{Domain, DomainQuery, DomainStats, DomainUpdate, ImportResult, LookupOutcome};
use crate::utils::parse_domain_list;

/// 域名管理服务
///
/// 所有写操作都是对整个仓库的 load-modify-save。
pub struct DomainService {
    ctx: Arc<ServiceContext>,
}

impl DomainService {
    /// 创建域名服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 列出所有记录（存储顺序）
    pub async fn list(&self) -> CoreResult<Vec<Domain>> {
        self.ctx.domain_repository.load().await
    }

    /// 按条件搜索、过滤、排序
    pub async fn query(&self, query: &DomainQuery) -> CoreResult<Vec<Domain>> {
        let domains = self.list().await?;
        Ok(query.apply(&domains))
    }

    /// 按 ID 获取
    pub async fn get(&self, id: &str) -> CoreResult<Domain> {
        self.list()
            .await?
            .into_iter()
            .find(|domain| domain.id == id)
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))
    }

    /// 按名称查找（忽略大小写与首尾空白）
    pub async fn find_by_name(&self, name: &str) -> CoreResult<Option<Domain>> {
        let name = Domain::normalize_name(name);
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|domain| domain.name == name))
    }

    /// 从粘贴文本导入（逗号或换行分隔）
    pub async fn import_text(&self, text: &str) -> CoreResult<ImportResult> {
        self.import_names(parse_domain_list(text)).await
    }

    /// 批量导入域名
    ///
    /// 已存在的名称和本批次内的重复项会被跳过，其余按输入顺序追加到末尾。
    pub async fn import_names<I, S>(&self, names: I) -> CoreResult<ImportResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _guard = self.ctx.lock_store().await;
        let mut domains = self.ctx.domain_repository.load().await?;
        let mut seen: HashSet<String> = domains.iter().map(|d| d.name.clone()).collect();
        let mut result = ImportResult::default();

        for raw in names {
            let name = Domain::normalize_name(raw.as_ref());
            if name.is_empty() {
                continue;
            }
            if !seen.insert(name.clone()) {
                result.skipped.push(name);
                continue;
            }
            result.added.push(Domain::new(&name)?);
        }

        if result.added.is_empty() {
            log::debug!(
                "[Store] Import added nothing ({} skipped)",
                result.skipped.len()
            );
            return Ok(result);
        }

        domains.extend(result.added.iter().cloned());
        self.ctx.domain_repository.save(&domains).await?;
        log::info!(
            "[Store] Imported {} domain(s), skipped {}",
            result.added.len(),
            result.skipped.len()
        );
        Ok(result)
    }

    /// 手动编辑（部分更新）
    pub async fn update(&self, id: &str, update: DomainUpdate) -> CoreResult<Domain> {
        update.validate()?;

        let _guard = self.ctx.lock_store().await;
        let mut domains = self.ctx.domain_repository.load().await?;
        let domain = domains
            .iter_mut()
            .find(|domain| domain.id == id)
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))?;
        update.apply_to(domain);
        let updated = domain.clone();

        self.ctx.domain_repository.save(&domains).await?;
        log::info!("[Store] Updated {}", updated.name);
        Ok(updated)
    }

    /// 删除记录，返回被删除的记录
    pub async fn delete(&self, id: &str) -> CoreResult<Domain> {
        let _guard = self.ctx.lock_store().await;
        let mut domains = self.ctx.domain_repository.load().await?;
        let index = domains
            .iter()
            .position(|domain| domain.id == id)
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))?;
        let removed = domains.remove(index);

        self.ctx.domain_repository.save(&domains).await?;
        log::info!("[Store] Deleted {}", removed.name);
        Ok(removed)
    }

    /// 组合统计（当前时间）
    pub async fn stats(&self) -> CoreResult<DomainStats> {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> CoreResult<DomainStats> {
        let domains = self.list().await?;
        Ok(DomainStats::compute(&domains, now))
    }

    /// 将一次刷新结果合并到当前存储的记录上
    ///
    /// 只写刷新负责的字段（注册商、日期、`raw_whois`、更新状态和时间），
    /// 批次进行中用户对同一记录的编辑保持不变。
    /// 刷新期间已被删除的记录不会复活，返回 `None`。
    pub async fn apply_refreshed(
        &self,
        refreshed: &Domain,
        outcome: &LookupOutcome,
    ) -> CoreResult<Option<Domain>> {
        let _guard = self.ctx.lock_store().await;
        let mut domains = self.ctx.domain_repository.load().await?;
        let Some(slot) = domains.iter_mut().find(|domain| domain.id == refreshed.id) else {
            log::info!(
                "[Store] {} was removed during refresh, dropping result",
                refreshed.name
            );
            return Ok(None);
        };
        slot.apply_lookup(outcome, refreshed.last_updated.unwrap_or_else(Utc::now));
        let stored = slot.clone();

        self.ctx.domain_repository.save(&domains).await?;
        Ok(Some(stored))
    }
}
