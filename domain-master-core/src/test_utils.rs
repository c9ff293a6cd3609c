//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain_master_rdap::{DomainLookup, LookupOutcome, RdapResult};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{RefreshHooks, ServiceContext};
use crate::traits::DomainRepository;
use crate::types::{Domain, RefreshProgress};

// ===== InMemoryDomainRepository =====

#[derive(Default)]
pub struct InMemoryDomainRepository {
    domains: RwLock<Vec<Domain>>,
    /// 如果 Some，save 时返回此错误
    save_error: RwLock<Option<String>>,
}

impl InMemoryDomainRepository {
    pub fn with_domains(domains: Vec<Domain>) -> Self {
        Self {
            domains: RwLock::new(domains),
            save_error: RwLock::new(None),
        }
    }

    #[allow(dead_code)]
    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }
}

#[async_trait]
impl DomainRepository for InMemoryDomainRepository {
    async fn load(&self) -> CoreResult<Vec<Domain>> {
        Ok(self.domains.read().await.clone())
    }

    async fn save(&self, domains: &[Domain]) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        *self.domains.write().await = domains.to_vec();
        Ok(())
    }
}

// ===== ScriptedLookup =====

/// 按名称返回预设结果；未预设的名称返回 404
#[derive(Default)]
pub struct ScriptedLookup {
    replies: HashMap<String, RdapResult<LookupOutcome>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, reply: RdapResult<LookupOutcome>) -> Self {
        self.replies.insert(name.to_string(), reply);
        self
    }

    /// 按调用顺序记录的域名
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainLookup for ScriptedLookup {
    async fn lookup(&self, domain: &str) -> RdapResult<LookupOutcome> {
        self.calls.lock().unwrap().push(domain.to_string());
        self.replies
            .get(domain)
            .cloned()
            .unwrap_or(Ok(LookupOutcome::NotFound { status: 404 }))
    }
}

// ===== RecordingHooks =====

#[derive(Default)]
pub struct RecordingHooks {
    progress: Mutex<Vec<RefreshProgress>>,
    updated: Mutex<Vec<Domain>>,
    cancel_after: Option<usize>,
}

impl RecordingHooks {
    /// 处理 `n` 项之后请求取消
    pub fn cancel_after(n: usize) -> Self {
        Self {
            cancel_after: Some(n),
            ..Self::default()
        }
    }

    pub fn progress(&self) -> Vec<RefreshProgress> {
        self.progress.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<Domain> {
        self.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl RefreshHooks for RecordingHooks {
    async fn on_progress(&self, progress: &RefreshProgress) {
        self.progress.lock().unwrap().push(progress.clone());
    }

    async fn on_item_updated(&self, domain: &Domain, _outcome: &LookupOutcome) -> CoreResult<()> {
        self.updated.lock().unwrap().push(domain.clone());
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after
            .is_some_and(|n| self.updated.lock().unwrap().len() >= n)
    }
}

// ===== 工厂方法 =====

pub fn domain_named(name: &str) -> Domain {
    Domain::new(name).unwrap()
}

pub fn create_test_context(domains: Vec<Domain>, lookup: ScriptedLookup) -> Arc<ServiceContext> {
    Arc::new(ServiceContext::new(
        Arc::new(InMemoryDomainRepository::with_domains(domains)),
        Arc::new(lookup),
    ))
}
