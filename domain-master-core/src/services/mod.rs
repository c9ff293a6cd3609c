//! 业务逻辑服务层

mod domain_service;
mod refresh_service;

pub use domain_service::DomainService;
pub use refresh_service::{DEFAULT_REQUEST_DELAY, NoopRefreshHooks, RefreshHooks, RefreshService};

use std::sync::Arc;

use domain_master_rdap::DomainLookup;
use tokio::sync::{Mutex, MutexGuard};

use crate::traits::DomainRepository;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储与查询实现。
pub struct ServiceContext {
    /// 域名记录仓库
    pub domain_repository: Arc<dyn DomainRepository>,
    /// RDAP 查询客户端
    pub lookup: Arc<dyn DomainLookup>,
    /// 串行化存储的 load-modify-save
    store_lock: Mutex<()>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(domain_repository: Arc<dyn DomainRepository>, lookup: Arc<dyn DomainLookup>) -> Self {
        Self {
            domain_repository,
            lookup,
            store_lock: Mutex::new(()),
        }
    }

    /// 获取存储写锁
    pub(crate) async fn lock_store(&self) -> MutexGuard<'_, ()> {
        self.store_lock.lock().await
    }
}
