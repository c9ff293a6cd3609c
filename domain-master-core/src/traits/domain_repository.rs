//! 域名记录持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Domain;

/// 域名仓库 Trait
///
/// 整个组合作为有序列表读写，记录必须无损往返。
///
/// 平台实现:
/// - CLI: `JsonDomainRepository` (JSON 文件)
/// - 测试: `InMemoryDomainRepository`
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// 读取全部记录（保持存储顺序）
    ///
    /// 存储尚不存在时返回空列表。
    async fn load(&self) -> CoreResult<Vec<Domain>>;

    /// 整体覆盖保存
    async fn save(&self, domains: &[Domain]) -> CoreResult<()>;
}
