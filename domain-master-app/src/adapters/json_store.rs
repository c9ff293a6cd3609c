//! 域名仓库
//!
//! 使用 JSON 文件存储域名记录
//! 实现 domain-master-core 的 DomainRepository trait

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domain_master_core::traits::DomainRepository;
use domain_master_core::types::Domain;
use domain_master_core::{CoreError, CoreResult};
use tokio::fs;
use tokio::sync::Mutex;

/// 基于 JSON 文件的域名仓库
///
/// 文件内容是记录数组（camelCase），与浏览器版导出的格式一致。
///
/// 不做内存缓存：每次 `load` 都重新读文件，其他进程在刷新期间写入的内容不会被覆盖。
pub struct JsonDomainRepository {
    path: PathBuf,
    /// 串行化本进程内的文件读写
    io_lock: Mutex<()>,
}

impl JsonDomainRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 从文件加载记录列表
    async fn load_from_file(&self) -> CoreResult<Vec<Domain>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[Store] {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(CoreError::StorageError(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            CoreError::SerializationError(format!("{}: {e}", self.path.display()))
        })
    }

    /// 保存记录列表到文件（先写临时文件再替换）
    async fn save_to_file(&self, domains: &[Domain]) -> CoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::StorageError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(domains)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let tmp_path = self
            .path
            .with_extension(format!("json.{}.tmp", std::process::id()));
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;

        log::debug!(
            "[Store] Wrote {} record(s) to {}",
            domains.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl DomainRepository for JsonDomainRepository {
    async fn load(&self) -> CoreResult<Vec<Domain>> {
        let _guard = self.io_lock.lock().await;
        self.load_from_file().await
    }

    async fn save(&self, domains: &[Domain]) -> CoreResult<()> {
        let _guard = self.io_lock.lock().await;
        self.save_to_file(domains).await
    }
}
