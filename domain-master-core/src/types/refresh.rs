//! 批量刷新与导入相关类型

use serde::{Deserialize, Serialize};

use super::domain::Domain;

/// 刷新进度（`current` 从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshProgress {
    pub current: usize,
    pub total: usize,
    pub domain: String,
}

/// 批量刷新汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    /// 已处理数量
    pub processed: usize,
    pub success: usize,
    pub manual_check: usize,
    /// 是否被中途取消
    pub cancelled: bool,
}

/// 导入结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// 新建的记录（按输入顺序）
    pub added: Vec<Domain>,
    /// 已存在或重复而跳过的名称
    pub skipped: Vec<String>,
}
