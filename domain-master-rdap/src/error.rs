//! 统一错误类型定义

use serde::Serialize;
use thiserror::Error;

/// RDAP 客户端错误类型
///
/// Transport variants are folded into [`LookupOutcome::TransportError`](crate::LookupOutcome)
/// by the client itself; callers normally only ever see [`UnexpectedStatus`](Self::UnexpectedStatus).
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum RdapError {
    /// 配置错误（无效的 base URL、无法构建 HTTP 客户端等）
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 网络错误
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 请求超时
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// 解析器返回了未预期的 HTTP 状态码
    #[error("RDAP error: {status} ({domain})")]
    UnexpectedStatus { domain: String, status: u16 },
}

impl RdapError {
    /// Whether the error came from the transport (connection, timeout, body read).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::Timeout(_))
    }

    /// 是否为预期行为，用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NetworkError(_) | Self::Timeout(_) => true,
            Self::InvalidConfig(_) | Self::UnexpectedStatus { .. } => false,
        }
    }
}

/// RDAP Result 类型别名
pub type RdapResult<T> = std::result::Result<T, RdapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_expected() {
        assert!(RdapError::NetworkError("refused".into()).is_transport());
        assert!(RdapError::Timeout("10s".into()).is_expected());
    }

    #[test]
    fn unexpected_status_is_not_expected() {
        let err = RdapError::UnexpectedStatus {
            domain: "example.com".into(),
            status: 429,
        };
        assert!(!err.is_transport());
        assert!(!err.is_expected());
        assert_eq!(err.to_string(), "RDAP error: 429 (example.com)");
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(RdapError::InvalidConfig("bad url".into())).unwrap();
        assert_eq!(json["code"], "InvalidConfig");
        assert_eq!(json["details"], "bad url");
    }
}
