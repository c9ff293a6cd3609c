//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use domain_master_rdap::RdapError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Domain not found (by id or name)
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Lookup error that aborts a refresh (converted from the RDAP library)
    #[error("{0}")]
    Lookup(#[from] RdapError),
}

impl CoreError {
    /// 是否为预期行为（用户输入错误、记录不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::DomainNotFound(_) | Self::ValidationError(_) => true,
            Self::Lookup(e) => e.is_expected(),
            Self::SerializationError(_) | Self::StorageError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_converts_and_keeps_message() {
        let err: CoreError = RdapError::UnexpectedStatus {
            domain: "example.com".into(),
            status: 503,
        }
        .into();
        assert_eq!(err.to_string(), "RDAP error: 503 (example.com)");
        assert!(!err.is_expected());
    }

    #[test]
    fn user_errors_are_expected() {
        assert!(CoreError::DomainNotFound("x.com".into()).is_expected());
        assert!(CoreError::ValidationError("empty".into()).is_expected());
        assert!(!CoreError::StorageError("disk full".into()).is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(CoreError::DomainNotFound("x.com".into())).unwrap();
        assert_eq!(json["code"], "DomainNotFound");
        assert_eq!(json["details"], "x.com");
    }
}
