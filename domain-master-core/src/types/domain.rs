//! 域名记录类型定义

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use domain_master_rdap::{LookupOutcome, UpdateStatus};

use crate::error::{CoreError, CoreResult};

/// 新建记录的默认注册商
pub const UNKNOWN_REGISTRAR: &str = "Unknown";

/// "即将过期" 的窗口（天）
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// 用户设定的持有状态，与 RDAP 结果无关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainStatus {
    Owned,
    Backorder,
    #[default]
    Watchlist,
    Expired,
}

impl DomainStatus {
    pub const ALL: [Self; 4] = [Self::Owned, Self::Backorder, Self::Watchlist, Self::Expired];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owned => "OWNED",
            Self::Backorder => "BACKORDER",
            Self::Watchlist => "WATCHLIST",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "Unknown status '{s}', expected one of OWNED, BACKORDER, WATCHLIST, EXPIRED"
                ))
            })
    }
}

/// 按到期日期推导的提示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryState {
    /// 到期日已过
    Expired,
    /// 不足 30 天到期
    ExpiringSoon,
    Active,
    /// 没有到期日期
    Unknown,
}

/// 域名记录（持久化格式，camelCase）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// UUID v4，创建后不可变
    pub id: String,
    /// 小写、去空白的域名，导入时的自然键
    pub name: String,
    #[serde(default = "default_registrar")]
    pub registrar: String,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: DomainStatus,
    /// RDAP 原始 JSON 或诊断信息
    #[serde(default)]
    pub raw_whois: String,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "crate::utils::datetime")]
    pub added_at: DateTime<Utc>,
    /// 最近一次刷新时间，与 `update_status` 同时出现
    #[serde(
        default,
        with = "crate::utils::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_status: Option<UpdateStatus>,
}

fn default_registrar() -> String {
    UNKNOWN_REGISTRAR.to_string()
}

impl Domain {
    /// 创建新的关注记录
    ///
    /// # Errors
    /// 名称为空时返回 `ValidationError`
    pub fn new(name: &str) -> CoreResult<Self> {
        Self::new_at(name, Utc::now())
    }

    pub(crate) fn new_at(name: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        let name = Self::normalize_name(name);
        if name.is_empty() {
            return Err(CoreError::ValidationError(
                "Domain name is required".to_string(),
            ));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            registrar: default_registrar(),
            registration_date: None,
            expiration_date: None,
            status: DomainStatus::Watchlist,
            raw_whois: String::new(),
            notes: String::new(),
            added_at: now,
            last_updated: None,
            update_status: None,
        })
    }

    /// 规范化域名（trim + 小写）
    #[must_use]
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// 合并一次查询结果
    ///
    /// `raw_whois` 总是覆盖；日期和注册商只在成功解析出值时覆盖。
    /// `status`、`notes` 等用户字段不变。
    pub fn apply_lookup(&mut self, outcome: &LookupOutcome, now: DateTime<Utc>) {
        if let Some(record) = outcome.record() {
            if let Some(date) = record.registration_date {
                self.registration_date = Some(date);
            }
            if let Some(date) = record.expiration_date {
                self.expiration_date = Some(date);
            }
            if let Some(registrar) = &record.registrar {
                self.registrar.clone_from(registrar);
            }
        }
        self.raw_whois = outcome.raw_text();
        self.update_status = Some(outcome.update_status());
        self.last_updated = Some(now);
    }

    /// [`apply_lookup`](Self::apply_lookup) on a copy.
    #[must_use]
    pub fn with_lookup(&self, outcome: &LookupOutcome, now: DateTime<Utc>) -> Self {
        let mut merged = self.clone();
        merged.apply_lookup(outcome, now);
        merged
    }

    /// 距到期的时长（到期日按 UTC 零点计算）
    #[must_use]
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.expiration_date
            .map(|date| date.and_time(NaiveTime::MIN).and_utc() - now)
    }

    #[must_use]
    pub fn expiry_state(&self, now: DateTime<Utc>) -> ExpiryState {
        match self.time_until_expiration(now) {
            None => ExpiryState::Unknown,
            Some(left) if left < TimeDelta::zero() => ExpiryState::Expired,
            Some(left) if left < TimeDelta::days(EXPIRING_SOON_DAYS) => ExpiryState::ExpiringSoon,
            Some(_) => ExpiryState::Active,
        }
    }

    /// 统计口径：到期日严格位于 (now, now + 30 天) 之间
    #[must_use]
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        self.time_until_expiration(now)
            .is_some_and(|left| left > TimeDelta::zero() && left < TimeDelta::days(EXPIRING_SOON_DAYS))
    }

    /// 关注中的域名成功刷新但没有任何注册日期，可能可以注册
    #[must_use]
    pub fn looks_available(&self) -> bool {
        self.status == DomainStatus::Watchlist
            && self.update_status == Some(UpdateStatus::Success)
            && self.registration_date.is_none()
            && self.expiration_date.is_none()
    }
}

/// 手动编辑请求（支持部分更新）
///
/// 刷新标记（`lastUpdated`/`updateStatus`）不可手动修改。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DomainStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    /// `Some(None)` 表示清空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<Option<NaiveDate>>,

    /// `Some(None)` 表示清空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Option<NaiveDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_whois: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DomainUpdate {
    /// 校验请求
    ///
    /// # Errors
    /// 注册商为空白时返回 `ValidationError`
    pub fn validate(&self) -> CoreResult<()> {
        if self
            .registrar
            .as_deref()
            .is_some_and(|registrar| registrar.trim().is_empty())
        {
            return Err(CoreError::ValidationError(
                "Registrar must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.registrar.is_none()
            && self.registration_date.is_none()
            && self.expiration_date.is_none()
            && self.raw_whois.is_none()
            && self.notes.is_none()
    }

    /// 应用更新到现有记录
    pub fn apply_to(&self, domain: &mut Domain) {
        if let Some(status) = self.status {
            domain.status = status;
        }
        if let Some(ref registrar) = self.registrar {
            registrar.trim().clone_into(&mut domain.registrar);
        }
        if let Some(date) = self.registration_date {
            domain.registration_date = date;
        }
        if let Some(date) = self.expiration_date {
            domain.expiration_date = date;
        }
        if let Some(ref raw_whois) = self.raw_whois {
            domain.raw_whois.clone_from(raw_whois);
        }
        if let Some(ref notes) = self.notes {
            domain.notes.clone_from(notes);
        }
    }
}
