//! 列表查询：搜索、过滤、排序与统计

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_master_rdap::UpdateStatus;

use super::domain::{Domain, DomainStatus};
use crate::error::CoreError;

/// 可排序字段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Name,
    Status,
    Registrar,
    RegistrationDate,
    ExpirationDate,
}

impl SortField {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Status,
        Self::Registrar,
        Self::RegistrationDate,
        Self::ExpirationDate,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::Registrar => "registrar",
            Self::RegistrationDate => "registrationDate",
            Self::ExpirationDate => "expirationDate",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown sort field '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// 列表查询条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainQuery {
    /// 名称子串（不区分大小写）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DomainStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<(SortField, SortDirection)>,
}

impl DomainQuery {
    /// 是否匹配搜索词与状态过滤
    #[must_use]
    pub fn matches(&self, domain: &Domain) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .is_none_or(|term| domain.name.contains(&term.to_lowercase()));
        let status_ok = self.status.is_none_or(|status| domain.status == status);
        search_ok && status_ok
    }

    /// 过滤并排序（稳定排序，未指定排序时保持原顺序）
    #[must_use]
    pub fn apply(&self, domains: &[Domain]) -> Vec<Domain> {
        let mut result: Vec<Domain> = domains
            .iter()
            .filter(|domain| self.matches(domain))
            .cloned()
            .collect();
        if let Some((field, direction)) = self.sort {
            result.sort_by(|a, b| compare_domains(a, b, field, direction));
        }
        result
    }
}

/// 刷新结果排序权重：成功 < 需人工核查 < 从未刷新
const fn refresh_weight(status: Option<UpdateStatus>) -> u8 {
    match status {
        Some(UpdateStatus::Success) => 0,
        Some(UpdateStatus::ManualCheck) => 1,
        None => 2,
    }
}

/// 按字段比较两条记录
///
/// 名称排序依次比较：长度、首字符、刷新结果、完整名称。
/// 其余字段按文本/日期比较，缺失值最小。
#[must_use]
pub fn compare_domains(
    a: &Domain,
    b: &Domain,
    field: SortField,
    direction: SortDirection,
) -> Ordering {
    let ordering = match field {
        SortField::Name => a
            .name
            .len()
            .cmp(&b.name.len())
            .then_with(|| a.name.chars().next().cmp(&b.name.chars().next()))
            .then_with(|| refresh_weight(a.update_status).cmp(&refresh_weight(b.update_status)))
            .then_with(|| a.name.cmp(&b.name)),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::Registrar => a.registrar.cmp(&b.registrar),
        SortField::RegistrationDate => a.registration_date.cmp(&b.registration_date),
        SortField::ExpirationDate => a.expiration_date.cmp(&b.expiration_date),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// 组合统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStats {
    pub total: usize,
    pub owned: usize,
    pub backorder: usize,
    pub expiring_soon: usize,
}

impl DomainStats {
    #[must_use]
    pub fn compute(domains: &[Domain], now: DateTime<Utc>) -> Self {
        domains.iter().fold(Self::default(), |mut stats, domain| {
            stats.total += 1;
            match domain.status {
                DomainStatus::Owned => stats.owned += 1,
                DomainStatus::Backorder => stats.backorder += 1,
                DomainStatus::Watchlist | DomainStatus::Expired => {}
            }
            if domain.is_expiring_soon(now) {
                stats.expiring_soon += 1;
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn domain(name: &str) -> Domain {
        Domain::new_at(name, now()).unwrap()
    }

    fn names(domains: &[Domain]) -> Vec<&str> {
        domains.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn search_and_status_filter() {
        let mut owned = domain("shop.io");
        owned.status = DomainStatus::Owned;
        let all = vec![domain("example.com"), owned, domain("shopping.dev")];

        let query = DomainQuery {
            search: Some("SHOP".to_string()),
            ..DomainQuery::default()
        };
        assert_eq!(names(&query.apply(&all)), ["shop.io", "shopping.dev"]);

        let query = DomainQuery {
            search: Some("shop".to_string()),
            status: Some(DomainStatus::Owned),
            ..DomainQuery::default()
        };
        assert_eq!(names(&query.apply(&all)), ["shop.io"]);

        assert_eq!(DomainQuery::default().apply(&all).len(), 3);
    }

    #[test]
    fn name_sort_prefers_short_then_refreshed() {
        let mut refreshed = domain("bb.com");
        refreshed.update_status = Some(UpdateStatus::Success);
        let mut manual = domain("ba.com");
        manual.update_status = Some(UpdateStatus::ManualCheck);
        let all = vec![domain("a-long-name.com"), domain("bc.com"), manual, refreshed, domain("a.io")];

        let query = DomainQuery {
            sort: Some((SortField::Name, SortDirection::Asc)),
            ..DomainQuery::default()
        };
        assert_eq!(
            names(&query.apply(&all)),
            ["a.io", "bb.com", "ba.com", "bc.com", "a-long-name.com"]
        );

        let query = DomainQuery {
            sort: Some((SortField::Name, SortDirection::Desc)),
            ..DomainQuery::default()
        };
        assert_eq!(
            names(&query.apply(&all)),
            ["a-long-name.com", "bc.com", "ba.com", "bb.com", "a.io"]
        );
    }

    #[test]
    fn date_sort_puts_missing_first() {
        let mut early = domain("early.com");
        early.expiration_date = NaiveDate::from_ymd_opt(2025, 7, 1);
        let mut late = domain("late.com");
        late.expiration_date = NaiveDate::from_ymd_opt(2030, 1, 1);
        let all = vec![late, domain("none.com"), early];

        let query = DomainQuery {
            sort: Some((SortField::ExpirationDate, SortDirection::Asc)),
            ..DomainQuery::default()
        };
        assert_eq!(names(&query.apply(&all)), ["none.com", "early.com", "late.com"]);
    }

    #[test]
    fn sort_field_parses_variants() {
        assert_eq!("expirationDate".parse::<SortField>().unwrap(), SortField::ExpirationDate);
        assert_eq!("expiration-date".parse::<SortField>().unwrap(), SortField::ExpirationDate);
        assert_eq!("REGISTRAR".parse::<SortField>().unwrap(), SortField::Registrar);
        assert!("price".parse::<SortField>().is_err());
    }

    #[test]
    fn stats_count_statuses_and_expiring() {
        let mut owned = domain("a.com");
        owned.status = DomainStatus::Owned;
        owned.expiration_date = NaiveDate::from_ymd_opt(2025, 6, 15);
        let mut backorder = domain("b.com");
        backorder.status = DomainStatus::Backorder;
        backorder.expiration_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        let mut far = domain("c.com");
        far.expiration_date = NaiveDate::from_ymd_opt(2026, 6, 15);

        let stats = DomainStats::compute(&[owned, backorder, far, domain("d.com")], now());
        assert_eq!(
            stats,
            DomainStats {
                total: 4,
                owned: 1,
                backorder: 1,
                expiring_soon: 1,
            }
        );
    }
}
