//! Plain-text rendering of domains, stats and refresh progress.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use domain_master_core::types::{
    Domain, DomainStats, ExpiryState, RdapSummary, RefreshProgress, RefreshSummary,
};

const HEADERS: [&str; 6] = ["NAME", "STATUS", "REGISTRAR", "REGISTERED", "EXPIRES", "REFRESH"];

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// Short hint shown next to the expiration date.
fn expiry_badge(domain: &Domain, now: DateTime<Utc>) -> Option<&'static str> {
    match domain.expiry_state(now) {
        ExpiryState::Expired => Some("expired"),
        ExpiryState::ExpiringSoon => Some("expiring soon"),
        ExpiryState::Active => None,
        ExpiryState::Unknown => domain.looks_available().then_some("available"),
    }
}

fn row(domain: &Domain, now: DateTime<Utc>) -> [String; 6] {
    let mut expires = date_cell(domain.expiration_date);
    if let Some(badge) = expiry_badge(domain, now) {
        let _ = write!(expires, " ({badge})");
    }
    [
        domain.name.clone(),
        domain.status.to_string(),
        domain.registrar.clone(),
        date_cell(domain.registration_date),
        expires,
        domain
            .update_status
            .map_or_else(|| "-".to_string(), |s| s.to_string()),
    ]
}

/// Column-aligned table, one domain per line.
pub fn format_table(domains: &[Domain], now: DateTime<Utc>) -> String {
    if domains.is_empty() {
        return "No domains tracked.\n".to_string();
    }

    let rows: Vec<[String; 6]> = domains.iter().map(|d| row(d, now)).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(ToString::to_string);
    for cells in std::iter::once(&header).chain(&rows) {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Detail view. The RDAP section is formatted when the stored text is an RDAP document.
pub fn format_domain(domain: &Domain, now: DateTime<Utc>, raw: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", domain.name);
    let _ = writeln!(out, "  Status:      {}", domain.status);
    let _ = writeln!(out, "  Registrar:   {}", domain.registrar);
    let _ = writeln!(out, "  Registered:  {}", date_cell(domain.registration_date));
    let _ = write!(out, "  Expires:     {}", date_cell(domain.expiration_date));
    if let Some(badge) = expiry_badge(domain, now) {
        let _ = write!(out, " ({badge})");
    }
    out.push('\n');
    match (domain.update_status, domain.last_updated) {
        (Some(status), Some(at)) => {
            let _ = writeln!(
                out,
                "  Refreshed:   {} ({status})",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        _ => {
            let _ = writeln!(out, "  Refreshed:   never");
        }
    }
    let _ = writeln!(out, "  Added:       {}", domain.added_at.format("%Y-%m-%d"));
    if !domain.notes.is_empty() {
        let _ = writeln!(out, "  Notes:       {}", domain.notes);
    }

    if domain.raw_whois.trim().is_empty() {
        return out;
    }
    out.push('\n');
    match (raw, RdapSummary::from_raw(&domain.raw_whois)) {
        (false, Some(summary)) => out.push_str(&format_summary(&summary)),
        _ => {
            out.push_str(domain.raw_whois.trim_end());
            out.push('\n');
        }
    }
    out
}

fn format_summary(summary: &RdapSummary) -> String {
    let mut out = String::from("RDAP record\n");
    if let Some(name) = &summary.domain_name {
        let _ = writeln!(out, "  Domain:      {name}");
    }
    if let Some(handle) = &summary.handle {
        let _ = writeln!(out, "  Handle:      {handle}");
    }
    if !summary.status.is_empty() {
        let _ = writeln!(out, "  Status:      {}", summary.status.join(", "));
    }
    if !summary.events.is_empty() {
        out.push_str("  Events:\n");
        for event in &summary.events {
            let _ = writeln!(out, "    {:<20} {}", event.action, event.date);
        }
    }
    if !summary.nameservers.is_empty() {
        out.push_str("  Nameservers:\n");
        for ns in &summary.nameservers {
            let _ = writeln!(out, "    {ns}");
        }
    }
    if !summary.entities.is_empty() {
        out.push_str("  Entities:\n");
        for entity in &summary.entities {
            let _ = write!(out, "    [{}] {}", entity.roles.join(", "), entity.name);
            if let Some(handle) = &entity.handle {
                let _ = write!(out, " ({handle})");
            }
            out.push('\n');
        }
    }
    out
}

pub fn format_stats(stats: &DomainStats) -> String {
    format!(
        "Total:          {}\nOwned:          {}\nBackorder:      {}\nExpiring soon:  {}\n",
        stats.total, stats.owned, stats.backorder, stats.expiring_soon
    )
}

pub fn progress_line(progress: &RefreshProgress) -> String {
    format!(
        "updating {} / {} ({})",
        progress.current, progress.total, progress.domain
    )
}

pub fn summary_line(summary: &RefreshSummary) -> String {
    let mut line = format!(
        "Refreshed {} domain(s): {} success, {} manual check",
        summary.processed, summary.success, summary.manual_check
    );
    if summary.cancelled {
        line.push_str(" (cancelled)");
    }
    line
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use domain_master_core::types::{DomainStatus, LookupOutcome, RdapRecord};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn table_aligns_columns_and_marks_expiry() {
        let mut soon = Domain::new("soon.com").unwrap();
        soon.status = DomainStatus::Owned;
        soon.expiration_date = NaiveDate::from_ymd_opt(2025, 6, 10);
        let plain = Domain::new("a-much-longer-name.io").unwrap();

        let table = format_table(&[soon, plain], now());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME "));
        let status_col = lines[0].find("STATUS").unwrap();
        assert_eq!(lines[1].find("OWNED"), Some(status_col));
        assert_eq!(lines[2].find("WATCHLIST"), Some(status_col));
        assert!(lines[1].contains("2025-06-10 (expiring soon)"));
    }

    #[test]
    fn empty_table_message() {
        assert_eq!(format_table(&[], now()), "No domains tracked.\n");
    }

    #[test]
    fn detail_view_formats_rdap_documents() {
        let domain = Domain::new("example.com").unwrap().with_lookup(
            &LookupOutcome::Success(RdapRecord {
                registration_date: NaiveDate::from_ymd_opt(1995, 8, 14),
                expiration_date: None,
                registrar: Some("IANA".into()),
                raw: r#"{"ldhName": "EXAMPLE.COM", "events": [{"eventAction": "last_changed", "eventDate": "2024-08-14T07:01:34Z"}]}"#.into(),
            }),
            now(),
        );

        let view = format_domain(&domain, now(), false);
        assert!(view.contains("Registrar:   IANA"));
        assert!(view.contains("RDAP record"));
        assert!(view.contains("last changed"));
        assert!(view.contains("(success)"));

        let raw = format_domain(&domain, now(), true);
        assert!(raw.contains("\"ldhName\": \"EXAMPLE.COM\""));
        assert!(!raw.contains("RDAP record"));
    }

    #[test]
    fn detail_view_prints_diagnostics_verbatim() {
        let domain = Domain::new("example.cn").unwrap().with_lookup(
            &LookupOutcome::Skipped {
                reason: "CN domains are not supported by public RDAP services.".into(),
            },
            now(),
        );
        let view = format_domain(&domain, now(), false);
        assert!(view.ends_with("CN domains are not supported by public RDAP services.\n"));
        assert!(view.contains("(manual_check)"));
    }

    #[test]
    fn progress_text() {
        let line = progress_line(&RefreshProgress {
            current: 2,
            total: 7,
            domain: "example.com".into(),
        });
        assert_eq!(line, "updating 2 / 7 (example.com)");
    }
}
