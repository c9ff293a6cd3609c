//! RDAP domain lookup module.

use reqwest::header::ACCEPT;

use super::{RDAP_MEDIA_TYPE, RdapClient, extract, normalize_domain};
use crate::error::{RdapError, RdapResult};
use crate::http;
use crate::types::LookupOutcome;

/// Statuses the public resolver returns for unregistered domains and TLDs it cannot route.
const NO_DATA_STATUSES: &[u16] = &[400, 404, 500];

/// Look up one domain and classify the result.
pub(super) async fn rdap_lookup(client: &RdapClient, domain: &str) -> RdapResult<LookupOutcome> {
    let ascii_domain = match normalize_domain(domain) {
        Ok(ascii) => ascii,
        Err(reason) => {
            log::info!("[RDAP] Skipping '{domain}': {reason}");
            return Ok(LookupOutcome::Skipped { reason });
        }
    };

    if let Some(tld) = client.unsupported_tld(&ascii_domain) {
        log::info!("[RDAP] Skipping {ascii_domain}: .{tld} is not served by public RDAP");
        return Ok(LookupOutcome::Skipped {
            reason: format!(
                "{} domains are not supported by public RDAP services.",
                tld.to_uppercase()
            ),
        });
    }

    let url = client.domain_url(&ascii_domain);
    let request = client
        .http
        .get(url.clone())
        .header(ACCEPT, RDAP_MEDIA_TYPE);

    match http::execute_request(request, url.as_str()).await {
        Ok((status, body)) => classify_response(&ascii_domain, status, &body),
        Err(e) if e.is_transport() => {
            log::warn!("[RDAP] Error fetching {ascii_domain}: {e}");
            Ok(LookupOutcome::TransportError {
                message: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Turn a status code and body into an outcome.
///
/// 2xx bodies that are not JSON count as transport failures; statuses outside the handled set
/// are the only path to `Err`.
fn classify_response(domain: &str, status: u16, body: &str) -> RdapResult<LookupOutcome> {
    if NO_DATA_STATUSES.contains(&status) {
        log::info!("[RDAP] No data for {domain} (HTTP {status})");
        return Ok(LookupOutcome::NotFound { status });
    }

    if !(200..300).contains(&status) {
        log::error!("[RDAP] Unexpected status {status} for {domain}");
        return Err(RdapError::UnexpectedStatus {
            domain: domain.to_string(),
            status,
        });
    }

    match http::parse_json(body) {
        Ok(document) => {
            let record = extract::parse_record(&document);
            log::debug!(
                "[RDAP] {domain}: registrar={:?} registered={:?} expires={:?}",
                record.registrar,
                record.registration_date,
                record.expiration_date
            );
            Ok(LookupOutcome::Success(record))
        }
        Err(e) => Ok(LookupOutcome::TransportError {
            message: format!("Invalid RDAP response: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UpdateStatus;

    #[test]
    fn test_classify_no_data_statuses() {
        for status in [400, 404, 500] {
            let outcome = classify_response("example.com", status, "").unwrap();
            assert_eq!(outcome, LookupOutcome::NotFound { status });
            assert_eq!(outcome.update_status(), UpdateStatus::ManualCheck);
        }
    }

    #[test]
    fn test_classify_unexpected_status_is_error() {
        for status in [301, 401, 403, 429, 502, 503] {
            let result = classify_response("example.com", status, "");
            assert!(
                matches!(result, Err(RdapError::UnexpectedStatus { status: s, .. }) if s == status),
                "status {status}: {result:?}"
            );
        }
    }

    #[test]
    fn test_classify_malformed_json() {
        let outcome = classify_response("example.com", 200, "{not json").unwrap();
        match outcome {
            LookupOutcome::TransportError { message } => {
                assert!(message.starts_with("Invalid RDAP response"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_classify_success_parses_fields() {
        let body = r#"{
            "ldhName": "EXAMPLE.COM",
            "events": [
                {"eventAction": "registration", "eventDate": "2020-01-15T00:00:00Z"},
                {"eventAction": "expiration", "eventDate": "2030-01-15T23:59:59Z"}
            ]
        }"#;
        let outcome = classify_response("example.com", 200, body).unwrap();
        let record = outcome.record().unwrap();
        assert_eq!(
            record.registration_date.map(|d| d.to_string()).as_deref(),
            Some("2020-01-15")
        );
        assert_eq!(
            record.expiration_date.map(|d| d.to_string()).as_deref(),
            Some("2030-01-15")
        );
        assert!(record.registrar.is_none());
        assert!(record.raw.contains("\"ldhName\": \"EXAMPLE.COM\""));
    }
}
