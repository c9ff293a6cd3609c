//! HTTP plumbing shared by RDAP requests
//!
//! Sends the request, logs it, and hands back status code and body text. Status interpretation is
//! left to the caller.

use reqwest::RequestBuilder;
use serde_json::Value;

use crate::error::{RdapError, RdapResult};

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 512;

/// Performs a request and returns `(status_code, body_text)`.
///
/// * `Err(RdapError::Timeout)` - the request timed out
/// * `Err(RdapError::NetworkError)` - connection failure, or the body of a 2xx reply could not be read
pub(crate) async fn execute_request(
    request_builder: RequestBuilder,
    url: &str,
) -> RdapResult<(u16, String)> {
    log::debug!("[RDAP] GET {url}");

    let response = request_builder.send().await.map_err(|e| {
        if e.is_timeout() {
            RdapError::Timeout(e.to_string())
        } else {
            RdapError::NetworkError(e.to_string())
        }
    })?;

    let status = response.status();
    log::debug!("[RDAP] Response Status: {}", status.as_u16());

    // 非 2xx 的响应体只用于日志，读取失败不影响状态码归类
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        log::debug!("[RDAP] Error Body: {}", truncate_for_log(&body));
        return Ok((status.as_u16(), body));
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            RdapError::Timeout(e.to_string())
        } else {
            RdapError::NetworkError(format!("Failed to read response body: {e}"))
        }
    })?;

    log::debug!("[RDAP] Response Body: {}", truncate_for_log(&body));

    Ok((status.as_u16(), body))
}

/// Parses a reply body into an untyped JSON document.
pub(crate) fn parse_json(body: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(body).inspect_err(|e| {
        log::warn!("[RDAP] JSON parse failed: {e}");
        log::debug!("[RDAP] Raw response: {}", truncate_for_log(body));
    })
}

/// Truncate a string for safe logging.
///
/// RDAP documents are routinely tens of kilobytes; anything above the limit is cut at a char
/// boundary and suffixed with the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}
