//! RDAP client façade.
//!
//! [`RdapClient`] owns the HTTP client and the lookup policy (resolver URL, unsupported TLDs);
//! [`DomainLookup`] is the seam the refresh pipeline depends on.

mod extract;
mod rdap;
mod summary;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{RdapError, RdapResult};
use crate::types::LookupOutcome;

/// Public resolver that redirects to the authoritative RDAP server for each TLD.
pub const DEFAULT_BASE_URL: &str = "https://rdap.org";

/// Media type requested from the resolver.
pub const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// TLDs the public RDAP infrastructure does not serve; looked up by hand instead.
pub const DEFAULT_UNSUPPORTED_TLDS: &[&str] = &["cn"];

/// Something that can look up registration data for one domain.
///
/// Implementations must be total over expected failures: unknown domains, unsupported TLDs and
/// transport trouble are reported as [`LookupOutcome`] values. `Err` is reserved for conditions
/// the caller has to treat as fatal.
#[async_trait]
pub trait DomainLookup: Send + Sync {
    /// Look up a single, already normalized domain name.
    async fn lookup(&self, domain: &str) -> RdapResult<LookupOutcome>;
}

/// RDAP client bound to one resolver.
///
/// ```rust,no_run
/// use domain_master_rdap::{DomainLookup, RdapClient};
/// # async fn demo() -> domain_master_rdap::RdapResult<()> {
/// let client = RdapClient::new()?;
/// let outcome = client.lookup("example.com").await?;
/// println!("{}", outcome.update_status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RdapClient {
    http: reqwest::Client,
    base_url: Url,
    unsupported_tlds: Vec<String>,
}

impl RdapClient {
    /// Client with the default resolver, timeout and TLD policy.
    pub fn new() -> RdapResult<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> RdapClientBuilder {
        RdapClientBuilder::default()
    }

    /// Resolver base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Normalized unsupported TLDs (lowercase, no leading dot).
    #[must_use]
    pub fn unsupported_tlds(&self) -> &[String] {
        &self.unsupported_tlds
    }

    /// `<base>/domain/<name>`
    fn domain_url(&self, ascii_domain: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("domain").push(ascii_domain);
        }
        url
    }

    /// The configured TLD this name falls under, if any.
    fn unsupported_tld(&self, ascii_domain: &str) -> Option<&str> {
        self.unsupported_tlds
            .iter()
            .map(String::as_str)
            .find(|tld| {
                ascii_domain
                    .strip_suffix(tld)
                    .is_some_and(|rest| rest.ends_with('.'))
            })
    }
}

#[async_trait]
impl DomainLookup for RdapClient {
    async fn lookup(&self, domain: &str) -> RdapResult<LookupOutcome> {
        rdap::rdap_lookup(self, domain).await
    }
}

/// Builder for [`RdapClient`].
#[derive(Debug, Clone)]
pub struct RdapClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    unsupported_tlds: Vec<String>,
}

impl Default for RdapClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            unsupported_tlds: DEFAULT_UNSUPPORTED_TLDS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl RdapClientBuilder {
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the unsupported TLD set. Entries may carry a leading dot and any case.
    #[must_use]
    pub fn unsupported_tlds<I, S>(mut self, tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unsupported_tlds = tlds.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> RdapResult<RdapClient> {
        let base_url = Url::parse(self.base_url.trim()).map_err(|e| {
            RdapError::InvalidConfig(format!("Invalid RDAP base URL '{}': {e}", self.base_url))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(RdapError::InvalidConfig(format!(
                "RDAP base URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let mut http = reqwest::Client::builder().timeout(self.timeout);
        if let Some(user_agent) = &self.user_agent {
            http = http.user_agent(user_agent);
        }
        let http = http
            .build()
            .map_err(|e| RdapError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        // 保留首次出现的顺序
        let mut seen = HashSet::new();
        let unsupported_tlds: Vec<String> = self
            .unsupported_tlds
            .iter()
            .map(|tld| tld.trim().trim_start_matches('.').to_lowercase())
            .filter(|tld| !tld.is_empty() && seen.insert(tld.clone()))
            .collect();

        Ok(RdapClient {
            http,
            base_url,
            unsupported_tlds,
        })
    }
}

/// Validate and normalise a domain name for the request URL.
///
/// Trims whitespace and a trailing root dot, converts internationalised names to ASCII via
/// IDNA 2008, and rejects empty or overlong inputs. The error is a human-readable reason.
fn normalize_domain(domain: &str) -> Result<String, String> {
    let domain = domain.trim().trim_end_matches('.');
    if domain.is_empty() {
        return Err("Domain name is required".to_string());
    }
    let ascii_domain = idna::domain_to_ascii_strict(domain)
        .map_err(|_| format!("Invalid domain name: {domain}"))?;
    if ascii_domain.len() > 253 {
        return Err(format!(
            "Domain name exceeds maximum length of 253 characters (got {})",
            ascii_domain.len()
        ));
    }
    Ok(ascii_domain)
}
