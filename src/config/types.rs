use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Email Enricher
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub fetcher: FetcherConfig,
    pub extractor: ExtractorConfig,
    pub table: TableConfig,
}

/// Worker pool and pacing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of rows resolved at the same time
    pub concurrency: u32,

    /// Pause each worker takes after a network request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Wall-clock budget for the whole batch (seconds)
    #[serde(rename = "deadline-secs")]
    pub deadline_secs: u64,

    /// How often progress snapshots are emitted (seconds)
    #[serde(rename = "progress-interval-secs")]
    pub progress_interval_secs: u64,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            request_delay_ms: 200,
            deadline_secs: 3 * 60 * 60,
            progress_interval_secs: 5,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = self
            .contact_url
            .iter()
            .map(|url| format!("+{}", url))
            .chain(self.contact_email.iter().cloned())
            .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "EmailEnricher".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// HTTP request configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_redirects: 10,
        }
    }
}

/// Email validation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Suffixes that mark a match as an asset path rather than an address
    #[serde(rename = "denied-extensions")]
    pub denied_extensions: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            denied_extensions: [
                ".png", ".jpg", ".jpeg", ".gif", ".pdf", ".doc", ".docx", ".hwp", ".svg", ".webp",
            ]
            .iter()
            .map(|ext| ext.to_string())
            .collect(),
        }
    }
}

/// Input/output table configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Header fragments identifying the company column
    #[serde(rename = "company-headers")]
    pub company_headers: Vec<String>,

    /// Header fragments identifying the website column
    #[serde(rename = "website-headers")]
    pub website_headers: Vec<String>,

    /// Header fragments identifying the email column
    #[serde(rename = "email-headers")]
    pub email_headers: Vec<String>,

    /// Encoding used when the input cannot be identified
    #[serde(rename = "fallback-encoding")]
    pub fallback_encoding: String,

    /// Inserted before the extension of the output file name
    #[serde(rename = "output-suffix")]
    pub output_suffix: String,

    /// Written to the email column when no address was found
    #[serde(rename = "not-found-marker")]
    pub not_found_marker: String,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            company_headers: strings(&["company", "회사", "업체"]),
            website_headers: strings(&["website", "홈페이지", "url", "사이트"]),
            email_headers: strings(&["email", "이메일", "메일"]),
            fallback_encoding: "EUC-KR".to_string(),
            output_suffix: "_updated".to_string(),
            not_found_marker: "X".to_string(),
        }
    }
}
