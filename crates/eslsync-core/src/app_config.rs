use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How `price1`/`price2` are derived from the `Current Retail` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    /// Pick per upload: tax-adjusted when the enriched columns are present.
    Auto,
    /// `price1` is the retail value verbatim; no `price2`.
    Direct,
    /// `price1` carries the tax markup and `price2` the secondary currency.
    TaxAdjusted,
}

impl std::fmt::Display for PricingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingMode::Auto => write!(f, "auto"),
            PricingMode::Direct => write!(f, "direct"),
            PricingMode::TaxAdjusted => write!(f, "tax_adjusted"),
        }
    }
}

impl std::str::FromStr for PricingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(PricingMode::Auto),
            "direct" => Ok(PricingMode::Direct),
            "tax_adjusted" => Ok(PricingMode::TaxAdjusted),
            other => Err(format!(
                "unknown pricing mode '{other}' (expected auto, direct, or tax_adjusted)"
            )),
        }
    }
}

/// Connection settings for the ESL management API.
///
/// Handed to `EslClient` at construction; nothing reads these from the
/// environment after startup.
#[derive(Clone)]
pub struct EslSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub customer_code: String,
    pub store_code: String,
    pub request_timeout_secs: u64,
    /// The destination serves a self-signed certificate in most deployments.
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for EslSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EslSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("customer_code", &self.customer_code)
            .field("store_code", &self.store_code)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Knobs for sheet reading, normalization, and batching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub batch_prefix: String,
    pub batch_size: usize,
    pub pricing_mode: PricingMode,
    pub sheet_skip_rows: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            batch_prefix: "batch-a1".to_string(),
            batch_size: PipelineSettings::MAX_BATCH_SIZE,
            pricing_mode: PricingMode::Auto,
            sheet_skip_rows: 1,
        }
    }
}

impl PipelineSettings {
    /// Largest payload the integration endpoint accepts in one call.
    pub const MAX_BATCH_SIZE: usize = 1000;
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub max_upload_bytes: usize,
    pub esl: EslSettings,
    pub pipeline: PipelineSettings,
}
