/// Default collection API.
pub const DEFAULT_API_BASE: &str = "https://anapioficeandfire.com/api";

/// Default cover image host.
pub const DEFAULT_COVER_BASE: &str = "https://covers.openlibrary.org/b/isbn";

/// Upstream catalog configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Collection API base, without a trailing slash.
    pub api_base: String,
    /// Cover host base, without a trailing slash.
    pub cover_base: String,
    /// Records requested per page (upstream maximum is 50).
    pub page_size: u32,
    /// Hard ceiling on pages fetched per resource.
    pub max_pages: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            cover_base: DEFAULT_COVER_BASE.to_string(),
            page_size: 50,
            max_pages: 50,
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                                 |
    /// |-----------------------|-----------------------------------------|
    /// | `SOURCE_API_BASE`     | `https://anapioficeandfire.com/api`     |
    /// | `SOURCE_COVER_BASE`   | `https://covers.openlibrary.org/b/isbn` |
    /// | `SOURCE_PAGE_SIZE`    | `50`                                    |
    /// | `SOURCE_MAX_PAGES`    | `50`                                    |
    /// | `SOURCE_TIMEOUT_SECS` | `30`                                    |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base = std::env::var("SOURCE_API_BASE").unwrap_or(defaults.api_base);
        let cover_base = std::env::var("SOURCE_COVER_BASE").unwrap_or(defaults.cover_base);

        let page_size: u32 = std::env::var("SOURCE_PAGE_SIZE")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("SOURCE_PAGE_SIZE must be a valid u32");

        let max_pages: u32 = std::env::var("SOURCE_MAX_PAGES")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("SOURCE_MAX_PAGES must be a valid u32");

        let timeout_secs: u64 = std::env::var("SOURCE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SOURCE_TIMEOUT_SECS must be a valid u64");

        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            cover_base: cover_base.trim_end_matches('/').to_string(),
            page_size,
            max_pages,
            timeout_secs,
        }
    }
}
