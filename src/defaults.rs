//! Default values shared across the crate.

use std::time::Duration;

/// HTTP defaults
pub mod http {
    use super::*;

    /// Default request timeout for the model listing call
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default connection timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string
    pub const USER_AGENT: &str = concat!("siumai-catalog/", env!("CARGO_PKG_VERSION"));
}

/// Gemini endpoint defaults
pub mod gemini {
    /// Default Gemini API base URL (version segment included)
    pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Page size requested from `GET /models` (API maximum)
    pub const PAGE_SIZE: u32 = 1000;

    /// Upper bound on followed `nextPageToken`s per dispatch call
    pub const MAX_PAGES: usize = 10;
}

/// Environment variable toggling consistency diagnostics
pub const DIAGNOSTICS_ENV: &str = "SIUMAI_CATALOG_DIAGNOSTICS";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(http::REQUEST_TIMEOUT, Duration::from_secs(30));
        assert!(http::USER_AGENT.starts_with("siumai-catalog/"));
        assert!(gemini::BASE_URL.ends_with("/v1beta"));
        assert!(gemini::MAX_PAGES >= 1);
    }
}
