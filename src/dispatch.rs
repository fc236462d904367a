//! Dispatch orchestrator
//!
//! One `list_models` call performs the upstream fetch (following
//! `nextPageToken`), validates every page and runs the catalog pipeline.
//! Transport failures are returned as-is with the provider tag; nothing is
//! retried and no partial list is ever returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use siumai_catalog::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! let access = AccessConfig::gemini(std::env::var("GEMINI_API_KEY")?);
//! let models = list_models(&access, &CancellationToken::new()).await?;
//! for model in visible_models(&models) {
//!     println!("{} ({} tokens)", model.label, model.context_window);
//! }
//! ```

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::config::{AccessConfig, CatalogOptions, Dialect};
use crate::defaults;
use crate::error::{CatalogError, TransportError};
use crate::pipeline::{CatalogListing, CatalogPipeline};
use crate::providers::gemini;
use crate::registry::CatalogRegistry;
use crate::transport::{HttpFetcher, ReqwestFetcher};
use crate::types::ModelDescription;

/// Composes fetcher, registry and pipeline for each supported dialect.
///
/// Immutable after construction; share it behind an `Arc` and call
/// [`list_models`](Self::list_models) concurrently.
#[derive(Clone)]
pub struct CatalogDispatcher {
    fetcher: Arc<dyn HttpFetcher>,
    options: CatalogOptions,
    gemini: Option<CatalogPipeline>,
}

impl std::fmt::Debug for CatalogDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDispatcher")
            .field("options", &self.options)
            .field("gemini", &self.gemini.is_some())
            .finish_non_exhaustive()
    }
}

impl CatalogDispatcher {
    /// A dispatcher with no registered dialect.
    pub fn new(fetcher: Arc<dyn HttpFetcher>, options: CatalogOptions) -> Self {
        Self {
            fetcher,
            options,
            gemini: None,
        }
    }

    /// Register the Gemini pipeline over `registry`.
    pub fn with_gemini_registry(
        mut self,
        registry: Arc<CatalogRegistry>,
    ) -> Result<Self, CatalogError> {
        self.gemini = Some(CatalogPipeline::gemini(registry, &self.options)?);
        Ok(self)
    }

    /// Register an already built Gemini pipeline.
    pub fn with_gemini_pipeline(mut self, pipeline: CatalogPipeline) -> Self {
        self.gemini = Some(pipeline);
        self
    }

    /// Dispatcher over the curated Gemini table.
    pub fn with_default_tables(
        fetcher: Arc<dyn HttpFetcher>,
        options: CatalogOptions,
    ) -> Result<Self, CatalogError> {
        Self::new(fetcher, options).with_gemini_registry(Arc::new(gemini::default_registry()?))
    }

    pub fn options(&self) -> CatalogOptions {
        self.options
    }

    pub fn supports(&self, dialect: Dialect) -> bool {
        self.pipeline_for(dialect).is_some()
    }

    fn pipeline_for(&self, dialect: Dialect) -> Option<&CatalogPipeline> {
        match dialect {
            Dialect::Gemini => self.gemini.as_ref(),
            _ => None,
        }
    }

    /// Ordered model descriptions for `access`.
    pub async fn list_models(
        &self,
        access: &AccessConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModelDescription>, CatalogError> {
        Ok(self.list_catalog(access, cancel).await?.models)
    }

    /// Like [`list_models`](Self::list_models), also returning diagnostic lines.
    pub async fn list_catalog(
        &self,
        access: &AccessConfig,
        cancel: &CancellationToken,
    ) -> Result<CatalogListing, CatalogError> {
        let pipeline = self
            .pipeline_for(access.dialect)
            .ok_or_else(|| CatalogError::UnsupportedDialect(access.dialect.to_string()))?;
        access.validate()?;

        let provider = pipeline.provider();
        let mut models = Vec::new();
        let mut diagnostics = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;

        for page_number in 1..=defaults::gemini::MAX_PAGES {
            if cancel.is_cancelled() {
                return Err(CatalogError::transport(provider, TransportError::Cancelled));
            }

            let request = gemini::list_models_request(access, page_token.as_deref())?;
            let raw = self
                .fetcher
                .fetch_json(request, cancel)
                .await
                .map_err(|e| CatalogError::transport(provider, e))?;
            let page = pipeline.validate_page(&raw, &mut diagnostics)?;
            tracing::debug!(
                provider,
                page = page_number,
                count = page.models.len(),
                "fetched models page"
            );
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                None => return pipeline.process(&models, diagnostics),
                Some(next) => {
                    if !seen_tokens.insert(next.clone()) {
                        return Err(CatalogError::validation(
                            provider,
                            format!("nextPageToken '{next}' was repeated"),
                        ));
                    }
                    page_token = Some(next);
                }
            }
        }

        Err(CatalogError::validation(
            provider,
            format!(
                "listing did not finish within {} pages",
                defaults::gemini::MAX_PAGES
            ),
        ))
    }
}

/// Curated tables and options shared by every [`list_models`] call.
#[derive(Debug)]
struct DefaultTables {
    options: CatalogOptions,
    gemini: CatalogPipeline,
}

static DEFAULT_TABLES: OnceLock<Result<DefaultTables, String>> = OnceLock::new();

/// Built on first use; the diagnostics switch is read from the environment once.
fn default_tables() -> Result<&'static DefaultTables, CatalogError> {
    DEFAULT_TABLES
        .get_or_init(|| {
            let options = CatalogOptions::from_env();
            let registry = gemini::default_registry().map_err(|e| e.to_string())?;
            let gemini =
                CatalogPipeline::gemini(Arc::new(registry), &options).map_err(|e| e.to_string())?;
            Ok(DefaultTables { options, gemini })
        })
        .as_ref()
        .map_err(|e| CatalogError::ConfigurationError(format!("default tables unavailable: {e}")))
}

/// List models with the default transport (built from `access.http`), the
/// curated tables and [`CatalogOptions::from_env`].
///
/// The tables and options are built once per process; only the HTTP client
/// is created per call. Long-lived callers that want to reuse connections
/// should keep a [`CatalogDispatcher`] instead.
pub async fn list_models(
    access: &AccessConfig,
    cancel: &CancellationToken,
) -> Result<Vec<ModelDescription>, CatalogError> {
    let tables = default_tables()?;
    let fetcher = Arc::new(ReqwestFetcher::new(&access.http)?);
    CatalogDispatcher::new(fetcher, tables.options)
        .with_gemini_pipeline(tables.gemini.clone())
        .list_models(access, cancel)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::transport::JsonRequest;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Replays canned pages and records requested URLs.
    struct ScriptedFetcher {
        pages: Mutex<Vec<Result<Value, TransportError>>>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<Result<Value, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into_iter().rev().collect()),
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpFetcher for ScriptedFetcher {
        async fn fetch_json(
            &self,
            request: JsonRequest,
            _cancel: &CancellationToken,
        ) -> Result<Value, TransportError> {
            self.urls.lock().unwrap().push(request.url);
            self.pages
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(TransportError::HttpError("no more pages".into())))
        }
    }

    fn record(name: &str, display: &str) -> Value {
        json!({
            "name": name,
            "displayName": display,
            "supportedGenerationMethods": ["generateContent"],
            "inputTokenLimit": 1048576,
            "outputTokenLimit": 65536
        })
    }

    #[test]
    fn default_tables_are_built_once() {
        let first = default_tables().unwrap();
        let second = default_tables().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first.gemini.registry(), second.gemini.registry()));
        assert!(!first.gemini.registry().is_empty());
    }

    #[tokio::test]
    async fn shared_pipeline_dispatches_like_default_tables() {
        let tables = default_tables().unwrap();
        let page = json!({ "models": [record("models/gemini-2.5-pro", "Gemini 2.5 Pro")] });
        let models = CatalogDispatcher::new(
            ScriptedFetcher::new(vec![Ok(page)]),
            CatalogOptions::production(),
        )
        .with_gemini_pipeline(tables.gemini.clone())
        .list_models(&AccessConfig::gemini("k"), &CancellationToken::new())
        .await
        .unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].label, "Gemini 2.5 Pro");
    }

    fn dispatcher(fetcher: Arc<ScriptedFetcher>) -> CatalogDispatcher {
        CatalogDispatcher::with_default_tables(fetcher, CatalogOptions::production()).unwrap()
    }

    #[tokio::test]
    async fn follows_page_tokens_and_merges_pages() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(json!({
                "models": [record("models/gemini-2.5-flash-image", "Nano")],
                "nextPageToken": "p2"
            })),
            Ok(json!({ "models": [record("models/gemini-2.5-pro", "Gemini 2.5 Pro")] })),
        ]);
        let models = dispatcher(fetcher.clone())
            .list_models(&AccessConfig::gemini("k"), &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<_> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["models/gemini-2.5-pro", "models/gemini-2.5-flash-image"]);
        let urls = fetcher.urls.lock().unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[1].ends_with("pageToken=p2"));
    }

    #[tokio::test]
    async fn repeated_page_token_is_a_validation_error() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(json!({ "models": [], "nextPageToken": "same" })),
            Ok(json!({ "models": [], "nextPageToken": "same" })),
        ]);
        let err = dispatcher(fetcher)
            .list_models(&AccessConfig::gemini("k"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().contains("repeated"));
    }

    #[tokio::test]
    async fn unsupported_dialect_fails_before_fetching() {
        let fetcher = ScriptedFetcher::new(Vec::new());
        let access = AccessConfig::new(Dialect::OpenAi, "k");
        let err = dispatcher(fetcher.clone())
            .list_models(&access, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedDialect(ref d) if d == "openai"));
        assert_eq!(err.category(), ErrorCategory::Request);
        assert!(!err.is_retryable());
        assert!(fetcher.urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatcher_without_registry_rejects_gemini() {
        let fetcher = ScriptedFetcher::new(Vec::new());
        let bare = CatalogDispatcher::new(fetcher, CatalogOptions::production());
        assert!(!bare.supports(Dialect::Gemini));
        let err = bare
            .list_models(&AccessConfig::gemini("k"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedDialect(_)));
    }

    #[tokio::test]
    async fn transport_errors_are_tagged_verbatim() {
        let source = TransportError::RateLimitError("slow down".into());
        let fetcher = ScriptedFetcher::new(vec![Err(source.clone())]);
        let err = dispatcher(fetcher)
            .list_models(&AccessConfig::gemini("k"), &CancellationToken::new())
            .await
            .unwrap_err();
        let CatalogError::Transport { provider, source: inner } = &err else {
            panic!("expected transport error, got {err:?}");
        };
        assert_eq!(provider, "gemini");
        assert_eq!(inner, &source);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn cancelled_before_fetch() {
        let fetcher = ScriptedFetcher::new(Vec::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = dispatcher(fetcher.clone())
            .list_models(&AccessConfig::gemini("k"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Transport { source: TransportError::Cancelled, .. }
        ));
        assert!(fetcher.urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_access_is_a_request_error() {
        let fetcher = ScriptedFetcher::new(Vec::new());
        let err = dispatcher(fetcher)
            .list_models(&AccessConfig::gemini(""), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Request);
    }

    #[tokio::test]
    async fn diagnostic_mode_reports_without_changing_models() {
        let page = json!({ "models": [record("models/gemini-2.5-pro", "Gemini 2.5 Pro")] });
        let dev = CatalogDispatcher::with_default_tables(
            ScriptedFetcher::new(vec![Ok(page.clone())]),
            CatalogOptions::diagnostic(),
        )
        .unwrap();
        let prod = dispatcher(ScriptedFetcher::new(vec![Ok(page)]));
        let access = AccessConfig::gemini("k");
        let cancel = CancellationToken::new();

        let dev_listing = dev.list_catalog(&access, &cancel).await.unwrap();
        let prod_listing = prod.list_catalog(&access, &cancel).await.unwrap();
        assert!(!dev_listing.diagnostics.is_empty());
        assert!(prod_listing.diagnostics.is_empty());
        assert_eq!(dev_listing.models, prod_listing.models);
    }
}
