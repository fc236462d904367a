//! Print the curated Gemini model catalog as JSON.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use siumai_catalog::prelude::*;
use siumai_catalog::telemetry;
use siumai_catalog::transport::ReqwestFetcher;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "siumai-catalog")]
#[command(about = "List curated Gemini models", long_about = None)]
struct Cli {
    /// Gemini API key
    #[arg(long = "api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Override the API base URL
    #[arg(long = "base-url", env = "GEMINI_BASE_URL")]
    base_url: Option<String>,

    /// Models per upstream page
    #[arg(long = "page-size")]
    page_size: Option<u32>,

    /// Include hidden models
    #[arg(long = "all", default_value_t = false)]
    all: bool,

    /// Report allow-list entries missing upstream
    #[arg(long = "diagnostics", default_value_t = false)]
    diagnostics: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _guard = match telemetry::init_from_env() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(category = ?e.category(), "{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CatalogError> {
    let mut access = AccessConfig::gemini(cli.api_key);
    if let Some(base_url) = cli.base_url {
        access = access.with_base_url(base_url);
    }
    if let Some(page_size) = cli.page_size {
        access = access.with_page_size(page_size);
    }

    let options = if cli.diagnostics {
        CatalogOptions::diagnostic()
    } else {
        CatalogOptions::from_env()
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let fetcher = Arc::new(ReqwestFetcher::new(&access.http)?);
    let dispatcher = CatalogDispatcher::with_default_tables(fetcher, options)?;
    let listing = dispatcher.list_catalog(&access, &cancel).await?;

    let models: Vec<&ModelDescription> = if cli.all {
        listing.models.iter().collect()
    } else {
        visible_models(&listing.models)
    };
    let output = serde_json::to_string_pretty(&models).map_err(|e| {
        CatalogError::InternalError(format!("Failed to serialize models: {e}"))
    })?;
    println!("{output}");

    for line in &listing.diagnostics {
        eprintln!("{line}");
    }
    Ok(())
}
