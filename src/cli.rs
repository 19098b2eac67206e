//! Command-line interface for the armory server.
//!
//! Provides the `serve` command that wires the routing table, dispatcher and
//! middleware together, plus small inspection commands that print the routing
//! table or the OpenAPI document without starting a server.

use crate::dispatcher::Dispatcher;
use crate::docs;
use crate::middleware::{MetricsMiddleware, TracingMiddleware};
use crate::registry;
use crate::router::Router;
use crate::routes::routes;
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer};
use clap::{Parser, Subcommand};
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "armory")]
#[command(about = "Armory demo API server", long_about = None, version)]
pub struct Cli {
    /// The subcommand to execute; defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address and port to bind the server to
        #[arg(long, env = "ARMORY_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,

        /// Emit logs as JSON lines instead of human-readable text
        #[arg(long, default_value_t = false)]
        json_logs: bool,
    },
    /// Print the routing table and exit
    Routes,
    /// Print the OpenAPI document and exit
    Openapi,
}

/// Execute the CLI command provided by the user.
///
/// # Errors
///
/// Returns an error if logging cannot be initialized, the listen address is
/// invalid, or the server terminates abnormally.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Serve { addr, json_logs }) => serve(&addr, json_logs),
        None => serve(&default_addr(), false),
        Some(Commands::Routes) => {
            Router::new(routes()).dump_routes();
            Ok(())
        }
        Some(Commands::Openapi) => {
            let doc = docs::openapi_json(&routes());
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
    }
}

/// Listen address used when no subcommand is given. Honors the same
/// `ARMORY_ADDR` environment variable as `serve --addr`.
fn default_addr() -> String {
    std::env::var("ARMORY_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}

fn serve(addr: &str, json_logs: bool) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(json_logs)?;

    let config = RuntimeConfig::from_env();
    may::config().set_stack_size(config.stack_size);

    let table = routes();
    let router = Arc::new(Router::new(table.clone()));

    let mut dispatcher = Dispatcher::new();
    let metrics = Arc::new(MetricsMiddleware::new());
    dispatcher.add_middleware(metrics.clone());
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    // SAFETY: the may runtime stack size is configured above and every handler
    // coroutine is spawned before the server accepts traffic.
    unsafe {
        registry::register_all(&mut dispatcher);
    }

    let mut service = AppService::new(&table, router, Arc::new(dispatcher));
    service.set_metrics_middleware(metrics);

    info!(
        addr = %addr,
        stack_size = config.stack_size,
        routes_count = table.len(),
        "armory listening"
    );
    let handle = HttpServer(service).start(addr)?;
    handle
        .join()
        .map_err(|e| Box::<dyn std::error::Error>::from(io::Error::other(format!("{e:?}"))))?;
    Ok(())
}

fn init_logging(json_logs: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The embedded HTTP server logs client disconnects loudly; keep warn+ only.
    if let Ok(directive) = "may_minihttp=warn".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()?;
    }
    Ok(())
}
