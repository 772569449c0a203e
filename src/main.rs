//! quiz-mvc
//!
//! Front controller for the quiz application.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::rewrite ("url=<path>&<query>")
//!                                          │
//!                                          ▼
//!                     routing::cache ──▶ routing::router ──▶ app::registry
//!                     (route table)      (controller →       (Controller impl)
//!                                         action → view)          │
//!                                                                 ▼
//!     Client Response                                        app::binding
//!     ◀────────────── http::response ◀── app::render ◀──── Controller::invoke
//!                     (HTML / 303 /      (view file +
//!                      failure page)      placeholders)
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quiz_mvc::app::bind_arguments;
use quiz_mvc::config::{load_config, AppConfig};
use quiz_mvc::lifecycle::{signals, startup, Shutdown};
use quiz_mvc::observability::logging;
use quiz_mvc::quiz::TestsController;
use quiz_mvc::routing::{format_url, RouteTableCache, Router, RouterSettings};
use quiz_mvc::ControllerRegistry;

#[derive(Parser)]
#[command(name = "quiz-mvc")]
#[command(about = "Quiz application front controller", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,
    /// List every controller action and its URL
    Routes,
    /// Resolve a rewritten query such as "url=tests/questions/1/2"
    Resolve {
        /// Omit to resolve the bare entry point.
        raw: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    logging::init(&config.observability.log_level);

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Routes => routes(&config)?,
        Commands::Resolve { raw } => resolve(&config, raw.as_deref())?,
    }

    Ok(())
}

fn registry() -> ControllerRegistry {
    ControllerRegistry::new().with(TestsController::sample())
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        controller_dir = %config.paths.controller_dir.display(),
        view_dir = %config.paths.view_dir.display(),
        "quiz-mvc starting"
    );

    let app = startup::prepare(&config, registry())?;
    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::serve(config, app, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn routes(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let table = RouteTableCache::from_config(config).get()?;

    for controller in table.controllers() {
        let short = controller.short_name().to_lowercase();
        for action in controller.actions() {
            let placeholders: Vec<String> = action.params().iter().map(|p| format!("{{{p}}}")).collect();
            println!(
                "{}::{}({})  {}",
                controller.name(),
                action.name(),
                action.params().join(", "),
                format_url(&config.routing.mount_path, &short, action.name(), &placeholders, "")
            );
        }
    }
    Ok(())
}

fn resolve(config: &AppConfig, raw: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let table = RouteTableCache::from_config(config).get()?;
    let router = Router::resolve(table, &RouterSettings::from_config(config), raw)?;

    println!("controller: {}", router.controller());
    println!("action:     {}", router.action());
    println!("args:       {:?}", router.args());
    println!("query:      {}", router.query());
    println!("view:       {}", router.view().display());

    let bound = bind_arguments(router.controller(), router.signature(), router.args())?;
    for (param, value) in bound.iter() {
        println!("  ${param} = {}", value.unwrap_or("<default>"));
    }
    Ok(())
}
