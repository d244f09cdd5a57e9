//! Lexigraph — knowledge graph service for recorded meetings and lectures.

use std::path::PathBuf;
use std::sync::Arc;

use lexigraph_llm::{CompletionBackend, HttpBackend, LLMConfig};
use lexigraph_server::{build_router, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("LEXIGRAPH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                println!("Lexigraph — knowledge graph service for recordings");
                println!();
                println!("Usage: lexigraph [command]");
                println!();
                println!("Commands:");
                println!("  (none)    Start the server");
                println!("  help      Show this help message");
                println!();
                println!("Environment:");
                println!("  PORT                 Listen port (default 3010)");
                println!("  LEXIGRAPH_DATA_DIR   Data directory (default ./data)");
                println!("  ANTHROPIC_API_KEY, GROQ_API_KEY, OPENAI_API_KEY");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'lexigraph help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = lexigraph_core::LexigraphConfig::from_env(&data_dir)?;
    let port = config.port;

    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
    let backend = HttpBackend::from_config(&llm_config)
        .map(|b| Arc::new(b) as Arc<dyn CompletionBackend>);
    if backend.is_none() {
        warn!("No language model configured; extraction runs locally only");
    }

    let state = Arc::new(AppState::new(config, backend));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Lexigraph server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
