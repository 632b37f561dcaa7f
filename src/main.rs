mod cli;

use strm_webhook::{
    config::{self, Config},
    server,
    strm::{codec::ensure_absolute, GenerationResult, StrmGenerator},
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    log_banner(&config);
    server::start_server(config).await
}

fn log_banner(config: &Config) {
    tracing::info!("Starting strm-webhook {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  AList URL:    {}", config.alist.url);
    tracing::info!("  STRM prefix:  {}", config.strm.server);
    tracing::info!("  Save dir:     {}", config.strm.save_dir.display());
    if !config.strm.replace_path.is_empty() {
        tracing::info!("  Path rewrite: -> {}", config.strm.replace_path);
    }
    tracing::info!(
        "  Listening on: {}:{}",
        config.server.host,
        config.server.port
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "strm_webhook=trace,tower_http=debug".to_string()
        } else {
            "strm_webhook=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Generate { path } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let generator = StrmGenerator::from_config(&config);
            let rt = tokio::runtime::Runtime::new()?;
            let result = rt.block_on(generator.generate(&ensure_absolute(&path)));
            print_result(&result)
        }
        Commands::Direct { files } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let generator = StrmGenerator::from_config(&config);
            let rt = tokio::runtime::Runtime::new()?;
            let result = rt.block_on(generator.generate_files(&files));
            print_result(&result)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("strm-webhook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn print_result(result: &GenerationResult) -> Result<()> {
    let summary = serde_json::json!({
        "counts": result.counts(),
        "details": result,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::load_config_or_default(None)?
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  AList: {}", config.alist.url);
    println!("  Auth token: {}", !config.alist.token.is_empty());
    println!("  STRM prefix: {}", config.strm.server);
    println!("  Save dir: {}", config.strm.save_dir.display());
    if !config.strm.replace_path.is_empty() {
        println!("  Path rewrite: {}", config.strm.replace_path);
    }
    println!("  Video extensions: {}", config.strm.video_exts.join(", "));

    Ok(())
}
