//! chatgate binary
//!
//! Unified chat gateway for OpenAI, Anthropic and DeepSeek

use anyhow::Result;
use chatgate::gate::config::GatewayConfig;
use chatgate::gate::handlers::GatewayState;
use chatgate::gate::server::start_server;
use chatgate::{
    CredentialResolver, Router, ANTHROPIC_KEY_NAME, DEEPSEEK_KEY_NAME, OPENAI_KEY_NAME,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// chatgate: unified chat gateway
#[derive(Parser, Debug)]
#[command(name = "chatgate")]
#[command(about = "Unified chat gateway for OpenAI, Anthropic and DeepSeek", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Host to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Credential file (TOML with a [credentials] table)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Validate configuration and report resolvable credentials, then exit
    #[arg(long)]
    validate: bool,
}

/// Load gateway configuration from file
fn load_gateway_config(config_path: &str) -> Result<GatewayConfig> {
    let content = std::fs::read_to_string(config_path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Default config file locations: ./chatgate.toml, then ~/.chatgate/config.toml
fn default_config_file() -> Option<String> {
    let local = "./chatgate.toml";
    if Path::new(local).exists() {
        return Some(local.to_string());
    }
    if let Some(home) = dirs::home_dir() {
        let home_config = format!("{}/.chatgate/config.toml", home.display());
        if Path::new(&home_config).exists() {
            return Some(home_config);
        }
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    let config_file = args.config.clone().or_else(default_config_file);

    let mut gateway_config = if let Some(ref config_path) = config_file {
        println!("Loading config from: {}", config_path);
        load_gateway_config(config_path)?
    } else {
        println!("Using default configuration");
        GatewayConfig::default()
    };

    // Override with CLI arguments
    if let Some(host) = args.host {
        gateway_config.host = host;
    }
    if let Some(port) = args.port {
        gateway_config.port = port;
    }
    if let Some(credentials) = args.credentials {
        gateway_config.credentials_file = Some(credentials);
    }

    let resolver = CredentialResolver::with_defaults(gateway_config.credentials_file.as_deref())?;

    if args.validate {
        validate_config(&gateway_config, &resolver)?;
        return Ok(());
    }

    // Fails fast here when any provider credential is missing, so the
    // process never starts serving a family it cannot reach.
    let router = Router::from_resolver(&resolver)?;

    let state = GatewayState {
        router: Arc::new(router),
    };

    start_server(gateway_config, state).await
}

/// Validate configuration and report which provider credentials resolve
fn validate_config(config: &GatewayConfig, resolver: &CredentialResolver) -> Result<()> {
    println!("Configuration validation:");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    println!("  Timeout: {}s", config.timeout_secs);

    if config.port < 1024 {
        anyhow::bail!("Invalid port: {} (must be 1024 or above)", config.port);
    }

    if config.timeout_secs < 10 || config.timeout_secs > 600 {
        anyhow::bail!(
            "Invalid timeout: {} (must be between 10 and 600 seconds)",
            config.timeout_secs
        );
    }

    println!("  Credentials:");
    for name in [OPENAI_KEY_NAME, ANTHROPIC_KEY_NAME, DEEPSEEK_KEY_NAME] {
        match resolver.resolve(name) {
            Ok(_) => println!("    - {}: found", name),
            Err(e) => println!("    - {}: {}", name, e),
        }
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
