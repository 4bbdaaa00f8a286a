//! mtls-rpc CLI - Call a JSON-RPC method over mutual TLS
//!
//! Endpoint and credentials come from flags or the environment; the response
//! is pretty-printed, failures are reported as a single message.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use mtls_rpc_sdk::{connect, connect_with_timeout, ClientConfig, CredentialStaging, ParamsLayout};
use serde_json::Value;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Parser)]
#[command(name = "mtls-rpc")]
#[command(about = "Call a JSON-RPC 2.0 method over mutual TLS", long_about = None)]
#[command(version)]
struct Cli {
    /// Method name (e.g., auth.check)
    method: String,

    /// Parameters as a JSON object
    params: String,

    /// RPC endpoint URL
    #[arg(long, env = "MTLS_RPC_URL")]
    url: String,

    /// Client private key (PEM text)
    #[arg(
        long,
        env = "MTLS_RPC_CLIENT_KEY",
        hide_env_values = true,
        conflicts_with = "client_key_file"
    )]
    client_key: Option<String>,

    /// Read the client private key from a PEM file
    #[arg(long)]
    client_key_file: Option<PathBuf>,

    /// Client certificate (PEM text)
    #[arg(
        long,
        env = "MTLS_RPC_CLIENT_CERT",
        hide_env_values = true,
        conflicts_with = "client_cert_file"
    )]
    client_cert: Option<String>,

    /// Read the client certificate from a PEM file
    #[arg(long)]
    client_cert_file: Option<PathBuf>,

    /// Request timeout in seconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Directory for the temporary credential files
    #[arg(long, env = "MTLS_RPC_STAGING_DIR")]
    staging_dir: Option<PathBuf>,

    /// Pass credentials to TLS in memory instead of staging files
    #[arg(long, conflicts_with = "staging_dir")]
    in_memory: bool,

    /// Send params nested under "params" (strict JSON-RPC 2.0)
    #[arg(long)]
    nested_params: bool,
}

fn init_logging() {
    let log_format = std::env::var("MTLS_RPC_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mtls_rpc=warn"));

    // stdout carries the response only
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn read_pem(inline: Option<String>, file: Option<&PathBuf>, what: &str) -> Result<String> {
    match (inline, file) {
        (Some(pem), _) => Ok(pem),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read client {} from {}", what, path.display())),
        (None, None) => anyhow::bail!(
            "Missing client {}: set --client-{} or --client-{}-file",
            what,
            what,
            what
        ),
    }
}

fn build_config(cli: &mut Cli) -> Result<ClientConfig> {
    let key = read_pem(cli.client_key.take(), cli.client_key_file.as_ref(), "key")?;
    let cert = read_pem(cli.client_cert.take(), cli.client_cert_file.as_ref(), "cert")?;

    let mut config = ClientConfig::new(cli.url.clone(), key, cert);

    if cli.in_memory {
        config = config.with_staging(CredentialStaging::InMemory);
    } else if let Some(dir) = &cli.staging_dir {
        config = config.with_staging_dir(dir);
    }

    if cli.nested_params {
        config = config.with_params_layout(ParamsLayout::Nested);
    }

    Ok(config)
}

/// Parse params, call the endpoint, return the response or a user-facing message
fn process_rpc_request(cli: &mut Cli) -> std::result::Result<Value, String> {
    let params: Value = serde_json::from_str(&cli.params).map_err(|e| {
        tracing::error!(error = %e, "Invalid JSON");
        "Invalid JSON format".to_string()
    })?;

    let config = build_config(cli).map_err(|e| format!("{:#}", e))?;

    let client = match cli.timeout_secs {
        0 => connect(config),
        secs => connect_with_timeout(config, Duration::from_secs(secs)),
    };

    client
        .send_value(&cli.method, params)
        .map_err(|e| format!("Error while calling the API: {}", e.detailed_message()))
}

fn main() -> ExitCode {
    init_logging();

    let mut cli = Cli::parse();

    match process_rpc_request(&mut cli) {
        Ok(response) => {
            let pretty =
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string());

            if response.get("error").is_some() {
                eprintln!("{}", "✗ Server returned a JSON-RPC error".yellow().bold());
            }
            println!("{}", pretty);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{} {}", "✗".red().bold(), message);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["mtls-rpc"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_invalid_json_params() {
        let mut cli = parse(&[
            "auth.check",
            "{not json",
            "--url",
            "https://example.com/api",
            "--client-key",
            "key",
            "--client-cert",
            "cert",
        ]);

        let err = process_rpc_request(&mut cli).unwrap_err();
        assert_eq!(err, "Invalid JSON format");
    }

    #[test]
    fn test_empty_params_reported() {
        let mut cli = parse(&[
            "auth.check",
            "{}",
            "--url",
            "https://example.com/api",
            "--client-key",
            "key",
            "--client-cert",
            "cert",
            "--in-memory",
        ]);

        let err = process_rpc_request(&mut cli).unwrap_err();
        assert!(err.starts_with("Error while calling the API: Invalid argument"));
    }

    #[test]
    fn test_missing_key_reported() {
        let mut cli = parse(&[
            "auth.check",
            "{\"id\": 1}",
            "--url",
            "https://example.com/api",
            "--client-cert",
            "cert",
        ]);
        // Environment may supply a key; force the missing case
        cli.client_key = None;

        let err = build_config(&mut cli).unwrap_err();
        assert!(err.to_string().contains("Missing client key"));
    }

    #[test]
    fn test_build_config_options() {
        let mut cli = parse(&[
            "auth.check",
            "{\"id\": 1}",
            "--url",
            "https://example.com/api",
            "--client-key",
            "key",
            "--client-cert",
            "cert",
            "--staging-dir",
            "/tmp/mtls",
            "--nested-params",
        ]);

        let config = build_config(&mut cli).unwrap();
        assert_eq!(config.endpoint_url(), "https://example.com/api");
        assert_eq!(config.client_key_pem(), "key");
        assert_eq!(
            config.staging(),
            &CredentialStaging::TempFiles {
                dir: Some(PathBuf::from("/tmp/mtls"))
            }
        );
        assert_eq!(config.params_layout(), ParamsLayout::Nested);
    }
}
