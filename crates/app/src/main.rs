//! Folio - command-line client for the manuscript collaboration API.
//!
//! Wires the configuration, the stored session, and the reqwest transport
//! into an `ApiClient`, then runs one command.

mod cli;
mod commands;
mod output;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use folio_application::{
    ApiClient, ApiError, CredentialStorage, MemoryCredentialStorage, SessionStore,
};
use folio_infrastructure::{FileCredentialStorage, ReqwestTransport};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::output::Printer;
use crate::settings::Overrides;

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        credentials_path: cli.credentials.clone(),
    };
    let config = settings::load(cli.config.as_deref(), &overrides)
        .context("failed to load configuration")?;
    debug!(base_url = %config.base_url, ephemeral = cli.ephemeral, "configuration loaded");

    let storage: Arc<dyn CredentialStorage> = if cli.ephemeral {
        Arc::new(MemoryCredentialStorage::new())
    } else {
        let path = config
            .credentials_path
            .clone()
            .or_else(FileCredentialStorage::default_path)
            .context("no config directory on this platform; pass --credentials")?;
        Arc::new(FileCredentialStorage::new(path))
    };
    let session = SessionStore::load(storage)
        .await
        .context("failed to read the stored session")?;

    let transport =
        ReqwestTransport::new(config.base_url.clone(), &config.user_agent, config.timeout())?
            .with_session_cookies(session.clone());
    let client = ApiClient::new(Arc::new(transport), session, config.refresh_path);

    let result = commands::run(cli.command, &client, Printer::new(cli.json)).await;
    if let Err(e) = &result
        && e.downcast_ref::<ApiError>().is_some_and(ApiError::requires_sign_in)
    {
        forget_session(&client).await;
    }
    result
}

/// A terminal authentication failure leaves no usable session behind.
async fn forget_session(client: &ApiClient) {
    if let Err(e) = client.session().reset().await {
        warn!(error = %e, "stored session could not be cleared");
    }
}

/// The message shown to the user for a failed command.
fn describe(error: &anyhow::Error) -> String {
    if let Some(api) = error.downcast_ref::<ApiError>() {
        let message = api.server_message().unwrap_or_else(|| api.to_string());
        if api.requires_sign_in() {
            return format!("{message} (run `folio login` to sign in again)");
        }
        return message;
    }
    format!("{error:#}")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::ApiResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_describe_prefers_server_message() {
        let err = ApiError::from_response(&ApiResponse::json_body(
            400,
            &json!({ "name": ["This field may not be blank."] }),
        ));
        assert_eq!(
            describe(&anyhow::Error::new(err)),
            "This field may not be blank."
        );
    }

    #[test]
    fn test_describe_suggests_login_after_failed_refresh() {
        let inner = ApiError::from_response(&ApiResponse::json_body(
            401,
            &json!({ "detail": "Token is invalid or expired" }),
        ));
        let err = ApiError::RefreshFailed(Box::new(inner));
        assert_eq!(
            describe(&anyhow::Error::new(err)),
            "Token is invalid or expired (run `folio login` to sign in again)"
        );
    }

    #[test]
    fn test_describe_keeps_context_chain() {
        let err = anyhow::anyhow!("disk full").context("failed to read the stored session");
        assert_eq!(describe(&err), "failed to read the stored session: disk full");
    }
}
