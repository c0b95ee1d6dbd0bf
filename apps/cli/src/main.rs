//! Operator CLI for the service dispatch client.

#![forbid(unsafe_code)]

mod cli_config;
mod command;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use service_dispatch_application::DispatchClient;
use service_dispatch_core::{DispatchError, DispatchResult};
use service_dispatch_infrastructure::{ReqwestHttpTransport, TracingDispatchLogger};
use tracing::{error, info, warn};

use crate::cli_config::{CliConfig, init_tracing};
use crate::command::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing();

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            error!(code = error.code(), error = %error, "service-dispatch-cli failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> DispatchResult<bool> {
    let config = CliConfig::load()?;
    let transport = ReqwestHttpTransport::with_timeout(config.timeout)?;
    let client = DispatchClient::new(config.client_config()?, Arc::new(transport))
        .with_logger(Arc::new(TracingDispatchLogger));

    info!(
        base_url = %client.config().base_url(),
        debug = config.debug,
        timeout_seconds = config.timeout.as_secs(),
        "service-dispatch-cli started"
    );

    match command {
        Command::Ping => {
            let healthy = client.ping().await;
            if healthy {
                info!("dispatch service is healthy");
                println!("ok");
            } else {
                warn!("dispatch service is unhealthy");
            }
            Ok(healthy)
        }
        Command::Transactions => print_raw(client.transactions().await?),
        Command::Transaction {
            transaction_id,
            by_external_id,
        } => print_raw(
            client
                .transaction(transaction_id.as_str(), by_external_id)
                .await?,
        ),
        Command::SendSync(send) => print_raw(
            client
                .send_sync(
                    send.target.method.as_str(),
                    send.target.target_type.as_str(),
                    send.target.action.as_str(),
                    send.target.payload,
                    send.target.external_id.as_deref(),
                    send.parallel,
                )
                .await?,
        ),
        Command::SendAsync(send) => print_raw(
            client
                .send_async(
                    send.target.method.as_str(),
                    send.target.target_type.as_str(),
                    send.target.action.as_str(),
                    send.target.payload,
                    send.target.external_id.as_deref(),
                    send.callback_url.as_deref(),
                )
                .await?,
        ),
        Command::Send(send) => {
            let request = send.to_request()?;
            let response = client.send_request(&request).await?;

            info!(
                transaction_id = response.transaction_id().unwrap_or("<unknown>"),
                items = response.count(),
                succeeded = response.success_items().len(),
                failed = response.failed_items().len(),
                no_response = response.no_response_items().len(),
                "dispatch transaction completed"
            );

            let rendered = serde_json::to_string_pretty(&response).map_err(|error| {
                DispatchError::Validation(format!("failed to render response: {error}"))
            })?;
            println!("{rendered}");
            Ok(response.failed_items().is_empty())
        }
    }
}

fn print_raw(value: Option<Value>) -> DispatchResult<bool> {
    let Some(value) = value else {
        warn!("dispatch service returned no JSON body");
        return Ok(true);
    };

    let rendered = serde_json::to_string_pretty(&value).map_err(|error| {
        DispatchError::Validation(format!("failed to render response: {error}"))
    })?;
    println!("{rendered}");
    Ok(true)
}
