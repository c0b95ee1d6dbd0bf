use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use service_dispatch_core::DispatchResult;
use service_dispatch_domain::{DispatchRequest, HttpMethod};

/// Operator CLI for a remote dispatch service.
#[derive(Parser, Debug)]
#[command(name = "service-dispatch-cli", version, disable_help_subcommand = true)]
pub struct Cli {
    /// Operation to run against the service.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Probe the service root; exits non-zero when unhealthy.
    Ping,
    /// List transactions known to the service.
    Transactions,
    /// Look one transaction up.
    Transaction {
        /// Transaction id, or the caller's external id with `--external`.
        #[arg(value_name = "ID")]
        transaction_id: String,
        /// Treat the id as an external id.
        #[arg(long = "external")]
        by_external_id: bool,
    },
    /// Create a transaction and wait for every target.
    SendSync(SyncArgs),
    /// Create a transaction that reports back through a callback.
    SendAsync(AsyncArgs),
    /// Send a full request descriptor and print the decoded outcomes.
    Send(SendArgs),
}

/// Target selection shared by the send commands.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct TargetArgs {
    /// HTTP verb forwarded to the service (GET, POST, PUT, PATCH, DELETE).
    #[arg(value_name = "METHOD")]
    pub method: String,
    /// Target type routed by the service.
    #[arg(value_name = "TYPE")]
    pub target_type: String,
    /// Action requested from the targets.
    #[arg(value_name = "ACTION")]
    pub action: String,
    /// JSON object forwarded to the targets.
    #[arg(value_name = "PAYLOAD_JSON", value_parser = parse_payload)]
    pub payload: Option<Map<String, Value>>,
    /// Caller-side correlation id.
    #[arg(long, value_name = "ID")]
    pub external_id: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Call the targets in parallel.
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AsyncArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// URL notified once every target has answered.
    #[arg(long, value_name = "URL")]
    pub callback_url: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SendArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Restrict the transaction to one service.
    #[arg(long, value_name = "NAME")]
    pub service: Option<String>,
    /// Create the transaction asynchronously.
    #[arg(long = "async")]
    pub is_async: bool,
    /// Call the targets in parallel.
    #[arg(long)]
    pub parallel: bool,
    /// URL notified once every target has answered.
    #[arg(long, value_name = "URL")]
    pub callback_url: Option<String>,
}

impl SendArgs {
    /// Builds the typed descriptor used by the `send` command.
    pub fn to_request(&self) -> DispatchResult<DispatchRequest> {
        let target = &self.target;
        let mut request = DispatchRequest::new()
            .with_method(HttpMethod::parse(target.method.as_str())?)
            .with_target_type(target.target_type.as_str())
            .with_action(target.action.as_str())
            .with_async(self.is_async)
            .with_parallel(self.parallel);
        request.set_payload(target.payload.clone());
        request.set_external_id(target.external_id.clone());
        request.set_service(self.service.clone());
        request.set_callback_url(self.callback_url.clone());
        Ok(request)
    }
}

fn parse_payload(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(_) => Err("payload must be a JSON object".to_owned()),
        Err(error) => Err(format!("payload is not valid JSON: {error}")),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;
    use serde_json::json;
    use service_dispatch_domain::HttpMethod;

    use super::{Cli, Command, SendArgs, TargetArgs};

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("service-dispatch-cli").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn parses_lookup_commands() {
        assert_eq!(parse(&["ping"]).ok(), Some(Command::Ping));
        assert_eq!(parse(&["transactions"]).ok(), Some(Command::Transactions));
        assert_eq!(
            parse(&["transaction", "ext-1", "--external"]).ok(),
            Some(Command::Transaction {
                transaction_id: "ext-1".to_owned(),
                by_external_id: true,
            })
        );
        assert!(parse(&["transaction"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn parses_send_flags_and_payload() {
        let command = parse(&[
            "send",
            "post",
            "orders",
            "sync",
            r#"{"order_id": 42}"#,
            "--service",
            "billing",
            "--async",
            "--callback-url",
            "https://caller.test/hook",
        ]);

        let Ok(Command::Send(send)) = command else {
            panic!("expected send command");
        };
        assert_eq!(send.service.as_deref(), Some("billing"));
        assert!(send.is_async);
        assert!(!send.parallel);

        let request = send.to_request();
        assert!(request.is_ok());
        let request = request.unwrap_or_default();
        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.callback_url(), Some("https://caller.test/hook"));
        assert_eq!(
            request.payload().and_then(|payload| payload.get("order_id")),
            Some(&json!(42))
        );
    }

    #[test]
    fn sync_and_async_commands_accept_only_their_own_flags() {
        let Ok(Command::SendSync(sync)) =
            parse(&["send-sync", "put", "orders", "sync", "--parallel"])
        else {
            panic!("expected send-sync command");
        };
        assert!(sync.parallel);
        assert_eq!(sync.target.payload, None);

        let Ok(Command::SendAsync(async_args)) = parse(&[
            "send-async",
            "post",
            "orders",
            "sync",
            "--external-id",
            "ext-9",
            "--callback-url",
            "https://caller.test/hook",
        ]) else {
            panic!("expected send-async command");
        };
        assert_eq!(async_args.target.external_id.as_deref(), Some("ext-9"));
        assert_eq!(
            async_args.callback_url.as_deref(),
            Some("https://caller.test/hook")
        );

        assert_eq!(
            parse(&["send-sync", "post", "orders", "sync", "--callback-url", "x"])
                .map_err(|error| error.kind())
                .err(),
            Some(ErrorKind::UnknownArgument)
        );
    }

    #[test]
    fn rejects_non_object_payload_and_missing_flag_values() {
        assert_eq!(
            parse(&["send-sync", "post", "orders", "sync", "[1]"])
                .map_err(|error| error.kind())
                .err(),
            Some(ErrorKind::ValueValidation)
        );
        assert!(parse(&["send-async", "post", "orders", "sync", "--external-id"]).is_err());
        assert!(parse(&["send-sync", "post", "orders"]).is_err());
    }

    #[test]
    fn unsupported_method_is_reported_when_building_request() {
        let send = SendArgs {
            target: TargetArgs {
                method: "trace".to_owned(),
                target_type: "orders".to_owned(),
                action: "sync".to_owned(),
                payload: None,
                external_id: None,
            },
            service: None,
            callback_url: None,
            is_async: false,
            parallel: false,
        };

        assert!(send.to_request().is_err());
    }
}
