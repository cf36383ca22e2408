// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! Mindbridge CLI entrypoint.
//!
//! By default this runs the bridge server: a loopback HTTP command channel
//! over one in-memory mind map on port 8765.
//!
//! Use `--mcp` to run the client adapter instead: an MCP server over stdio
//! whose tools each perform one HTTP call against a running bridge.

use std::error::Error;
use std::time::Duration;

use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mindbridge::bridge::{self, AppState, BridgeServer, DEFAULT_HOST, DEFAULT_PORT};
use mindbridge::mcp::{BridgeClient, MindBridgeMcp};
use mindbridge::model::{fixtures, Document};

const LOG_ENV: &str = "MINDBRIDGE_LOG";
const REBIND_ATTEMPTS: usize = 10;
const REBIND_DELAY: Duration = Duration::from_millis(200);

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--demo] [--port <port>] [--debug-traces]\n  {program} --mcp\n\nBridge mode (default) serves the command channel at `http://{DEFAULT_HOST}:<port>`\n(default port {DEFAULT_PORT}). --demo seeds a populated demo map instead of an\nempty one. --debug-traces attaches stack frames to 500 replies.\n\n--mcp runs the MCP client adapter over stdio against a running bridge; the\nbridge location comes from MINDBRIDGE_HOST / MINDBRIDGE_PORT. --mcp cannot be\ncombined with the bridge-mode flags."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    demo: bool,
    port: Option<u16>,
    debug_traces: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--debug-traces" => {
                if options.debug_traces {
                    return Err(());
                }
                options.debug_traces = true;
            }
            _ => return Err(()),
        }
    }

    if options.mcp && (options.demo || options.port.is_some() || options.debug_traces) {
        return Err(());
    }

    Ok(options)
}

/// Adapter mode logs to stderr: stdout carries the MCP wire.
fn init_tracing(to_stderr: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();
    let result = if to_stderr {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .try_init()
    };
    let _ = result;
}

/// Binds the bridge socket. When the port is held by a previous instance,
/// asks it to stop over `POST /stop` and retries briefly (starting is
/// idempotent with respect to an earlier bridge, not additive).
async fn bind_replacing_previous(
    host: &str,
    port: u16,
    state: AppState,
) -> Result<BridgeServer, bridge::BridgeError> {
    let addr = format!("{host}:{port}");
    let first = match BridgeServer::bind(&addr, state.clone()).await {
        Err(err) if err.is_addr_in_use() => err,
        other => return other,
    };
    info!("port {port} is busy, asking the previous bridge instance to stop");
    if let Err(err) = bridge::request_stop(host, port).await {
        info!("previous instance did not answer the stop request: {err}");
        return Err(first);
    }
    for _ in 0..REBIND_ATTEMPTS {
        tokio::time::sleep(REBIND_DELAY).await;
        match BridgeServer::bind(&addr, state.clone()).await {
            Err(err) if err.is_addr_in_use() => continue,
            other => return other,
        }
    }
    Err(first)
}

async fn run_bridge(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let document = if options.demo {
        fixtures::demo_document()
    } else {
        Document::new("New Mind Map", "New Mind Map")
    };
    let state = AppState::new(document, options.debug_traces);
    let port = options.port.unwrap_or(DEFAULT_PORT);

    let server = bind_replacing_previous(DEFAULT_HOST, port, state).await?;
    server.serve().await?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mindbridge".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(1);
            }
        };

        init_tracing(options.mcp);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.mcp {
            let client = BridgeClient::from_env()?;
            info!("adapter targeting bridge at {}", client.base_url());
            let mcp = MindBridgeMcp::new(client);
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        runtime.block_on(run_bridge(options))
    })();

    if let Err(err) = result {
        eprintln!("mindbridge: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use mindbridge::bridge::{AppState, BridgeServer};
    use mindbridge::model::Document;

    use super::{bind_replacing_previous, parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_mcp_flag() {
        let options = parse_options(["--mcp".to_owned()].into_iter()).expect("parse options");
        assert!(options.mcp);
        assert!(!options.demo);
        assert_eq!(options.port, None);
    }

    #[test]
    fn parses_bridge_flags_in_any_order() {
        let options = parse_options(
            ["--debug-traces".to_owned(), "--port".to_owned(), "9100".to_owned(), "--demo".to_owned()]
                .into_iter(),
        )
        .expect("parse options");
        assert!(options.demo);
        assert!(options.debug_traces);
        assert_eq!(options.port, Some(9100));

        let options = parse_options(
            ["--demo".to_owned(), "--port".to_owned(), "9100".to_owned()].into_iter(),
        )
        .expect("parse options");
        assert!(options.demo);
        assert!(!options.debug_traces);
        assert_eq!(options.port, Some(9100));
    }

    #[test]
    fn rejects_mcp_with_bridge_flags() {
        parse_options(["--mcp".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();

        parse_options(["--mcp".to_owned(), "--port".to_owned(), "9100".to_owned()].into_iter())
            .unwrap_err();

        parse_options(["--mcp".to_owned(), "--debug-traces".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();

        parse_options(["extra".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(["--demo".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();

        parse_options(
            ["--port".to_owned(), "1".to_owned(), "--port".to_owned(), "2".to_owned()].into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_bad_port_values() {
        parse_options(["--port".to_owned()].into_iter()).unwrap_err();

        parse_options(["--port".to_owned(), "eight".to_owned()].into_iter()).unwrap_err();

        parse_options(["--port".to_owned(), "70000".to_owned()].into_iter()).unwrap_err();
    }

    #[tokio::test]
    async fn binding_an_occupied_port_stops_the_previous_instance() {
        let previous = BridgeServer::bind("127.0.0.1:0", AppState::new(Document::new("Old", "Old"), false))
            .await
            .expect("bind previous instance");
        let port = previous.local_addr().port();
        let previous_serve = tokio::spawn(previous.serve());

        let replacement = bind_replacing_previous(
            "127.0.0.1",
            port,
            AppState::new(Document::new("New", "New"), false),
        )
        .await
        .expect("replace previous instance");
        assert_eq!(replacement.local_addr().port(), port);

        // The old serve loop ended once its stop request was honoured.
        previous_serve
            .await
            .expect("join previous serve")
            .expect("previous serve result");
    }

    #[tokio::test]
    async fn binding_a_free_port_needs_no_stop_request() {
        let server = bind_replacing_previous(
            "127.0.0.1",
            0,
            AppState::new(Document::new("Fresh", "Fresh"), false),
        )
        .await
        .expect("bind fresh port");
        assert_ne!(server.local_addr().port(), 0);
    }
}
