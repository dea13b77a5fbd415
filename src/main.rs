use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use order_pipeline::app::App;
use order_pipeline::config::Config;
use order_pipeline::error::AppError;
use order_pipeline::interfaces::http;
use order_pipeline::interfaces::json::order_reader::OrderReader;
use order_pipeline::interfaces::json::response_writer::ResponseWriter;
use order_pipeline::telemetry;
use std::fs::File;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
    },
    /// Process orders from a JSON-lines file and print one response per line
    Run {
        /// Input orders file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.config.log_format);

    let app = App::new(&cli.config);

    match cli.command {
        Command::Serve { addr } => {
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| AppError::BindError { addr, source })
                .into_diagnostic()?;
            info!(address = %addr, "Server listening");

            http::serve(listener, app.handler, shutdown_signal())
                .await
                .into_diagnostic()?;
            info!("Server shut down gracefully");
        }
        Command::Run { input } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = OrderReader::new(file);
            let stdout = io::stdout();
            let mut writer = ResponseWriter::new(stdout.lock());

            for order in reader.orders() {
                match order {
                    Ok(order) => {
                        let (_, response) = app.handler.handle(order).await;
                        writer.write_response(&response).into_diagnostic()?;
                    }
                    Err(e) => {
                        eprintln!("Error reading order: {}", e);
                    }
                }
            }
            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
