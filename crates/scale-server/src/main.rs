use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use scale_server::{logging, Server, ServerArgs, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = ServerConfig::from(ServerArgs::parse());
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Failed to start server: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!(
        "starting on port {}, users from {}, journal {}",
        config.port,
        config.credentials_path.display(),
        config.log_path.display()
    );

    let server = Server::start(config)
        .await
        .context("server setup failed")?;
    tracing::info!("listening on {}", server.local_addr());

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("cannot listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}
