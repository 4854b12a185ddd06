//! Composition root: owns the store, the transport and the client.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use log::{debug, info};
use planner_core::{Planner, PlannerBuilder};
use planner_rpc::{PlannerClient, RpcServer};
use tokio::signal::unix::{SignalKind, signal};

use crate::config::{Config, Mode};

/// A started planner.
///
/// In-process mode opens the store, hosts the transport and connects a
/// client to it; remote mode only holds the client. [`App::shutdown`] tears
/// the parts down in reverse order, so the store is closed only after the
/// transport has stopped.
pub struct App {
    client: PlannerClient,
    server: Option<RpcServer>,
    planner: Option<Planner>,
}

impl App {
    pub async fn start(config: &Config) -> Result<Self> {
        let mut app = match &config.mode {
            Mode::Remote { address } => {
                debug!("Using remote planner at {address}");
                let client = PlannerClient::new(address)
                    .with_context(|| format!("Failed to create client for {address}"))?;
                Self {
                    client,
                    server: None,
                    planner: None,
                }
            }
            Mode::InProcess => {
                let planner = PlannerBuilder::new()
                    .with_config(config.database.clone().into())
                    .build()
                    .await
                    .context("Failed to initialize planner")?;

                let mut server = RpcServer::new(planner.clone());
                let address = match server.start(&config.server.address()).await {
                    Ok(address) => address,
                    Err(e) => {
                        planner.close().await.ok();
                        return Err(e).context("Failed to start planner server");
                    }
                };
                debug!("In-process planner listening on {address}");

                let client = PlannerClient::new(address.to_string())
                    .context("Failed to create planner client")?;
                Self {
                    client,
                    server: Some(server),
                    planner: Some(planner),
                }
            }
        };

        if let Some(timeout) = config.timeout {
            app.client = app.client.clone().with_timeout(timeout);
        }
        Ok(app)
    }

    pub fn client(&self) -> &PlannerClient {
        &self.client
    }

    /// Address of the hosted transport, if this process hosts one.
    pub fn address(&self) -> Option<SocketAddr> {
        self.server.as_ref().and_then(RpcServer::address)
    }

    pub async fn shutdown(self) -> Result<()> {
        let Self {
            client,
            server,
            planner,
        } = self;
        drop(client);

        if let Some(mut server) = server {
            server.stop().await.context("Failed to stop planner server")?;
        }
        if let Some(planner) = planner {
            planner.close().await.context("Failed to close store")?;
        }
        info!("Planner shut down");
        Ok(())
    }
}

/// Waits for SIGINT or SIGTERM.
pub async fn shutdown_signal() -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully..."),
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully..."),
    }
    Ok(())
}
