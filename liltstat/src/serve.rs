//! The serve subcommand: run the collector server.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::Args;
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use liltstat_collector_core::{BatchFlusher, InsertQueue, SiteResolver, run_background_flusher};
use liltstat_collector_http::{HttpCollector, IngestMode};
use liltstat_warehouse_core::{InMemoryWarehouse, Warehouse};

use crate::error::{InvalidServerAddressSnafu, IoSnafu, Result};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// The address the HTTP collector listens on.
    #[arg(long, default_value = "0.0.0.0:3000")]
    address: String,
    /// Port override, taking precedence over the address port.
    #[arg(long, env = "PORT")]
    port: Option<u16>,
    /// The flush period for queued beacons, in milliseconds.
    #[arg(long, default_value_t = 5500)]
    flush_interval_ms: u64,
    /// Log accepted beacons instead of queueing them for insertion.
    #[arg(long)]
    dry_run: bool,
}

impl ServeArgs {
    pub async fn run(self, ct: CancellationToken) -> Result<()> {
        let mut address = self
            .address
            .parse::<SocketAddr>()
            .context(InvalidServerAddressSnafu {})?;
        if let Some(port) = self.port {
            address.set_port(port);
        }

        let resolver = Arc::new(SiteResolver::new());
        let warehouse = new_dev_warehouse(&resolver).await;

        let queue = Arc::new(InsertQueue::new());
        let flusher = BatchFlusher::new(queue.clone(), warehouse)
            .with_interval(Duration::from_millis(self.flush_interval_ms));

        let mode = if self.dry_run {
            IngestMode::DryRun
        } else {
            IngestMode::Queue
        };

        info!(
            %address,
            flush_interval_ms = self.flush_interval_ms,
            dry_run = self.dry_run,
            "starting liltstat collector",
        );

        let server_fut = run_http_server(resolver, queue, mode, address, ct.clone());
        let flusher_fut = run_background_flusher(flusher, ct);

        tokio::select! {
            res = server_fut => res,
            _ = flusher_fut => Ok(()),
        }
    }
}

/// The serve command wires the in-memory warehouse with every dataset
/// the resolver can target. Production deployments implement
/// [`Warehouse`] against the real store instead.
async fn new_dev_warehouse(resolver: &SiteResolver) -> Arc<dyn Warehouse> {
    let warehouse = InMemoryWarehouse::new();
    for dataset in resolver.datasets() {
        warehouse.create_dataset(dataset.clone()).await;
    }
    Arc::new(warehouse)
}

async fn run_http_server(
    resolver: Arc<SiteResolver>,
    queue: Arc<InsertQueue>,
    mode: IngestMode,
    address: SocketAddr,
    ct: CancellationToken,
) -> Result<()> {
    let collector = HttpCollector::new(resolver, queue, mode);
    let app = collector.into_router();

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .context(IoSnafu {})?;

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        ct.cancelled().await;
    });

    server.await.context(IoSnafu {})
}
