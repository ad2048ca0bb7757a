//! F1 2020 telemetry ingestion service
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::UdpSocket;
use tokio::time::interval;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use f1_telemetry_ingest::config::{Config, LogFormat, SinkKind};
use f1_telemetry_ingest::{
    receive_datagrams, stats, IngestionPipeline, JsonLinesSink, LogSink, Metrics, SharedMetrics,
    Shutdown, ShutdownSignal, Sink,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config);
    config.validate().context("invalid configuration")?;

    let sink = build_sink(&config).await?;

    let socket = UdpSocket::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind UDP socket on {}", config.bind))?;
    info!(addr = %socket.local_addr()?, "waiting for telemetry stream");

    let metrics = Metrics::new().with_latency_budget(config.latency_budget()).into_shared();
    let shutdown = Shutdown::new();
    let pipeline = IngestionPipeline::start(
        config.pipeline_config(),
        sink,
        Arc::clone(&metrics),
        shutdown.signal(),
    );

    let stats_server = match config.stats_addr {
        Some(addr) => {
            let listener = stats::bind(addr)
                .await
                .with_context(|| format!("failed to bind stats endpoint on {addr}"))?;
            Some(tokio::spawn(stats::serve(
                listener,
                Arc::clone(&metrics),
                shutdown.signal(),
            )))
        }
        None => None,
    };

    let reporter = config
        .metrics_interval()
        .map(|every| tokio::spawn(report_metrics(Arc::clone(&metrics), every, shutdown.signal())));

    let mut receiver = tokio::spawn(receive_datagrams(
        socket,
        pipeline.sender(),
        Arc::clone(&metrics),
        shutdown.signal(),
        config.recv_buffer,
        config.idle_timeout(),
    ));

    let receiver_exit = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                error!(error = %err, "failed to listen for ctrl-c");
            }
            info!("received ctrl-c, shutting down");
            None
        }
        exit = &mut receiver => Some(exit),
    };

    shutdown.trigger();
    let exit = match receiver_exit {
        Some(exit) => exit,
        None => receiver.await,
    };
    match exit {
        Ok(reason) => info!(?reason, "receiver stopped"),
        Err(err) => error!(error = %err, "receiver task failed"),
    }

    pipeline.close().await;

    if let Some(reporter) = reporter {
        let _ = reporter.await;
    }
    if let Some(server) = stats_server {
        match server.await {
            Ok(Err(err)) => error!(error = %err, "stats endpoint failed"),
            Err(err) => error!(error = %err, "stats task failed"),
            Ok(Ok(())) => {}
        }
    }

    info!("final statistics");
    metrics.read().await.log_summary();
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));

    let layer = match config.log_format {
        LogFormat::Text => fmt::layer().with_target(false).boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer).init();
}

async fn build_sink(config: &Config) -> anyhow::Result<Arc<dyn Sink>> {
    Ok(match config.sink {
        SinkKind::Log => Arc::new(LogSink),
        SinkKind::Jsonl => {
            let sink = JsonLinesSink::open(&config.output)
                .await
                .with_context(|| format!("failed to open {}", config.output.display()))?;
            info!(path = %sink.path().display(), "writing records as json lines");
            Arc::new(sink)
        }
    })
}

async fn report_metrics(metrics: SharedMetrics, every: Duration, mut shutdown: ShutdownSignal) {
    let mut ticker = interval(every);
    // first tick completes immediately
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = shutdown.triggered() => break,
            _ = ticker.tick() => {
                let metrics = metrics.read().await;
                if metrics.datagrams_received > 0 {
                    metrics.log_summary();
                }
            }
        }
    }
}
