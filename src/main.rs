use anyhow::{bail, Result};
use clap::Parser;
use tracing::{error, info};

use ble_drop_monitor::args::Args;
use ble_drop_monitor::config::{load_config_with_fallback, validate};
use ble_drop_monitor::device::{assign_peers, ProvisionPlan};
use ble_drop_monitor::monitor::{spawn_port_worker, WorkerConfig};
use ble_drop_monitor::runtime::{shutdown_channel, spawn_shutdown_handler, RuntimeConfig};
use ble_drop_monitor::stats::Aggregator;
use ble_drop_monitor::{logging, reporter};

fn main() -> Result<()> {
    logging::init_dual_logging();

    let args = Args::parse();
    let runtime = RuntimeConfig::from_args(args.threads).build_runtime()?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let (config, source) = load_config_with_fallback(&args.config)?;
    info!("Loaded configuration from {}", source.description());
    validate(&config)?;
    args.validate_overrides(&config)?;

    let ports = args.effective_ports(&config).to_vec();
    if ports.is_empty() {
        bail!("no serial ports to monitor; pass --ports or set them in the config file");
    }

    let grammar = args.effective_grammar(&config);
    let baud_rate = args.effective_baud_rate(&config);
    let peers = args.effective_peers(&config).to_vec();
    let provisioning = args.provisioning_enabled(&config);
    info!(
        "Monitoring {} serial port(s) at {} baud, {} grammar",
        ports.len(),
        baud_rate,
        grammar
    );

    let aggregator = Aggregator::new();
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handler = spawn_shutdown_handler(shutdown_tx.clone());
    let reporter = reporter::spawn_reporter(
        aggregator.clone(),
        args.effective_report_interval(&config),
        shutdown_rx.clone(),
    );

    let mut peer_groups = assign_peers(&peers, ports.len()).into_iter();
    let mut workers = Vec::with_capacity(ports.len());
    for port in ports {
        let group = peer_groups.next().unwrap_or_default();
        let provision = (provisioning && !group.is_empty()).then(|| ProvisionPlan {
            peers: group,
            service_uuid: config.ble.service_uuid.clone(),
            characteristic_uuid: config.ble.characteristic_uuid.clone(),
            settle: config.ble.settle(),
        });
        let worker_config = WorkerConfig {
            grammar,
            baud_rate,
            read_timeout: config.serial.read_timeout(),
            idle_poll: config.serial.idle_poll(),
            provision,
        };
        workers.push(spawn_port_worker(
            port,
            worker_config,
            aggregator.clone(),
            shutdown_rx.clone(),
        ));
    }

    info!("Monitoring serial ports for BLE notifications...");
    for worker in workers {
        if let Err(e) = worker.await {
            error!("Port worker task failed: {}", e);
        }
    }

    // All workers gone (shutdown or dead ports); stop the reporter too.
    let _ = shutdown_tx.send(true);
    if let Err(e) = reporter.await {
        error!("Reporter task failed: {}", e);
    }
    signal_handler.abort();

    info!("Exiting monitoring.");
    Ok(())
}
