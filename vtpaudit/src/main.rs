//! vtpaudit command-line entry point.
//!
//! # Usage
//!
//! ```bash
//! vtpaudit --inventory inventory.toml --filter site=SiteXYZ --jobs 32
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use vtpaudit::{
    AuditConfig, FleetDispatcher, HostFilter, Inventory, SshConfig, SshTransport, VendorFamily,
};

#[derive(Parser, Debug)]
#[command(name = "vtpaudit", version, about = "Audit the VTP mode of Cisco NX-OS and IOS devices")]
struct Cli {
    #[arg(short, long, help = "Config file (default: ./vtpaudit.toml if present)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Inventory file")]
    inventory: Option<PathBuf>,

    #[arg(short, long, help = "Maximum concurrent devices per vendor family")]
    jobs: Option<usize>,

    #[arg(long, help = "NX-OS report path")]
    nxos_report: Option<PathBuf>,

    #[arg(long, help = "IOS report path")]
    ios_report: Option<PathBuf>,

    #[arg(
        long = "filter",
        value_name = "KEY=VALUE",
        help = "Only audit hosts whose data matches (repeatable)"
    )]
    filters: Vec<HostFilter>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = AuditConfig::discover(cli.config.as_deref())?;
    if let Some(inventory) = cli.inventory {
        config.inventory = inventory;
    }
    if let Some(jobs) = cli.jobs {
        config.max_concurrency = jobs;
    }
    if let Some(path) = cli.nxos_report {
        config.reports.set(VendorFamily::CiscoNxos, path);
    }
    if let Some(path) = cli.ios_report {
        config.reports.set(VendorFamily::CiscoIos, path);
    }

    let mut inventory = Inventory::load(&config.inventory)?;
    if !cli.filters.is_empty() {
        inventory.retain_matching(&cli.filters);
    }
    info!(
        "Loaded {} devices from {}",
        inventory.len(),
        config.inventory.display()
    );

    let reports = config.report_set();
    let dispatcher = FleetDispatcher::new(SshTransport::new(SshConfig::from(&config.ssh)))
        .with_max_concurrency(config.max_concurrency);

    let run = dispatcher.run(&inventory, &reports, |record| {
        println!("{}", record);
        println!("{}", "#".repeat(60));
    });

    let summary = tokio::select! {
        summary = run => summary,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, abandoning in-flight devices");
            return Ok(());
        }
    };

    for (family, group) in &summary.groups {
        println!(
            "{}: {} devices, {} unknown -> {}",
            family,
            group.devices,
            group.unknown,
            config.reports.path_for(*family).display()
        );
        if group.write_failures > 0 {
            println!("{}: {} rows could not be written", family, group.write_failures);
        }
    }
    if summary.skipped > 0 {
        println!("Skipped {} devices outside the audited families", summary.skipped);
    }

    Ok(())
}
