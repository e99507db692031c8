mod demo;

use clap::Parser;
use lookout::DiscoveryManager;
use lookout::FixedRecordSource;
use lookout::RecordSource;
use lookout::ServiceRecord;
use std::time::Duration;

/// How often the snapshot is polled for rendering.
const UPDATE_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut source: Box<dyn RecordSource> = if cli.offline {
        log::info!("Offline mode, serving canned records");
        Box::new(FixedRecordSource::new(demo::records()))
    } else {
        let names = (!cli.interface.is_empty()).then_some(cli.interface.as_slice());
        let domains = if cli.domain.is_empty() {
            vec!["local".to_string()]
        } else {
            cli.domain.clone()
        };
        let manager = DiscoveryManager::start(names, &domains);
        log::info!("Started {} query session(s)", manager.session_count());
        Box::new(manager)
    };

    let mut last: Option<Vec<ServiceRecord>> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(UPDATE_INTERVAL) => {
                let snapshot = source.snapshot();
                if last.as_ref() != Some(&snapshot) {
                    render(&snapshot, cli.json)?;
                    last = Some(snapshot);
                }
            }
        }
    }

    log::info!("Shutting down");
    source.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Watch services advertised on the local network")]
struct Cli {
    /// Network interface to query; repeatable, all usable interfaces when omitted
    #[arg(short, long)]
    interface: Vec<String>,

    /// Domain to browse; repeatable, defaults to `local`
    #[arg(short, long)]
    domain: Vec<String>,

    /// Serve a canned record set without touching the network
    #[arg(long)]
    offline: bool,

    /// Print snapshots as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn render(records: &[ServiceRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    println!();
    println!(
        "{:<44} {:<24} {:<16} {:>5}  {}",
        "NAME", "HOST", "IP", "PORT", "INFO"
    );
    for record in records {
        let ip = record
            .addr_v4
            .map(|address| address.to_string())
            .or_else(|| record.addr_v6.map(|address| address.to_string()))
            .unwrap_or_default();
        println!(
            "{:<44} {:<24} {:<16} {:>5}  {}",
            record.name, record.host, ip, record.port, record.info
        );
    }
    Ok(())
}
