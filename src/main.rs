use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use chrono::Utc;

use qr_dispatch::config::ScanConfig;
use qr_dispatch::error::Result;
use qr_dispatch::pipeline::{DedupSession, ScanProcessor, ScanResult};

const USAGE: &str = "usage:
  qr-dispatch scan <payload>...   classify one image's decoded payloads
  qr-dispatch live                read frames from stdin, one JSON array of payloads per line";

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let live = match args.next().as_deref() {
        Some("scan") => false,
        Some("live") => true,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(live, args.collect()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(live: bool, payloads: Vec<String>) -> Result<()> {
    let config = ScanConfig::from_env()?;
    let processor = ScanProcessor::from_config(&config);

    eprintln!("📷 qr-dispatch v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Classifier: {}", processor.classifier_name());

    if live {
        live_scan(&processor).await
    } else {
        image_scan(&processor, payloads)
    }
}

/// One image: every payload is dispatched, no session.
fn image_scan(processor: &ScanProcessor, payloads: Vec<String>) -> Result<()> {
    let results = processor.process_batch(payloads, None);
    if results.is_empty() {
        eprintln!("No QR Code Found");
    }
    emit(&results)
}

/// Live frames from stdin until EOF or a `q` line.
async fn live_scan(processor: &ScanProcessor) -> Result<()> {
    eprintln!("   Reading frames from stdin. Type q to stop.\n");

    let mut session = DedupSession::new();
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let mut frames = 0u64;

    while let Some(line) = lines.next().await {
        let line = line?;
        let line = line.trim();
        if line == "q" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let payloads: Vec<String> = match serde_json::from_str(line) {
            Ok(payloads) => payloads,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed frame");
                continue;
            }
        };

        frames += 1;
        let results = processor.process_batch(payloads, Some(&mut session));
        emit(&results)?;
    }

    tracing::info!(
        session = %session.id(),
        frames,
        dispatched_urls = session.len(),
        duration_secs = (Utc::now() - session.started_at()).num_seconds(),
        "Live scan session ended"
    );
    Ok(())
}

/// Print one JSON line per result on stdout, overlay labels on stderr.
fn emit(results: &[ScanResult]) -> Result<()> {
    for result in results {
        eprintln!("{}", result.label());
        println!("{}", serde_json::to_string(result)?);
    }
    Ok(())
}
