//! Terminal client for the contract-analysis service: submits a PDF or
//! photographed pages and follows the job, rendering progressive results.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use client_logging::{client_info, client_warn};

use analyzer_app::{export, render, validate};
use analyzer_client::{
    ChannelSessionSink, JobSession, PollSettings, RetryPolicy, SessionOutcome, SessionSettings,
    TransportKind,
};
use analyzer_core::SessionEvent;

#[derive(Debug, Parser)]
#[command(
    name = "analyzer",
    about = "Phân tích hợp đồng bảo hiểm từ file PDF hoặc ảnh chụp"
)]
struct Cli {
    /// One PDF file, or one-or-more image files (JPEG/PNG).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Base URL of the analysis service.
    #[arg(long, default_value = "http://localhost:8000")]
    server: String,

    /// Follow the job by polling instead of the push stream.
    #[arg(long)]
    poll: bool,

    /// Seconds between status fetches when --poll is set.
    #[arg(long, default_value_t = 2)]
    poll_interval: u64,

    /// Reconnect attempts before giving up on the connection.
    #[arg(long, default_value_t = 5)]
    retries: u32,

    /// Write the finished analysis to this HTML file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    client_logging::initialize(cli.verbose);

    let payload = validate::build_payload(&cli.inputs)?;

    let mut settings = SessionSettings::new(cli.server.clone());
    settings.transport = if cli.poll {
        TransportKind::Poll
    } else {
        TransportKind::Stream
    };
    settings.retry = RetryPolicy {
        max_retries: cli.retries,
        ..RetryPolicy::default()
    };
    settings.poll = PollSettings {
        interval: Duration::from_secs(cli.poll_interval.max(1)),
        ..PollSettings::default()
    };

    let session = JobSession::new(settings);
    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            client_warn!("interrupted, cancelling analysis");
            cancel.cancel();
        }
    });

    let (sink, mut events) = ChannelSessionSink::channel();
    let running = tokio::spawn(session.run(payload, sink));

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Progress { percent, phase } => {
                eprintln!("[{percent:>3}%] {}", render::phase_label(phase));
            }
            SessionEvent::Retrying {
                attempt,
                max_retries,
            } => {
                eprintln!("Đang kết nối lại... ({attempt}/{max_retries})");
            }
            SessionEvent::PartialUpdate {
                sections,
                first_content,
            } => {
                if first_content {
                    eprintln!("--- kết quả từng phần ---");
                }
                let available: Vec<_> = sections
                    .filled()
                    .map(|(key, _)| render::section_label(key))
                    .collect();
                eprintln!("Đã có: {}", available.join(", "));
            }
            // Terminal events are handled through the outcome below.
            SessionEvent::Completed { .. } | SessionEvent::Failed { .. } => {}
        }
    }

    let outcome = running.await.context("session task panicked")?;
    match outcome {
        SessionOutcome::Completed(result) => {
            render::print_results(&result);
            if let Some(path) = cli.output {
                let written = export::write_html(&path, &result)?;
                client_info!("analysis written to {}", written.display());
            }
            Ok(())
        }
        SessionOutcome::Failed { message } => bail!(message),
        SessionOutcome::Cancelled => {
            eprintln!("Đã hủy phân tích.");
            Ok(())
        }
    }
}
