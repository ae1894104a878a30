use std::{
    env, fs,
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use anyhow::{Context, Result, bail};
use baseline_telemetry::{
    baseline::RECORD_SIZE,
    ingest::{IngestConfig, SampleIngestor, SharedIngestor},
    link::{LinkInjector, LoopbackLink},
    utils::capacity::Capacity,
};
use clap::Parser;
use itertools::join;
use log::{info, warn};

/// Replays a capture of raw baseline records through the ingestion core.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File of back to back baseline records
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Views buffered for the table logger before the oldest are dropped
    #[arg(short, long, default_value_t = 64)]
    subscriber_capacity: usize,

    /// Send the init ambiguities command before replaying
    #[arg(long, default_value_t = false)]
    init_ambiguities: bool,
}

fn load_config(params: Option<&Path>) -> Result<IngestConfig> {
    let Some(path) = params else {
        info!("No parameter file given, using defaults");
        return Ok(IngestConfig::default());
    };

    info!("Reading parameters from '{}'", path.display());

    let params_toml = fs::read_to_string(path)?;
    Ok(IngestConfig::from_toml(&params_toml)?)
}

fn replay(capture: Vec<u8>, msg_id: u16, injector: LinkInjector) -> Result<usize> {
    let mut count = 0;

    for record in capture.chunks(RECORD_SIZE) {
        injector.inject(msg_id, record.to_vec())?;
        count += 1;
    }

    Ok(count)
}

fn main() -> Result<()> {
    // Default log level to "info"
    if env::var("RUST_LOG").is_err() {
        unsafe { env::set_var("RUST_LOG", "info") }
    }

    pretty_env_logger::init();

    let args = Args::parse();
    let config = load_config(args.params.as_deref())?;

    info!(
        "History: {} samples ({}), time of week in {}",
        config.capacity.get(),
        config.truncation,
        config.tow_unit
    );

    let capture = fs::read(&args.input)
        .with_context(|| format!("Could not read capture '{}'", args.input.display()))?;
    if capture.is_empty() {
        bail!("Capture '{}' is empty", args.input.display());
    }
    if capture.len() % RECORD_SIZE != 0 {
        warn!(
            "Capture size {} is not a multiple of {RECORD_SIZE}, the last record will be rejected",
            capture.len()
        );
    }

    let ingestor = SharedIngestor::new(SampleIngestor::new(&config));
    let subscriber = ingestor.subscribe(Capacity::new(args.subscriber_capacity)?)?;

    let (mut link, injector) = LoopbackLink::new();
    ingestor.attach(&mut link, config.baseline_msg_id);

    if args.init_ambiguities {
        ingestor.init_ambiguities(&link)?;
    }

    let table_logger = thread::spawn(move || {
        let mut shown = 0usize;
        while let Ok(view) = subscriber.recv() {
            info!("{}", join(view.table(), " | "));
            shown += 1;
        }
        shown
    });

    let msg_id = config.baseline_msg_id;
    let producer = thread::spawn(move || replay(capture, msg_id, injector));

    let start_time = Instant::now();
    let dispatched = link.run();
    let duration = (Instant::now() - start_time).as_secs_f64();

    let injected = producer
        .join()
        .map_err(|_| anyhow::anyhow!("Replay thread panicked"))??;

    let (series, processed) = ingestor.with(|i| (i.series(), i.processed()))?;

    // Dropping the link releases the last ingestor handles and closes the
    // subscriber channel.
    drop(link);
    drop(ingestor);

    let shown = table_logger
        .join()
        .map_err(|_| anyhow::anyhow!("Table logger thread panicked"))?;

    info!(
        "Replayed {injected} records ({dispatched} dispatched, {processed} accepted, {shown} logged) in {duration:.6} s"
    );
    info!("History holds {} samples", series.n.len());

    Ok(())
}
