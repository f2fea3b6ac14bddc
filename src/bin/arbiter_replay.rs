use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use hdrhistogram::Histogram;
use log::info;

use line_arbiter::{
    ArbiterConfig, ArbiterEvent, EventCounts, EventPolicy, LoggingPolicy, SequenceArbiter,
};

#[derive(Parser, Debug)]
#[command(name = "arbiter-replay")]
#[command(about = "Replay line,sequence reports through a sequence arbiter")]
struct Args {
    /// Input CSV of `line,sequence` records (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON arbiter config; the flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of redundant lines
    #[arg(long)]
    lines: Option<usize>,

    /// History depth in slots
    #[arg(long)]
    depth: Option<usize>,

    /// First expected sequence number
    #[arg(long)]
    first: Option<u64>,

    /// Largest recoverable forward gap
    #[arg(long)]
    max_gap: Option<u64>,

    /// Print every arbiter event as a JSON line on stderr
    #[arg(long)]
    events: bool,

    /// Report a per-call latency histogram
    #[arg(long)]
    latency: bool,
}

impl Args {
    fn arbiter_config(&self) -> Result<ArbiterConfig> {
        let mut config = match &self.config {
            Some(path) => ArbiterConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ArbiterConfig::default(),
        };
        if let Some(lines) = self.lines {
            config.number_of_lines = lines;
        }
        if let Some(depth) = self.depth {
            config.history_depth = depth;
        }
        if let Some(first) = self.first {
            config.first_expected_sequence = first;
        }
        if let Some(max_gap) = self.max_gap {
            config.largest_recoverable_gap = max_gap;
        }
        config.validate().context("invalid arbiter config")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.arbiter_config()?;
    info!(
        "arbiter: {} lines, depth {}, first {}, max gap {}",
        config.number_of_lines,
        config.history_depth,
        config.first_expected_sequence,
        config.largest_recoverable_gap
    );
    let lines = config.number_of_lines;

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("opening input {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(input);
    let mut writer = WriterBuilder::new().from_writer(io::stdout().lock());

    let emit = args.events;
    let sink = EventPolicy::new(move |event: ArbiterEvent<u64>| {
        if !emit {
            return;
        }
        match serde_json::to_string(&event) {
            Ok(line) => eprintln!("{line}"),
            Err(err) => log::warn!("failed to encode event {event:?}: {err}"),
        }
    });
    let mut arbiter = SequenceArbiter::<u64, _>::new(
        config,
        (EventCounts::default(), (LoggingPolicy, sink)),
    )?;

    let mut histogram = if args.latency {
        Some(Histogram::<u64>::new(3)?)
    } else {
        None
    };
    let clock = quanta::Clock::new();
    let started = clock.now();

    let mut accepted = 0u64;
    let mut discarded = 0u64;
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading record {}", row + 1))?;
        let Some((line, sequence)) = parse_report(&record, row)? else {
            continue;
        };
        if line >= lines {
            bail!("record {}: line {line} out of range for {lines} lines", row + 1);
        }

        let before = clock.now();
        let pass = arbiter.validate(line, sequence);
        if let Some(histogram) = histogram.as_mut() {
            let nanos = clock.now().duration_since(before).as_nanos() as u64;
            let _ = histogram.record(nanos);
        }

        if pass {
            accepted += 1;
            writer.write_record(&[line.to_string(), sequence.to_string()])?;
        } else {
            discarded += 1;
        }
    }
    writer.flush()?;
    io::stderr().flush()?;

    let elapsed = clock.now().duration_since(started);
    let (counts, _) = arbiter.into_policy();
    info!(
        "replayed {} records in {:?}: {accepted} accepted, {discarded} discarded",
        accepted + discarded,
        elapsed
    );
    info!("events: {}", serde_json::to_string(&counts)?);
    if let Some(histogram) = histogram {
        info!(
            "validate latency ns: p50={} p99={} p999={} max={}",
            histogram.value_at_quantile(0.5),
            histogram.value_at_quantile(0.99),
            histogram.value_at_quantile(0.999),
            histogram.max()
        );
    }
    Ok(())
}

/// `None` for a leading `line,sequence` header row.
fn parse_report(record: &StringRecord, row: usize) -> Result<Option<(usize, u64)>> {
    if record.len() < 2 {
        bail!("record {}: expected line,sequence", row + 1);
    }
    if row == 0 && record[0].eq_ignore_ascii_case("line") {
        return Ok(None);
    }
    let line = record[0]
        .parse::<usize>()
        .map_err(|err| anyhow!("record {}: bad line {:?}: {err}", row + 1, &record[0]))?;
    let sequence = record[1]
        .parse::<u64>()
        .map_err(|err| anyhow!("record {}: bad sequence {:?}: {err}", row + 1, &record[1]))?;
    Ok(Some((line, sequence)))
}
