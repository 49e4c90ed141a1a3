use anyhow::Context;
use colored::Colorize;
use drift_analyze::StrategyReport;
use drift_chunk::{FixedChunker, GearChunker};
use drift_ingest::{IngestConfig, Ingestor};
use drift_manifest::DirRegistry;
use drift_store::FsBlockStore;
use drift_types::BlockId;

use crate::cli::{Cli, Command, CompareArgs, IngestArgs, RestoreArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = FsBlockStore::new(&cli.store)
        .with_context(|| format!("opening block store at {}", cli.store.display()))?;
    match cli.command {
        Command::Ingest(args) => ingest(&store, args),
        Command::Compare(args) => compare(&store, args),
        Command::Restore(args) => restore(&store, args),
    }
}

fn ingest(store: &FsBlockStore, args: IngestArgs) -> anyhow::Result<()> {
    let registry = DirRegistry::new(&args.registry);
    let config = IngestConfig {
        fixed: FixedChunker::new(args.fixed_len)?,
        gear: GearChunker::new(args.min_len, args.avg_len, args.max_len)?,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(Ingestor::new(store, &registry, config).ingest(&args.package))?;

    println!("{} {}", "fixed".bold(), outcome.fixed_manifest);
    println!("{}  {}", "gear".bold(), outcome.gear_manifest);
    if !outcome.failed_versions.is_empty() {
        println!(
            "{} {}",
            "abandoned versions:".yellow(),
            outcome.failed_versions.join(", ")
        );
    }
    Ok(())
}

fn compare(store: &FsBlockStore, args: CompareArgs) -> anyhow::Result<()> {
    let fixed: BlockId = args.fixed.parse().context("parsing fixed manifest id")?;
    let gear: BlockId = args.gear.parse().context("parsing gear manifest id")?;

    let comparison = drift_analyze::compare(store, &fixed, &gear)?;
    print_report(&comparison.fixed);
    println!();
    print_report(&comparison.gear);
    Ok(())
}

fn print_report(report: &StrategyReport) {
    println!(
        "{} ({})",
        report.strategy.to_string().bold().cyan(),
        report.manifest
    );
    for delta in &report.deltas {
        println!(
            "  {} has {} new blocks of {} bytes instead of {}",
            delta.version,
            delta.new_blocks,
            delta.new_bytes,
            delta.stream_size
        );
    }
    println!(
        "  total: {} blocks, {} bytes",
        report.total_blocks, report.total_bytes
    );
    println!(
        "  per transition: {:.1} new blocks, {:.1} new bytes",
        report.mean_new_blocks, report.mean_new_bytes
    );
}

fn restore(store: &FsBlockStore, args: RestoreArgs) -> anyhow::Result<()> {
    let root: BlockId = args.root.parse().context("parsing root id")?;
    let bytes = drift_dag::restore(store, &root)?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("{} {} bytes", "restored".bold(), bytes.len());
    Ok(())
}
