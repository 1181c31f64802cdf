#![forbid(unsafe_code)]
//! scpbench command line interface.

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use scpbench_core::{BenchConfig, Generation, Report, ReportBuilder};
use scpbench_driver::Sampler;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "scpbench", version, about = "Secure-transport cipher benchmark harness")]
struct Cli {
    /// Config file (default: ./scpbench.toml if present, else defaults + SCPBENCH_* env)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the sampling driver over every suite in the catalog
    Run {
        /// Override samples per suite
        #[arg(long)]
        samples: Option<u32>,
        /// Override the log directory
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// Aggregate the per-suite logs into a comparison report
    Report {
        /// Override the log directory to read from
        #[arg(long)]
        log_dir: Option<PathBuf>,
        /// Override the payload size used for throughput figures
        #[arg(long)]
        payload_mb: Option<f64>,
        /// Log-format generation the files were written with
        #[arg(long, value_enum, default_value = "prefixed")]
        generation: GenerationArg,
        /// Emit the parallel sequences as JSON for the chart renderer
        #[arg(long)]
        json: bool,
    },
    /// List the resolved cipher-suite catalog
    Suites,
    /// Write a config template to ./scpbench.toml
    WriteConfig {
        /// Overwrite if the file exists
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenerationArg {
    Prefixed,
    Plain,
}

impl From<GenerationArg> for Generation {
    fn from(g: GenerationArg) -> Self {
        match g {
            GenerationArg::Prefixed => Generation::Prefixed,
            GenerationArg::Plain => Generation::Plain,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<BenchConfig> {
    match path {
        Some(p) => Ok(BenchConfig::load_from_file(p)?),
        None => {
            let default = PathBuf::from("scpbench.toml");
            if default.exists() {
                Ok(BenchConfig::load_from_file(default)?)
            } else {
                Ok(BenchConfig::from_env()?)
            }
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_report_table(report: &Report) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "cipher",
        "median throughput (MB/s)",
        "mean ciphertext (MB)",
        "mean raw (MB)",
    ]);
    for i in 0..report.len() {
        table.add_row(vec![
            Cell::new(&report.labels[i]),
            Cell::new(format!("{:.2}", report.throughput_mbps[i])),
            Cell::new(format!("{:.2}", report.ciphertext_mb[i])),
            Cell::new(format!("{:.2}", report.raw_mb[i])),
        ]);
    }
    println!("{table}");

    for failure in &report.failures {
        eprintln!("skipped {} ({}): {}", failure.label, failure.kind, failure.message);
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config(cli.config.as_ref())?;
    init_tracing(&cfg.log_level);

    match cli.command {
        Command::Run { samples, log_dir } => {
            if let Some(n) = samples {
                cfg.samples = n;
            }
            if let Some(dir) = log_dir {
                cfg.log_dir = dir;
            }
            cfg.validate()?;
            let written = Sampler::new(&cfg).run().await?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::Report { log_dir, payload_mb, generation, json } => {
            if let Some(dir) = log_dir {
                cfg.log_dir = dir;
            }
            if let Some(mb) = payload_mb {
                cfg.payload_mb = mb;
            }
            cfg.validate()?;
            let schema = Generation::from(generation).schema();
            let report = ReportBuilder::new(&cfg, schema).assemble()?;
            if report.is_empty() {
                warn!("no suite produced a usable summary");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report_table(&report);
            }
        }
        Command::Suites => {
            for suite in cfg.suites.suites()? {
                println!("{} [{}]", suite.label(), suite.category());
            }
        }
        Command::WriteConfig { force } => {
            let path = PathBuf::from("scpbench.toml");
            if path.exists() && !force {
                anyhow::bail!("refusing to overwrite existing {} (use --force)", path.display());
            }
            cfg.write_to_file(&path)?;
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(())
}
