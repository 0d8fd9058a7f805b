//! Dependency chain tracker CLI.
//!
//! This binary drives the `dvr-core` taint scoreboard from the command line. It performs:
//! 1. **Trace run:** Play a JSON instruction trace, list the chains and ledgers it produced,
//!    replay ledgers with requested seeds, and print statistics.
//! 2. **Decode:** Classify and disassemble raw RV64I instruction words.

use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dvr_core::config::Config;
use dvr_core::isa::classify::classify;
use dvr_core::isa::disasm::disassemble;
use dvr_core::sim::trace::parse_word;
use dvr_core::sim::{RunSummary, Trace, TraceRunner};

#[derive(Parser, Debug)]
#[command(
    name = "dvr",
    author,
    version,
    about = "Dependency chain tracker for indirect loads",
    long_about = "Play a renamed instruction trace through the taint scoreboard, or classify raw instruction words.\n\nExamples:\n  dvr run --trace gather.json\n  dvr run --trace gather.json --config deferred.json --seed 0x1000=100\n  dvr decode 0x00229313 0x00833383"
)]
struct Cli {
    /// Log filter (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an instruction trace through the scoreboard.
    Run {
        /// JSON trace to play.
        #[arg(short, long)]
        trace: String,

        /// JSON configuration file (defaults apply when omitted).
        #[arg(short, long)]
        config: Option<String>,

        /// Replay the ledger of BASE with VALUE after the run (BASE=VALUE, repeatable).
        #[arg(long = "seed", value_parser = parse_seed)]
        seeds: Vec<(u64, u64)>,

        /// Print the run summary as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Statistics sections to print (summary, taint, sessions, ledger); all when omitted.
        #[arg(long = "stats", value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Classify and disassemble raw instruction words.
    Decode {
        /// Instruction words, hex (0x...) or decimal.
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log);

    match cli.command {
        Commands::Run {
            trace,
            config,
            seeds,
            json,
            sections,
        } => cmd_run(&trace, config.as_deref(), &seeds, json, &sections),
        Commands::Decode { words } => cmd_decode(&words),
    }
}

/// Installs the `tracing` subscriber; `RUST_LOG` takes precedence over `--log`.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parses a `BASE=VALUE` replay request.
fn parse_seed(arg: &str) -> Result<(u64, u64), String> {
    let (base, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected BASE=VALUE, got {arg:?}"))?;
    let base = parse_word(base).ok_or_else(|| format!("bad base pc {base:?}"))?;
    let value = parse_word(value).ok_or_else(|| format!("bad seed value {value:?}"))?;
    Ok((base, value))
}

/// Plays a trace and reports chains, ledgers, replays and statistics.
///
/// Exits with code 1 if the trace or configuration cannot be loaded.
fn cmd_run(
    trace_path: &str,
    config_path: Option<&str>,
    seeds: &[(u64, u64)],
    json: bool,
    sections: &[String],
) {
    let config = match config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {path}: {e}");
            process::exit(1);
        }),
        None => Config::default(),
    };

    let trace = Trace::from_file(trace_path).unwrap_or_else(|e| {
        eprintln!("Error loading trace {trace_path}: {e}");
        process::exit(1);
    });
    info!(
        path = trace_path,
        instructions = trace.instructions.len(),
        trigger = ?config.ledger.trigger,
        "DVR: trace loaded"
    );

    let mut runner = TraceRunner::new(&config, &trace);
    let summary = runner.run(&trace);

    let replays: Vec<(u64, u64, Option<u64>)> = seeds
        .iter()
        .map(|&(base, seed)| (base, seed, runner.scoreboard_mut().recompute(base, seed)))
        .collect();

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error encoding summary: {e}");
                process::exit(1);
            }
        }
    } else {
        print_summary(&summary);
    }

    for (base, seed, result) in replays {
        match result {
            Some(value) => println!("replay {base:#x} seed={seed:#x} -> {value:#x}"),
            None => println!("replay {base:#x}: no ledger"),
        }
    }

    if !json {
        summary.stats.print_sections(sections);
    }
}

fn print_summary(summary: &RunSummary) {
    println!("[*] {} instructions played", summary.instructions);
    println!("[*] {} dependency chain(s)", summary.chains.len());
    for chain in &summary.chains {
        println!(
            "\nchain {:#x} -> {:#x} (seed {:#x})",
            chain.base_pc, chain.indirect_pc, chain.seed
        );
        for (i, pc) in chain.chain_pcs.iter().enumerate() {
            println!("  {:>2}. {pc:#x}", i + 1);
        }
        if let Some(ledger) = summary.ledgers.iter().find(|l| l.base_pc == chain.base_pc) {
            println!("  ledger:");
            for step in &ledger.steps {
                println!("    {step}");
            }
        }
    }
}

/// Prints the category and disassembly of each word.
///
/// Exits with code 1 if a word cannot be parsed.
fn cmd_decode(words: &[String]) {
    for text in words {
        let Some(word) = parse_word(text).and_then(|w| u32::try_from(w).ok()) else {
            eprintln!("Error: {text:?} is not a 32-bit instruction word");
            process::exit(1);
        };
        let classified = classify(word);
        println!(
            "{word:#010x}  {:<24} [{}]",
            disassemble(word),
            classified.class
        );
    }
}
