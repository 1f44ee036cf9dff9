//! chainbot - host-side tooling for the chain agent.
//!
//! - `chainbot replay` - feed a recorded tick stream through one agent
//! - `chainbot analyze` - chain summary for a single grid snapshot

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use chain_agent::{AgentConfig, ChainAgent, TickInput};
use chain_core::{analyze, annotate, lookup_player, Grid, Pace, PaceTable, TeamId};

#[derive(Parser)]
#[command(name = "chainbot")]
#[command(about = "Replay and inspect the chain agent", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines tick stream and print one output per tick
    Replay {
        /// File with one tick input per line
        ticks: PathBuf,

        /// Agent config (YAML). Defaults apply when the file is missing.
        #[arg(long, default_value = "agent.yaml")]
        config: PathBuf,

        /// Control the roster entry for this team instead of the recorded player
        #[arg(long)]
        team: Option<u32>,

        /// Print the trace log after the outputs
        #[arg(long)]
        trace: bool,

        /// Initial operator verbosity (see `debug N` messages)
        #[arg(long, default_value_t = 0)]
        level: u8,
    },

    /// Summarize the chains in one grid snapshot
    Analyze {
        /// Grid JSON (array of rows of cells)
        snapshot: PathBuf,

        /// Team to analyze for
        #[arg(long, default_value_t = 1)]
        team: u32,

        /// Emit the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay {
            ticks,
            config,
            team,
            trace,
            level,
        } => replay(&ticks, &config, team.map(TeamId), trace, level),
        Commands::Analyze {
            snapshot,
            team,
            json,
        } => analyze_snapshot(&snapshot, TeamId(team), json),
    }
}

fn replay(
    ticks: &Path,
    config_path: &Path,
    team: Option<TeamId>,
    trace: bool,
    level: u8,
) -> Result<()> {
    let config = AgentConfig::load_or_default(config_path)?;
    tracing::info!(ticks = %ticks.display(), seed = config.seed, "Starting replay");

    let mut agent = ChainAgent::new(config).with_verbosity(level);
    if trace {
        agent = agent.with_trace_log();
    }

    let file = File::open(ticks).with_context(|| format!("opening {}", ticks.display()))?;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0usize;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut input: TickInput = serde_json::from_str(&line)
            .with_context(|| format!("parsing tick on line {}", index + 1))?;
        if let Some(team) = team {
            if let Some(player) = lookup_player(&input.players, team) {
                input.player = player.clone();
            }
        }
        let output = agent.tick(&input);
        serde_json::to_writer(&mut out, &output)?;
        writeln!(out)?;
        count += 1;
    }

    if let Some(log) = agent.take_trace() {
        for event in &log.events {
            writeln!(out, "{event}")?;
        }
    }
    out.flush()?;

    let session = agent.session();
    tracing::info!(
        ticks = count,
        banks = session.bank_count,
        pace = ?session.pace,
        "Replay finished"
    );
    Ok(())
}

#[derive(Serialize)]
struct ChainRow {
    id: u32,
    kind: u8,
    len: usize,
    unclaimed: usize,
    mine: usize,
    other: usize,
    max_occupants: usize,
}

fn analyze_snapshot(path: &Path, team: TeamId, json: bool) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let grid: Grid = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing grid snapshot {}", path.display()))?;

    let mut work = analyze(&grid, team);
    annotate(&mut work, PaceTable::default().config(Pace::Long));

    let rows: Vec<ChainRow> = work
        .chains()
        .iter()
        .map(|chain| ChainRow {
            id: chain.id.0,
            kind: chain.kind,
            len: chain.len(),
            unclaimed: chain.unclaimed,
            mine: chain.owned_by_me,
            other: chain.owned_by_other,
            max_occupants: chain.max_occupants,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Chains for {team} ({}x{})", grid.rows(), grid.cols());
    println!("=========================");
    println!(
        "{:>4} {:>4} {:>4} {:>9} {:>5} {:>5} {:>4}",
        "id", "kind", "len", "unclaimed", "mine", "other", "occ"
    );
    for row in &rows {
        println!(
            "{:>4} {:>4} {:>4} {:>9} {:>5} {:>5} {:>4}",
            row.id, row.kind, row.len, row.unclaimed, row.mine, row.other, row.max_occupants
        );
    }
    println!();
    print!("{}", work.render());
    Ok(())
}
