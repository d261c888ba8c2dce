use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use itertools::Itertools;

use crate::action::Action;
use crate::cards::{parse_board, parse_hole};
use crate::classify::{has_flush_draw, postflop_tier};
use crate::config::TrainerConfig;
use crate::display::{board_display, print_error, print_success, strategy_bar, strategy_table, styled_decision};
use crate::error::CfrResult;
use crate::infoset::Street;
use crate::persistence;
use crate::policy::{DecisionRequest, Policy};
use crate::table::NodeTable;
use crate::trainer::{RegretBaseline, Trainer};

#[derive(Parser)]
#[command(name = "cfrplus", version, about = "CFR+ self-play trainer and policy for abstracted heads-up poker.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Baseline {
    /// Compare each action with the sampled action
    Chosen,
    /// Compare each action with the strategy's expected value
    Expected,
}

impl From<Baseline> for RegretBaseline {
    fn from(b: Baseline) -> Self {
        match b {
            Baseline::Chosen => RegretBaseline::ChosenAction,
            Baseline::Expected => RegretBaseline::StrategyValue,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StreetArg {
    Preflop,
    Flop,
    Turn,
    River,
}

impl From<StreetArg> for Street {
    fn from(s: StreetArg) -> Self {
        match s {
            StreetArg::Preflop => Street::Preflop,
            StreetArg::Flop => Street::Flop,
            StreetArg::Turn => Street::Turn,
            StreetArg::River => Street::River,
        }
    }
}

/// Opponent's action earlier on the street, as seen by seat 1.
#[derive(Clone, Copy, ValueEnum)]
enum LastAction {
    Check,
    Rmin,
    R2x,
    R3x,
}

impl From<LastAction> for Action {
    fn from(a: LastAction) -> Self {
        match a {
            LastAction::Check => Action::Call,
            LastAction::Rmin => Action::RaiseMin,
            LastAction::R2x => Action::Raise2x,
            LastAction::R3x => Action::Raise3x,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run self-play training and save the strategy table
    Train {
        /// Number of simulated hands
        #[arg(short = 'n', long = "iters")]
        iterations: Option<u64>,
        /// Output table path
        #[arg(short, long, default_value = "cfrplus_strategy.json")]
        out: PathBuf,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Big blind (minimum raise unit)
        #[arg(long = "bb")]
        big_blind: Option<u32>,
        /// Worker threads
        #[arg(short = 't', long)]
        threads: Option<usize>,
        /// Regret baseline
        #[arg(long)]
        baseline: Option<Baseline>,
        /// JSON config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Continue from an existing table at the output path
        #[arg(long)]
        resume: bool,
    },
    /// Decide an action for a live spot
    Decide {
        /// Trained table
        #[arg(long, default_value = "cfrplus_strategy.json")]
        table: PathBuf,
        /// Hole cards (e.g., AhKh)
        hole: String,
        /// Board cards (e.g., AsKd7c)
        #[arg(short, long, default_value = "")]
        board: String,
        /// Current pot
        #[arg(long, default_value = "30")]
        pot: u32,
        /// Amount to call
        #[arg(long, default_value = "0")]
        to_call: u32,
        /// Minimum raise
        #[arg(long, default_value = "20")]
        min_raise: u32,
        /// Seat (0 acts first)
        #[arg(long, default_value = "0")]
        position: u8,
        /// Opponent's action this street; inferred from --to-call when omitted
        #[arg(long)]
        last_action: Option<LastAction>,
    },
    /// Show the most-visited infosets of a trained table
    Inspect {
        /// Trained table
        #[arg(long, default_value = "cfrplus_strategy.json")]
        table: PathBuf,
        /// Only this street
        #[arg(long)]
        street: Option<StreetArg>,
        /// Number of rows
        #[arg(long, default_value = "20")]
        top: usize,
    },
}

pub fn run() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            iterations,
            out,
            seed,
            big_blind,
            threads,
            baseline,
            config,
            resume,
        } => {
            let overrides = TrainOverrides {
                iterations,
                seed,
                big_blind,
                threads,
                baseline: baseline.map(RegretBaseline::from),
            };
            cmd_train(config, overrides, out, resume)
        }
        Commands::Decide {
            table,
            hole,
            board,
            pot,
            to_call,
            min_raise,
            position,
            last_action,
        } => {
            let request = DecisionRequest {
                board_len: 0,
                pot,
                to_call,
                min_raise,
                position,
                last_opponent_action: last_action.map(Action::from),
            };
            cmd_decide(table, &hole, &board, request)
        }
        Commands::Inspect { table, street, top } => {
            cmd_inspect(table, street.map(Street::from), top);
            Ok(())
        }
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

struct TrainOverrides {
    iterations: Option<u64>,
    seed: Option<u64>,
    big_blind: Option<u32>,
    threads: Option<usize>,
    baseline: Option<RegretBaseline>,
}

fn build_config(file: Option<PathBuf>, o: TrainOverrides) -> CfrResult<TrainerConfig> {
    let mut config = match file {
        Some(path) => TrainerConfig::from_json_file(&path)?,
        None => TrainerConfig::default(),
    };
    if let Some(v) = o.iterations {
        config.iterations = v;
    }
    if let Some(v) = o.seed {
        config.seed = v;
    }
    if let Some(v) = o.big_blind {
        config.big_blind = v;
    }
    if let Some(v) = o.threads {
        config.threads = v;
    }
    if let Some(v) = o.baseline {
        config.baseline = v;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_train(config: Option<PathBuf>, overrides: TrainOverrides, out: PathBuf, resume: bool) -> CfrResult<()> {
    let config = build_config(config, overrides)?;
    let table = if resume {
        persistence::load_or_empty(&out)
    } else {
        NodeTable::new()
    };

    println!();
    println!(
        "  {} Training {} hands | seed {} | bb {} | {} thread(s)",
        "CFR+".bold(),
        config.iterations,
        config.seed,
        config.big_blind,
        config.threads,
    );

    let iterations = config.iterations;
    let mut trainer = Trainer::with_table(config, table)?;
    trainer.train(iterations)?;
    trainer.save(&out)?;

    println!();
    print_success(&format!(
        "  Saved {} infosets to {}",
        trainer.table().len(),
        out.display()
    ));
    println!();
    Ok(())
}

fn cmd_decide(table: PathBuf, hole: &str, board: &str, request: DecisionRequest) -> CfrResult<()> {
    let hole = parse_hole(hole)?;
    let board = parse_board(board)?;
    let policy = Policy::from_path(&table);

    let request = DecisionRequest {
        board_len: board.len(),
        ..request
    };
    let tier = postflop_tier(&hole, &board);
    let fd = has_flush_draw(&hole, &board);
    let strategy = policy.strategy(&request, tier, fd);
    let decision = policy.decide(&request, tier, fd);

    println!();
    println!(
        "  Board: {}  |  {} {}  |  pot {}  to call {}",
        board_display(&board),
        tier.to_string().bold(),
        if fd { "+ flush draw" } else { "" },
        request.pot,
        request.to_call,
    );
    println!("  {}", strategy_bar(&strategy));
    println!();
    println!("  {}", styled_decision(&decision));
    println!();
    Ok(())
}

fn cmd_inspect(table: PathBuf, street: Option<Street>, top: usize) {
    let policy = Policy::from_path(&table);
    let rows: Vec<_> = policy
        .table()
        .iter()
        .filter(|(k, _)| street.map_or(true, |s| k.street == s))
        .map(|(k, n)| (*k, n.visits_weight(), n.average_strategy()))
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(top)
        .collect();

    println!();
    println!(
        "  {} {} infosets in {}",
        "CFR+".bold(),
        policy.table().len(),
        table.display().to_string().dimmed()
    );
    if rows.is_empty() {
        println!("  (nothing to show)");
    } else {
        println!("{}", strategy_table(&rows));
    }
    println!();
}
