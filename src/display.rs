use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::action::{Action, ALL_ACTIONS, NUM_ACTIONS};
use crate::cards::{Card, Suit};
use crate::infoset::InfosetKey;
use crate::policy::{argmax, Command, Decision};

pub fn board_display(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "(preflop)".dimmed().to_string();
    }
    cards
        .iter()
        .map(|card| {
            let text = card.pretty();
            match card.suit {
                Suit::Spades => text.white().to_string(),
                Suit::Hearts => text.red().to_string(),
                Suit::Diamonds => text.blue().to_string(),
                Suit::Clubs => text.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn styled_action(action: Action) -> String {
    let label = action.label();
    match action {
        Action::Fold => label.dimmed().bold().to_string(),
        Action::Call => label.green().bold().to_string(),
        Action::RaiseMin | Action::Raise2x | Action::Raise3x => label.red().bold().to_string(),
    }
}

pub fn styled_decision(decision: &Decision) -> String {
    match decision.command {
        Command::Fold => "FOLD".dimmed().bold().to_string(),
        Command::Call => "CALL".green().bold().to_string(),
        Command::Raise => format!("RAISE +{}", decision.amount).red().bold().to_string(),
    }
}

/// Probability as a percentage, highlighting the dominant action.
fn pct_cell(p: f64, is_max: bool) -> Cell {
    let text = format!("{:.1}", p * 100.0);
    let text = if is_max { text.bold().to_string() } else { text };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// One row per infoset: key, visit weight and the average strategy.
pub fn strategy_table(rows: &[(InfosetKey, f64, [f64; NUM_ACTIONS])]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Infoset".bold().to_string()),
        Cell::new("Visits").set_alignment(CellAlignment::Right),
    ];
    for a in ALL_ACTIONS {
        header.push(Cell::new(format!("{} %", a.label())).set_alignment(CellAlignment::Right));
    }
    table.set_header(header);

    for (key, visits, strategy) in rows {
        let best = argmax(strategy).index();
        let mut row = vec![
            Cell::new(key.to_string()),
            Cell::new(format!("{:.0}", visits)).set_alignment(CellAlignment::Right),
        ];
        for (i, &p) in strategy.iter().enumerate() {
            row.push(pct_cell(p, i == best));
        }
        table.add_row(row);
    }

    table.to_string()
}

pub fn strategy_bar(strategy: &[f64; NUM_ACTIONS]) -> String {
    ALL_ACTIONS
        .iter()
        .zip(strategy.iter())
        .map(|(a, p)| format!("{} {:.1}%", styled_action(*a), p * 100.0))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}
