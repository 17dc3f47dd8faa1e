use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand, builder::PossibleValuesParser};

use crate::engine::MatchingEngine;
use crate::order::{Order, Side};
use crate::stp::StpPolicy;

/// Demo CLI for the order book engine: `Add`/`Match` submit orders,
/// `Cancel` cancels a resting order by id, `Book`/`Snapshot` inspect state.
/// Each invocation starts from an empty book — this is a one-shot inspection
/// tool, not a persistent server.
#[derive(Parser)]
#[command(name = "order-book-cli")]
#[command(version = "0.1", about = "A demo of a limit order book and matching engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Self-trade prevention policy applied if the demo order self-crosses.
    #[arg(long, global = true, value_parser = PossibleValuesParser::new(["cancel-both", "cancel-incoming", "cancel-resting"]), default_value = "cancel-both")]
    stp: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a limit order
    Add {
        #[arg(value_parser = PossibleValuesParser::new(["buy", "sell"]))]
        side: String,
        /// Price in ticks
        price: i32,
        /// Quantity (must be > 0)
        quantity: i32,
        /// Order id (nonzero)
        #[arg(long, default_value_t = 1)]
        id: u32,
        #[arg(long, default_value_t = 1)]
        owner: u32,
    },
    /// Submit a market order
    Match {
        #[arg(value_parser = PossibleValuesParser::new(["buy", "sell"]))]
        side: String,
        quantity: i32,
        #[arg(long, default_value_t = 1)]
        id: u32,
        #[arg(long, default_value_t = 1)]
        owner: u32,
    },
    /// Cancel a resting order by id
    Cancel {
        /// Id of this cancel order itself (nonzero, distinct from `target`)
        #[arg(long, default_value_t = 1)]
        id: u32,
        #[arg(long, default_value_t = 1)]
        owner: u32,
        /// Id of the resting order to cancel
        target: u32,
    },
    /// Show the (empty) book
    Book,
    /// Show a market structure snapshot as JSON
    Snapshot {
        #[arg(long, default_value_t = 5)]
        depth: usize,
    },
}

fn parse_side(side_str: &str) -> Side {
    match side_str {
        "buy" => Side::Buy,
        "sell" => Side::Sell,
        _ => unreachable!("clap restricts this argument to buy|sell"),
    }
}

fn parse_stp(stp_str: &str) -> StpPolicy {
    match stp_str {
        "cancel-both" => StpPolicy::CancelBoth,
        "cancel-incoming" => StpPolicy::CancelIncoming,
        "cancel-resting" => StpPolicy::CancelResting,
        _ => unreachable!("clap restricts this argument to a known policy"),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_millis() as u64
}

fn print_outcome(label: &str, outcome: &crate::engine::MatchOutcome) {
    println!("{label}: {:?}", outcome.reason);
    if outcome.trades.is_empty() {
        println!("no trades");
    } else {
        for trade in &outcome.trades {
            println!("{trade:?}");
        }
    }
    if let Some(order) = &outcome.order {
        println!("final order state: {order:?}");
    }
}

fn print_book(engine: &MatchingEngine) {
    let snapshot = engine.book().snapshot(now_millis(), 5);
    println!("------ order book ------");
    println!("bids (highest first):");
    for level in &snapshot.bid_depths {
        println!("  price {} qty {} orders {}", level.price, level.total_quantity, level.order_count);
    }
    println!("asks (lowest first):");
    for level in &snapshot.ask_depths {
        println!("  price {} qty {} orders {}", level.price, level.total_quantity, level.order_count);
    }
    println!("-------------------------");
}

pub fn run_cli() {
    let cli = Cli::parse();
    let mut engine = MatchingEngine::new(parse_stp(&cli.stp));

    match cli.command {
        Commands::Add {
            side,
            price,
            quantity,
            id,
            owner,
        } => {
            let order = Order::new_limit(id, owner, price, quantity, parse_side(&side), now_millis());
            let outcome = engine.match_order(order);
            print_outcome("add", &outcome);
            print_book(&engine);
        }
        Commands::Match { side, quantity, id, owner } => {
            let order = Order::new_market(id, owner, quantity, parse_side(&side), now_millis());
            let outcome = engine.match_order(order);
            print_outcome("match", &outcome);
            print_book(&engine);
        }
        Commands::Cancel { id, owner, target } => {
            let order = Order::new_cancel(id, owner, target, now_millis());
            let outcome = engine.match_order(order);
            print_outcome("cancel", &outcome);
            print_book(&engine);
        }
        Commands::Book => {
            print_book(&engine);
        }
        Commands::Snapshot { depth } => {
            let snapshot = engine.book().snapshot(now_millis(), depth);
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("failed to serialize snapshot: {e}"),
            }
        }
    }
}
