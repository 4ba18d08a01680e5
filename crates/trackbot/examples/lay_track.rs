//! Lay one track across the default board and print the chain.
//!
//! Usage:
//!   cargo run -p trackbot --example lay_track -- [seed] [supply rows...]
//!
//! With three supply rows the path must cross columns 8, 17 and 26 on those rows.

use trackbot::prelude::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let rows: Vec<i32> = args.filter_map(|s| s.parse().ok()).collect();
    let cfg = match rows.as_slice() {
        [a, b, c] => SearchCfg::default().with_supplies([*a, *b, *c]),
        [] => SearchCfg::default(),
        _ => {
            eprintln!("usage: lay_track [seed] [row0 row1 row2]");
            return;
        }
    };
    let bot = match TrackBot::new(cfg) {
        Ok(bot) => bot,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    match bot.search(seed) {
        Ok(sol) => {
            for step in &sol.path {
                match step.track_id {
                    Some(id) => println!("({:>2}, {}) {:<5} track {id}", step.x, step.y, step.facing),
                    None => println!("({:>2}, {}) {:<5} start", step.x, step.y, step.facing),
                }
            }
            println!(
                "pieces={} cells={} score={:.4} iterations={}",
                sol.stats.pieces, sol.stats.cells, sol.stats.score, sol.iterations
            );
        }
        Err(err) => eprintln!("{err}"),
    }
}
