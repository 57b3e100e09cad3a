mod sim;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;

use sim::{GameRun, play_game, verify_board_invariants, verify_session_flow};

#[derive(Debug, Parser)]
#[command(name = "daliary-tester", version)]
#[command(about = "Headless QA for the Daliary 2048 engine - random play and invariant sweeps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play seeded random games and print per-game results
    Play {
        /// Number of games to play
        #[arg(long, default_value_t = 10)]
        games: u64,
        /// Base seed; game N uses seed + N
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Safety cap on moves per game
        #[arg(long, default_value_t = 5_000)]
        max_moves: u32,
    },
    /// Sweep engine invariants over seeded random play; exits non-zero on
    /// the first violation
    Verify {
        /// Number of games per sweep
        #[arg(long, default_value_t = 50)]
        games: u64,
        /// Base seed; game N uses seed + N
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Safety cap on moves per game
        #[arg(long, default_value_t = 5_000)]
        max_moves: u32,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            games,
            seed,
            max_moves,
        } => run_play(games, seed, max_moves),
        Command::Verify {
            games,
            seed,
            max_moves,
        } => run_verify(games, seed, max_moves),
    }
}

fn describe(run: &GameRun) -> String {
    let ending = if run.game_over { "dead" } else { "capped" };
    format!(
        "seed {:>4}  moves {:>5}  score {:>7}  max tile {:>5}  [{ending}]",
        run.seed, run.moves, run.score, run.max_tile
    )
}

fn run_play(games: u64, base_seed: u64, max_moves: u32) -> Result<()> {
    let mut best = 0u32;
    let mut reached = 0u64;
    for n in 0..games {
        let run = play_game(base_seed + n, max_moves);
        if run.reached_target {
            reached += 1;
            println!("{}", describe(&run).green());
        } else {
            println!("{}", describe(&run));
        }
        best = best.max(run.score);
    }
    println!(
        "{} {games} games, best score {best}, target reached in {reached}",
        "done:".bold()
    );
    Ok(())
}

fn run_verify(games: u64, base_seed: u64, max_moves: u32) -> Result<()> {
    let mut failures = 0u64;
    for n in 0..games {
        let seed = base_seed + n;
        match verify_board_invariants(seed, max_moves) {
            Ok(run) => log::debug!("board sweep ok: {}", describe(&run)),
            Err(err) => {
                failures += 1;
                eprintln!("{} {err:#}", "board invariant violated:".red().bold());
            }
        }
        match verify_session_flow(seed, max_moves) {
            Ok(run) => log::debug!("session sweep ok: {}", describe(&run)),
            Err(err) => {
                failures += 1;
                eprintln!("{} {err:#}", "session invariant violated:".red().bold());
            }
        }
    }
    if failures > 0 {
        bail!("{failures} invariant sweep(s) failed");
    }
    println!(
        "{} {games} games x 2 sweeps, no violations",
        "verify passed:".green().bold()
    );
    Ok(())
}
