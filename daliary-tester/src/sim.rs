//! Seeded random play against the pure engine, with invariant sweeps.

use std::collections::HashSet;

use anyhow::{Result, bail, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use daliary_game::board::{BoardState, Direction, apply_move, init_game, is_game_over};
use daliary_game::day::DayKey;
use daliary_game::reward::RewardDecision;
use daliary_game::save::{SaveEnvelope, decode, encode};
use daliary_game::session::{GameSession, SaveAction};

/// Result of one headless game.
#[derive(Debug, Clone)]
pub struct GameRun {
    pub seed: u64,
    pub moves: u32,
    pub score: u32,
    pub max_tile: u32,
    pub game_over: bool,
    pub reached_target: bool,
}

fn pick_legal_move<R: Rng + Clone>(state: &BoardState, rng: &mut R) -> Option<Direction> {
    let first = rng.gen_range(0..4);
    (0..4)
        .map(|offset| Direction::ALL[(first + offset) % 4])
        .find(|&dir| apply_move(state, dir, &mut rng.clone()).moved)
}

/// Play one game of random legal moves to completion or the move cap.
pub fn play_game(seed: u64, max_moves: u32) -> GameRun {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut state = init_game(&mut rng);
    let mut moves = 0;
    while moves < max_moves && !is_game_over(&state) {
        let Some(dir) = pick_legal_move(&state, &mut rng) else {
            break;
        };
        let outcome = apply_move(&state, dir, &mut rng);
        state = outcome.state;
        moves += 1;
    }
    GameRun {
        seed,
        moves,
        score: state.score,
        max_tile: state.max_tile(),
        game_over: is_game_over(&state),
        reached_target: state.reached_target,
    }
}

fn check_coherent(state: &BoardState) -> Result<()> {
    let mut cells = HashSet::new();
    let mut ids = HashSet::new();
    for tile in &state.tiles {
        ensure!(tile.x < 4 && tile.y < 4, "tile out of bounds: {tile:?}");
        ensure!(
            tile.value.is_power_of_two() && tile.value >= 2,
            "tile value not a power of two: {tile:?}"
        );
        ensure!(
            cells.insert((tile.x, tile.y)),
            "two tiles share cell ({}, {})",
            tile.x,
            tile.y
        );
        ensure!(ids.insert(tile.id), "duplicate tile id: {tile:?}");
    }
    Ok(())
}

/// Drive random play over the raw board functions, checking the move
/// invariants after every step.
pub fn verify_board_invariants(seed: u64, max_moves: u32) -> Result<GameRun> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut state = init_game(&mut rng);
    check_coherent(&state)?;
    let day: DayKey = "2026-01-01".parse()?;
    let mut moves = 0;

    while moves < max_moves {
        if state.is_full() {
            let any_legal = Direction::ALL
                .iter()
                .any(|&dir| apply_move(&state, dir, &mut rng.clone()).moved);
            ensure!(
                any_legal != is_game_over(&state),
                "seed {seed}: adjacency scan disagrees with per-direction legality"
            );
        }
        if is_game_over(&state) {
            break;
        }

        let dir = Direction::ALL[rng.gen_range(0..4)];
        let sum_before = state.value_sum();
        let outcome = apply_move(&state, dir, &mut rng);
        if !outcome.moved {
            ensure!(
                outcome.state == state,
                "seed {seed}: rejected {dir} mutated the board"
            );
            ensure!(
                outcome.score_gain == 0 && !outcome.hit_target,
                "seed {seed}: rejected {dir} reported side effects"
            );
            continue;
        }

        let spawned = outcome.state.value_sum() - sum_before;
        ensure!(
            spawned == 2 || spawned == 4,
            "seed {seed}: move {dir} changed the value sum by {spawned}"
        );
        check_coherent(&outcome.state)?;

        if moves % 16 == 0 {
            let envelope = SaveEnvelope {
                day: day.clone(),
                state: outcome.state.clone(),
            };
            let token = encode(&envelope);
            match decode(&token) {
                Some(back) if back == envelope => {}
                other => bail!("seed {seed}: save round-trip failed: {other:?}"),
            }
            ensure!(
                decode(&token[..token.len() / 2]).is_none(),
                "seed {seed}: truncated token decoded"
            );
        }

        state = outcome.state;
        moves += 1;
    }

    Ok(GameRun {
        seed,
        moves,
        score: state.score,
        max_tile: state.max_tile(),
        game_over: is_game_over(&state),
        reached_target: state.reached_target,
    })
}

/// Drive random play through the session pipeline, checking the save and
/// submission policies.
pub fn verify_session_flow(seed: u64, max_moves: u32) -> Result<GameRun> {
    let day: DayKey = "2026-01-01".parse()?;
    let mut session = GameSession::start_for_day(day.clone(), seed, None);
    let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0x5EED);
    let mut moves = 0;
    let mut win_grants = 0;

    while moves < max_moves && !session.is_game_over() {
        let dir = Direction::ALL[rng.gen_range(0..4)];
        let before = session.state().clone();
        let report = session.handle_move(dir);
        if !report.moved {
            ensure!(
                session.state() == &before,
                "seed {seed}: rejected move mutated session state"
            );
            ensure!(
                report.save == SaveAction::None && report.submissions.is_empty(),
                "seed {seed}: rejected move produced side effects"
            );
            if Direction::ALL
                .iter()
                .all(|&d| !apply_move(session.state(), d, &mut rng.clone()).moved)
            {
                break;
            }
            continue;
        }

        moves += 1;
        match (&report.save, report.game_over) {
            (SaveAction::Persist(token), false) => {
                let envelope =
                    decode(token).ok_or_else(|| anyhow::anyhow!("persisted token undecodable"))?;
                ensure!(envelope.day == day, "seed {seed}: token day mismatch");
                ensure!(
                    envelope.state == *session.state(),
                    "seed {seed}: token does not match live state"
                );
            }
            (SaveAction::Clear, true) => {}
            (save, game_over) => {
                bail!("seed {seed}: save action {save:?} with game_over={game_over}")
            }
        }
        ensure!(
            report.submissions.len() <= 2,
            "seed {seed}: more than two submissions from one move"
        );
        if report.reward == RewardDecision::GrantReward {
            win_grants += 1;
        }
    }

    ensure!(
        win_grants <= 1,
        "seed {seed}: win-grant submission fired {win_grants} times"
    );

    Ok(GameRun {
        seed,
        moves,
        score: session.score(),
        max_tile: session.state().max_tile(),
        game_over: session.is_game_over(),
        reached_target: session.state().reached_target,
    })
}
