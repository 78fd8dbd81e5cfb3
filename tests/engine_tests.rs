//! Rules-engine integration tests.
//!
//! Exercises the full move/resolution/termination surface, including the
//! documented scenarios: the 6v4 opener, tie-exhausted pools, and a
//! straight three-round margin win.

use blotto::{
    BlottoEngine, GameConfig, GameId, GameStatus, MoveError, Outcome, PlayerId, PlayerIdentity,
};
use proptest::prelude::*;

fn engine(config: GameConfig) -> BlottoEngine {
    let mut engine = BlottoEngine::new(
        GameId::new("g-test"),
        PlayerIdentity::new("u-1", "Alice"),
        PlayerIdentity::new("u-2", "Bob"),
        config,
    );
    engine.start();
    engine
}

fn p1() -> PlayerId {
    PlayerId::new("u-1")
}

fn p2() -> PlayerId {
    PlayerId::new("u-2")
}

#[test]
fn test_scenario_opening_round() {
    // startingTroops 10, victoryMargin 3, maxRounds 50; P1 commits 6, P2
    // commits 4.
    let mut engine = engine(GameConfig::with_starting_troops(10));

    engine.apply_move(&p1(), 6).unwrap();
    let applied = engine.apply_move(&p2(), 4).unwrap();

    let round = applied.resolved.unwrap();
    assert_eq!(round.winner, Some(Outcome::Player1));

    let state = engine.state();
    assert_eq!(state.player1.troops, 4);
    assert_eq!(state.player2.troops, 6);
    assert_eq!(state.round_wins(), (1, 0));
    assert_eq!(state.status, GameStatus::Playing);
}

#[test]
fn test_scenario_ties_exhaust_pools_by_round_two() {
    // Identical 5v5 ties with 10 starting troops end the game at round 2
    // by mutual depletion, long before the 50-round cap.
    let mut engine = engine(GameConfig::with_starting_troops(10));

    for _ in 0..2 {
        engine.apply_move(&p1(), 5).unwrap();
        engine.apply_move(&p2(), 5).unwrap();
    }

    let state = engine.state();
    assert_eq!(state.status, GameStatus::Finished);
    assert_eq!(state.winner, Some(Outcome::Tie));
    assert_eq!(state.round_wins(), (0, 0));
    assert_eq!(state.rounds.len(), 2);

    // And nothing more is accepted.
    assert_eq!(engine.apply_move(&p1(), 0), Err(MoveError::NotPlaying));
}

#[test]
fn test_scenario_three_straight_wins_end_the_game() {
    // P1 takes rounds 1-3 with any positive margin; the game ends at the
    // default victory margin of 3 regardless of remaining troops.
    let mut engine = engine(GameConfig::default());

    for round in 1..=3u32 {
        engine.apply_move(&p1(), round + 1).unwrap();
        engine.apply_move(&p2(), round).unwrap();
    }

    let state = engine.state();
    assert_eq!(state.status, GameStatus::Finished);
    assert_eq!(state.winner, Some(Outcome::Player1));
    assert_eq!(state.rounds.len(), 3);
    assert!(state.player1.troops > 0);
    assert!(state.player2.troops > 0);
}

#[test]
fn test_margin_counts_lead_not_total() {
    // 2-1 is a lead of 1; the game continues until the lead reaches 3.
    let mut engine = engine(GameConfig::default());

    engine.apply_move(&p1(), 5).unwrap();
    engine.apply_move(&p2(), 1).unwrap();
    engine.apply_move(&p1(), 1).unwrap();
    engine.apply_move(&p2(), 5).unwrap();
    engine.apply_move(&p1(), 5).unwrap();
    engine.apply_move(&p2(), 1).unwrap();

    assert_eq!(engine.state().round_wins(), (2, 1));
    assert_eq!(engine.state().status, GameStatus::Playing);
}

#[test]
fn test_one_sided_depletion_does_not_finish() {
    // Only one empty pool: the game keeps going, the depleted side
    // commits zero.
    let mut engine = engine(GameConfig::with_starting_troops(10));

    engine.apply_move(&p1(), 10).unwrap();
    engine.apply_move(&p2(), 1).unwrap();
    assert_eq!(engine.state().status, GameStatus::Playing);

    let applied = engine.apply_move(&p1(), 9).unwrap();
    assert_eq!(applied.committed, 0);
}

#[test]
fn test_submission_order_is_irrelevant() {
    let mut forward = engine(GameConfig::with_starting_troops(20));
    forward.apply_move(&p1(), 7).unwrap();
    forward.apply_move(&p2(), 9).unwrap();

    let mut reverse = engine(GameConfig::with_starting_troops(20));
    reverse.apply_move(&p2(), 9).unwrap();
    reverse.apply_move(&p1(), 7).unwrap();

    let (f, r) = (forward.state(), reverse.state());
    let (fr, rr) = (f.round(1).unwrap(), r.round(1).unwrap());

    assert_eq!(fr.player1_troops, rr.player1_troops);
    assert_eq!(fr.player2_troops, rr.player2_troops);
    assert_eq!(fr.winner, rr.winner);
    assert_eq!(f.round_wins(), r.round_wins());
    assert_eq!(f.player1.troops, r.player1.troops);
    assert_eq!(f.player2.troops, r.player2.troops);
    assert_eq!(f.current_round, r.current_round);
}

#[test]
fn test_rounds_are_contiguous_and_numbered_from_one() {
    let mut engine = engine(GameConfig::default());

    for _ in 0..4 {
        engine.apply_move(&p1(), 1).unwrap();
        engine.apply_move(&p2(), 1).unwrap();
    }

    for (i, round) in engine.state().rounds.iter().enumerate() {
        assert_eq!(round.round_number, i as u32 + 1);
    }
    assert_eq!(engine.state().current_round, 5);
}

proptest! {
    /// Pools always equal starting troops minus the sum of accepted
    /// commitments, and never underflow.
    #[test]
    fn prop_pool_conservation(
        start in 1u32..200,
        commits in proptest::collection::vec((0u32..250, 0u32..250), 1..60),
    ) {
        let mut engine = engine(GameConfig::with_starting_troops(start));
        let (mut spent1, mut spent2) = (0u32, 0u32);

        for (a, b) in commits {
            if let Ok(applied) = engine.apply_move(&p1(), a) {
                spent1 += applied.committed;
            }
            if let Ok(applied) = engine.apply_move(&p2(), b) {
                spent2 += applied.committed;
            }
            if engine.state().is_finished() {
                break;
            }
        }

        prop_assert_eq!(engine.state().player1.troops, start - spent1);
        prop_assert_eq!(engine.state().player2.troops, start - spent2);
    }

    /// Round wins always equal the number of non-tie resolved rounds per
    /// side, and every resolved round's winner matches its commitments.
    #[test]
    fn prop_round_wins_match_history(
        start in 1u32..100,
        commits in proptest::collection::vec((0u32..120, 0u32..120), 1..40),
    ) {
        let mut engine = engine(GameConfig::with_starting_troops(start));

        for (a, b) in commits {
            let _ = engine.apply_move(&p1(), a);
            let _ = engine.apply_move(&p2(), b);
            if engine.state().is_finished() {
                break;
            }
        }

        let state = engine.state();
        let (mut wins1, mut wins2) = (0u32, 0u32);
        for round in state.rounds.iter().filter(|r| !r.is_open()) {
            let (c1, c2) = (round.player1_troops.unwrap(), round.player2_troops.unwrap());
            match round.winner.unwrap() {
                Outcome::Player1 => {
                    prop_assert!(c1 > c2);
                    wins1 += 1;
                }
                Outcome::Player2 => {
                    prop_assert!(c2 > c1);
                    wins2 += 1;
                }
                Outcome::Tie => prop_assert_eq!(c1, c2),
            }
        }
        prop_assert_eq!(state.round_wins(), (wins1, wins2));
    }
}
