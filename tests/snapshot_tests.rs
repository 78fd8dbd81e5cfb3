//! Snapshot round-trip fidelity.
//!
//! The property that matters is behavioral: an engine resumed from a
//! serialized snapshot must accept and resolve exactly the moves the
//! original would have, including the awkward case of a committed zero in
//! an open round.

use blotto::{
    snapshot, BlottoEngine, GameConfig, GameId, GameState, MoveError, Outcome, PlayerId,
    PlayerIdentity,
};
use proptest::prelude::*;

fn engine(starting_troops: u32) -> BlottoEngine {
    let mut engine = BlottoEngine::new(
        GameId::new("g-snap"),
        PlayerIdentity::new("u-1", "Alice"),
        PlayerIdentity::new("u-2", "Bob"),
        GameConfig::with_starting_troops(starting_troops),
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

/// Everything except `updated_at`, which moves with the wall clock on
/// each accepted move.
fn assert_equivalent(a: &GameState, b: &GameState) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.player1, b.player1);
    assert_eq!(a.player2, b.player2);
    assert_eq!(a.current_round, b.current_round);
    assert_eq!(a.rounds, b.rounds);
    assert_eq!(a.status, b.status);
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.starting_troops, b.starting_troops);
    assert_eq!(a.created_at, b.created_at);
}

#[test]
fn test_json_round_trip_mid_game() {
    let mut engine = engine(20);
    engine.apply_move(&p1(), 7).unwrap();
    engine.apply_move(&p2(), 9).unwrap();
    engine.apply_move(&p1(), 3).unwrap();

    let state = engine.state().clone();
    let restored = snapshot::from_json(&snapshot::to_json(&state).unwrap()).unwrap();
    assert_eq!(state, restored);
}

#[test]
fn test_binary_round_trip_mid_game() {
    let mut engine = engine(20);
    engine.apply_move(&p2(), 9).unwrap();

    let state = engine.state().clone();
    let restored = snapshot::from_bytes(&snapshot::to_bytes(&state).unwrap()).unwrap();
    assert_eq!(state, restored);
}

#[test]
fn test_resumed_engine_continues_identically() {
    let mut original = engine(20);
    original.apply_move(&p1(), 7).unwrap();
    original.apply_move(&p2(), 9).unwrap();
    original.apply_move(&p1(), 3).unwrap();

    let json = snapshot::to_json(original.state()).unwrap();
    let mut resumed = BlottoEngine::resume(
        snapshot::from_json(&json).unwrap(),
        GameConfig::with_starting_troops(20),
    );

    // Same follow-up moves on both engines.
    original.apply_move(&p2(), 5).unwrap();
    resumed.apply_move(&p2(), 5).unwrap();

    assert_equivalent(original.state(), resumed.state());
}

#[test]
fn test_committed_zero_survives_the_round_trip() {
    // Deplete player 1, then have them open round 3 with a forced zero.
    let mut engine = engine(10);
    engine.apply_move(&p1(), 10).unwrap();
    engine.apply_move(&p2(), 1).unwrap();
    engine.apply_move(&p1(), 0).unwrap();
    engine.apply_move(&p2(), 0).unwrap();
    engine.apply_move(&p1(), 0).unwrap();

    let json = snapshot::to_json(engine.state()).unwrap();
    let mut resumed = BlottoEngine::resume(
        snapshot::from_json(&json).unwrap(),
        GameConfig::with_starting_troops(10),
    );

    // The restored engine knows the zero commitment is present: player 1
    // may not move again, and player 2's move resolves the round.
    assert_eq!(
        resumed.apply_move(&p1(), 0),
        Err(MoveError::AlreadyCommitted { round: 3 })
    );
    let applied = resumed.apply_move(&p2(), 1).unwrap();
    let round = applied.resolved.unwrap();
    assert_eq!(round.player1_troops, Some(0));
    assert_eq!(round.winner, Some(Outcome::Player2));
}

#[test]
fn test_finished_game_round_trips_immutably() {
    let mut engine = engine(10);
    for _ in 0..2 {
        engine.apply_move(&p1(), 5).unwrap();
        engine.apply_move(&p2(), 5).unwrap();
    }
    assert!(engine.state().is_finished());

    let json = snapshot::to_json(engine.state()).unwrap();
    let mut resumed = BlottoEngine::resume(
        snapshot::from_json(&json).unwrap(),
        GameConfig::with_starting_troops(10),
    );

    assert_eq!(resumed.state().winner, Some(Outcome::Tie));
    assert_eq!(resumed.apply_move(&p1(), 0), Err(MoveError::NotPlaying));
    // `start` must not revive a finished game either.
    resumed.start();
    assert!(resumed.state().is_finished());
}

#[test]
fn test_wire_format_is_stable() {
    let mut engine = engine(10);
    engine.apply_move(&p1(), 6).unwrap();
    engine.apply_move(&p2(), 4).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&snapshot::to_json(engine.state()).unwrap()).unwrap();

    // camelCase fields, lowercase enums, ISO-8601 timestamps.
    assert_eq!(value["status"], "playing");
    assert_eq!(value["startingTroops"], 10);
    assert_eq!(value["currentRound"], 2);
    assert_eq!(value["player1"]["roundWins"], 1);
    assert_eq!(value["rounds"][0]["roundNumber"], 1);
    assert_eq!(value["rounds"][0]["player1Troops"], 6);
    assert_eq!(value["rounds"][0]["player2Troops"], 4);
    assert_eq!(value["rounds"][0]["winner"], "player1");

    let timestamp = value["rounds"][0]["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    let created = value["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
}

proptest! {
    /// Any reachable state survives both codecs exactly.
    #[test]
    fn prop_round_trip_any_reachable_state(
        start in 1u32..60,
        commits in proptest::collection::vec((0u32..80, 0u32..80), 0..30),
    ) {
        let mut engine = engine(start);
        for (a, b) in commits {
            let _ = engine.apply_move(&p1(), a);
            let _ = engine.apply_move(&p2(), b);
            if engine.state().is_finished() {
                break;
            }
        }

        let state = engine.state().clone();
        let via_json = snapshot::from_json(&snapshot::to_json(&state).unwrap()).unwrap();
        prop_assert_eq!(&state, &via_json);
        let via_bytes = snapshot::from_bytes(&snapshot::to_bytes(&state).unwrap()).unwrap();
        prop_assert_eq!(&state, &via_bytes);
    }
}
