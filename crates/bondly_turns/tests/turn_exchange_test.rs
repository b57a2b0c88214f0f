//! End-to-end tests for the couple message exchange.

use std::sync::Arc;
use std::thread;

use bondly_turns::invariants::check_log;
use bondly_turns::{
    CoupleId, GameMasterRegistry, InMemoryTurnStore, Sender, TurnError, TurnValidator,
};

fn validator() -> TurnValidator {
    TurnValidator::new(Arc::new(InMemoryTurnStore::new()))
}

#[test]
fn test_scenario_alternating_exchange() {
    let v = validator();
    let couple = CoupleId::from("C1");

    v.submit(&couple, "player1", "hi").expect("player1 opens");
    assert_eq!(v.store().list(&couple).unwrap().len(), 1);

    let err = v.submit(&couple, "player1", "again").unwrap_err();
    assert!(matches!(err, TurnError::OutOfTurn { .. }));

    v.submit(&couple, "player2", "hey").expect("player2 replies");
    let log = v.store().list(&couple).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(*log[0].sender(), Sender::Player1);
    assert_eq!(*log[1].sender(), Sender::Player2);
}

#[test]
fn test_scenario_player2_cannot_open() {
    let v = validator();
    let err = v
        .submit(&CoupleId::from("C3"), "player2", "first")
        .unwrap_err();
    assert_eq!(err.kind(), "OutOfTurn");
    assert!(v.store().list(&CoupleId::from("C3")).unwrap().is_empty());
}

#[test]
fn test_scenario_game_master_presence() {
    let registry = GameMasterRegistry::new();
    let couple = CoupleId::from("C2");

    registry.connect(&couple);
    let status = registry.status();
    assert_eq!(*status.count(), 1);
    assert_eq!(status.couple_ids(), &vec![couple.clone()]);

    registry.disconnect(&couple);
    let status = registry.status();
    assert_eq!(*status.count(), 0);
    assert!(status.couple_ids().is_empty());
}

#[test]
fn test_never_seen_couple_has_empty_log() {
    let v = validator();
    let log = v.store().list(&CoupleId::from("never-seen")).unwrap();
    assert!(log.is_empty());
}

#[test]
fn test_whitespace_text_always_rejected() {
    let v = validator();
    let couple = CoupleId::from("C1");
    for sender in ["player1", "player2"] {
        for text in ["", " ", "\n\t  "] {
            let err = v.submit(&couple, sender, text).unwrap_err();
            assert_eq!(err.kind(), "EmptyText", "sender={sender} text={text:?}");
        }
    }
    v.submit(&couple, "player1", "hi").unwrap();
    for sender in ["player1", "player2"] {
        let err = v.submit(&couple, sender, "   ").unwrap_err();
        assert_eq!(err.kind(), "EmptyText");
    }
}

#[test]
fn test_long_exchange_keeps_invariants() {
    let v = validator();
    let couple = CoupleId::from("C1");
    let mut sender = Sender::Player1;
    for i in 0..50 {
        // Every other round the wrong player tries to jump the queue first.
        if i % 2 == 0 {
            assert!(v.submit_as(&couple, sender.opponent(), "cut in").is_err());
        }
        v.submit_as(&couple, sender, &format!("msg {i}")).unwrap();
        sender = sender.opponent();
    }
    let log = v.store().list(&couple).unwrap();
    assert_eq!(log.len(), 50);
    assert!(check_log(&log).is_ok());
}

#[test]
fn test_concurrent_submissions_for_one_couple_alternate() {
    let v = Arc::new(validator());
    let couple = CoupleId::from("busy");

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let v = Arc::clone(&v);
            let couple = couple.clone();
            let sender = if worker % 2 == 0 {
                Sender::Player1
            } else {
                Sender::Player2
            };
            thread::spawn(move || {
                let mut accepted = 0;
                for i in 0..200 {
                    if v.submit_as(&couple, sender, &format!("{worker}-{i}")).is_ok() {
                        accepted += 1;
                    }
                }
                accepted
            })
        })
        .collect();

    let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let log = v.store().list(&couple).unwrap();
    assert_eq!(log.len(), accepted);
    assert!(check_log(&log).is_ok(), "alternation broken under contention");
}

#[test]
fn test_couples_are_independent() {
    let v = validator();
    v.submit(&CoupleId::from("A"), "player1", "hi A").unwrap();
    v.submit(&CoupleId::from("B"), "player1", "hi B").unwrap();
    assert!(v.can_send(&CoupleId::from("A"), Sender::Player2).unwrap());
    assert!(v.can_send(&CoupleId::from("B"), Sender::Player2).unwrap());
}
