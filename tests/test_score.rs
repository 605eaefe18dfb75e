use crow_shooter::score::Scoreboard;

#[test]
fn hits_count_up_by_one() {
    let mut board = Scoreboard::default();
    assert_eq!(board.record_hit(), Some(1));
    assert_eq!(board.record_hit(), Some(2));
    assert_eq!(board.score(), 2);
}

#[test]
fn game_over_latches_once_and_freezes_score() {
    let mut board = Scoreboard::default();
    board.record_hit();
    assert_eq!(board.latch_game_over(), Some(1));
    assert_eq!(board.latch_game_over(), None);
    assert_eq!(board.record_hit(), None);
    assert_eq!(board.score(), 1);
    assert!(board.is_over());
}

#[test]
fn reset_clears_score_and_latch() {
    let mut board = Scoreboard::default();
    board.record_hit();
    board.latch_game_over();
    board.reset();
    assert_eq!(board.score(), 0);
    assert!(!board.is_over());
    assert_eq!(board.record_hit(), Some(1));
}
