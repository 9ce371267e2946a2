use darts_core::achievement::Achievement;
use darts_core::game::match_state::{Input, MatchState, Notice, Phase, TurnEnding};
use darts_core::model::config::{CheckMode, GameConfig};
use darts_core::model::dart::Dart;
use darts_core::model::hit::RawHit;
use darts_core::model::player::PlayerId;
use darts_core::rules::{BustReason, Verdict};

struct Table {
    state: MatchState,
    clock: u64,
}

impl Table {
    fn new(config: GameConfig) -> Self {
        let mut state = MatchState::new(config, PlayerId::Home);
        state.handle(Input::Begin);
        Self { state, clock: 0 }
    }

    fn throw(&mut self, dart: Dart) -> Vec<Notice> {
        self.clock += 1;
        self.state.handle(Input::Throw(RawHit::aimed(dart, self.clock)))
    }

    fn turn(&mut self, darts: &[Dart]) -> Vec<Notice> {
        let mut notices = Vec::new();
        for dart in darts {
            notices.extend(self.throw(*dart));
        }
        if self.state.phase() == Phase::AwaitingThrow {
            notices.extend(self.state.handle(Input::EndTurn));
        }
        notices.extend(self.state.handle(Input::Advance));
        notices
    }

    fn pass(&mut self) {
        self.turn(&[]);
    }
}

fn achievements(notices: &[Notice]) -> Vec<Achievement> {
    notices
        .iter()
        .filter_map(|n| match n {
            Notice::AchievementDetected { achievement, .. } => Some(*achievement),
            _ => None,
        })
        .collect()
}

const T20: Dart = Dart::triple(20);

#[test]
fn master_out_checkout_on_double_wins_the_match() {
    let mut table = Table::new(GameConfig::new(501, CheckMode::Open, CheckMode::Master));

    let notices = table.turn(&[T20, T20, T20]);
    assert_eq!(achievements(&notices), vec![Achievement::Ton80]);
    table.pass();
    table.turn(&[T20, T20, T20]);
    table.pass();
    table.turn(&[Dart::single(1)]);
    table.pass();
    assert_eq!(table.state.player(PlayerId::Home).score, 140);

    table.throw(T20);
    table.throw(T20);
    let notices = table.throw(Dart::double(20));

    assert_eq!(
        table.state.phase(),
        Phase::GameOver {
            winner: PlayerId::Home
        }
    );
    assert_eq!(table.state.winner(), Some(PlayerId::Home));
    assert_eq!(achievements(&notices), vec![Achievement::Win]);
    assert!(notices.contains(&Notice::GameOver {
        winner: PlayerId::Home,
        final_scores: [0, 501],
    }));

    // Terminal until rematch.
    assert!(table.throw(Dart::single(5)).is_empty());
    assert!(table.state.handle(Input::Undo).is_empty());
    assert!(table.state.handle(Input::Advance).is_empty());
    table.state.handle(Input::Rematch);
    assert_eq!(table.state.phase(), Phase::Intro);
}

#[test]
fn win_before_third_dart_stops_the_turn() {
    let mut table = Table::new(GameConfig::new(301, CheckMode::Open, CheckMode::Double));
    table.turn(&[T20, T20, T20]);
    table.pass();
    table.turn(&[T20, Dart::triple(19)]);
    table.pass();
    assert_eq!(table.state.player(PlayerId::Home).score, 4);

    let notices = table.throw(Dart::double(2));
    assert_eq!(table.state.winner(), Some(PlayerId::Home));
    assert!(notices.iter().any(|n| matches!(
        n,
        Notice::TurnEnded {
            ending: TurnEnding::Checkout,
            turn_score: 4,
            ..
        }
    )));
    assert_eq!(table.state.turn().darts().len(), 1);
}

#[test]
fn single_two_from_two_busts_under_double_out() {
    let mut table = Table::new(GameConfig::new(301, CheckMode::Open, CheckMode::Double));
    table.turn(&[T20, T20, T20]);
    table.pass();
    table.turn(&[T20, Dart::triple(19), Dart::double(1)]);
    table.pass();
    assert_eq!(table.state.player(PlayerId::Home).score, 2);

    let notices = table.throw(Dart::single(2));
    assert!(notices.iter().any(|n| matches!(
        n,
        Notice::DartRecorded {
            verdict: Verdict::Bust(BustReason::InvalidOut),
            score: 2,
            ..
        }
    )));
    assert_eq!(achievements(&notices), vec![Achievement::Bust]);
    assert_eq!(table.state.player(PlayerId::Home).score, 2);
    assert!(table.state.winner().is_none());
}

#[test]
fn leaving_one_busts_in_open_out() {
    let mut table = Table::new(GameConfig::new(301, CheckMode::Open, CheckMode::Open));
    table.turn(&[T20, T20, T20]);
    table.pass();
    table.throw(T20);
    let notices = table.throw(T20);
    assert!(notices.iter().any(|n| matches!(
        n,
        Notice::DartRecorded {
            verdict: Verdict::Bust(BustReason::LeavesOne),
            score: 61,
            ..
        }
    )));
    assert_eq!(table.state.player(PlayerId::Home).score, 61);
}

#[test]
fn bust_keeps_points_from_earlier_darts_of_the_turn() {
    let mut table = Table::new(GameConfig::new(301, CheckMode::Open, CheckMode::Double));
    table.turn(&[T20, T20, T20]);
    table.pass();
    assert_eq!(table.state.player(PlayerId::Home).score, 121);

    table.throw(T20);
    let notices = table.throw(T20);
    assert_eq!(table.state.player(PlayerId::Home).score, 61);
    assert!(matches!(
        table.state.phase(),
        Phase::TurnResolving {
            ending: TurnEnding::Bust
        }
    ));
    assert!(notices.iter().any(|n| matches!(
        n,
        Notice::TurnEnded {
            turn_score: 60,
            ending: TurnEnding::Bust,
            ..
        }
    )));
}

#[test]
fn double_in_ignores_points_until_started() {
    let mut table = Table::new(GameConfig::new(501, CheckMode::Double, CheckMode::Double));
    table.throw(T20);
    table.throw(Dart::SINGLE_BULL);
    assert_eq!(table.state.player(PlayerId::Home).score, 501);
    assert!(!table.state.player(PlayerId::Home).has_started);

    table.throw(Dart::double(10));
    let home = table.state.player(PlayerId::Home);
    assert!(home.has_started);
    assert_eq!(home.score, 481);
    assert_eq!(home.darts_thrown, 3);
}

#[test]
fn scoring_rate_freezes_at_one_hundred_in_501() {
    let mut table = Table::new(GameConfig::new(501, CheckMode::Open, CheckMode::Double));
    table.turn(&[T20, T20, T20]);
    table.turn(&[Dart::single(20); 3]);
    table.turn(&[T20, T20, T20]);
    table.turn(&[Dart::single(20); 3]);
    assert!(!table.state.stats_frozen());

    let notices = table.throw(T20);
    assert_eq!(table.state.player(PlayerId::Home).score, 81);
    assert!(notices.contains(&Notice::StatsFrozen {
        ppr: [180.0, 60.0]
    }));

    let home_before = table.state.ppr(PlayerId::Home);
    let away_before = table.state.ppr(PlayerId::Away);
    table.throw(Dart::single(1));
    table.throw(Dart::single(1));
    table.state.handle(Input::Advance);
    table.turn(&[T20, T20, T20]);

    assert_eq!(table.state.ppr(PlayerId::Home), home_before);
    assert_eq!(table.state.ppr(PlayerId::Away), away_before);
    assert_eq!(table.state.player(PlayerId::Away).darts_thrown, 9);
    assert!(table.state.player(PlayerId::Home).live_ppr(501) != home_before);
}

#[test]
fn freeze_threshold_is_fifty_in_301() {
    let mut table = Table::new(GameConfig::new(301, CheckMode::Open, CheckMode::Double));
    table.turn(&[T20, T20, T20]);
    table.pass();
    table.throw(T20);
    assert!(!table.state.stats_frozen());
    table.throw(Dart::single(15));
    assert_eq!(table.state.player(PlayerId::Home).score, 46);
    assert!(table.state.stats_frozen());
}

#[test]
fn undo_beyond_allowance_changes_nothing() {
    let mut table = Table::new(GameConfig::default());
    table.throw(T20);
    table.throw(T20);
    table.state.handle(Input::EndTurn);
    table.state.handle(Input::Advance);
    for _ in 0..2 {
        table.throw(Dart::single(5));
    }

    for _ in 0..3 {
        assert!(!table.state.handle(Input::Undo).is_empty());
    }
    assert_eq!(table.state.undo_remaining(), 0);
    let frozen = (
        table.state.scores(),
        table.state.turn().clone(),
        table.state.active_player(),
    );

    for _ in 0..5 {
        assert!(table.state.handle(Input::Undo).is_empty());
    }
    assert_eq!(
        (
            table.state.scores(),
            table.state.turn().clone(),
            table.state.active_player(),
        ),
        frozen
    );
    assert_eq!(table.state.scores(), [381, 501]);
    assert_eq!(table.state.active_player(), PlayerId::Home);
}

#[test]
fn undo_can_reverse_a_bust() {
    let mut table = Table::new(GameConfig::new(301, CheckMode::Open, CheckMode::Double));
    table.turn(&[T20, T20, T20]);
    table.pass();
    table.throw(T20);
    table.throw(T20);
    assert!(matches!(table.state.phase(), Phase::TurnResolving { .. }));

    table.state.handle(Input::Undo);
    assert_eq!(table.state.phase(), Phase::AwaitingThrow);
    assert_eq!(table.state.turn().darts(), &[T20]);
    assert!(!table.state.turn().busted());
    assert_eq!(table.state.player(PlayerId::Home).score, 61);
}

#[test]
fn turn_changes_are_announced_with_round_numbers() {
    let mut table = Table::new(GameConfig::default());
    let first = table.turn(&[Dart::single(1)]);
    let second = table.turn(&[Dart::single(1)]);
    assert!(first.contains(&Notice::TurnChanged {
        player: PlayerId::Away,
        round: 1
    }));
    assert!(second.contains(&Notice::TurnChanged {
        player: PlayerId::Home,
        round: 2
    }));
}
