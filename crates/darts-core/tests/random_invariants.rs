use darts_core::game::match_state::{Input, MatchState, Phase};
use darts_core::model::config::{CheckMode, GameConfig};
use darts_core::model::hit::{RawHit, SegmentKind};
use darts_core::model::player::PlayerId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const KINDS: [SegmentKind; 9] = [
    SegmentKind::SingleInner,
    SegmentKind::SingleOuter,
    SegmentKind::Triple,
    SegmentKind::Double,
    SegmentKind::Bull,
    SegmentKind::DoubleBull,
    SegmentKind::Miss,
    SegmentKind::Button,
    SegmentKind::Unknown,
];

fn random_input(rng: &mut StdRng, clock: &mut u64) -> Input {
    match rng.gen_range(0..20) {
        0 => Input::Undo,
        1 => Input::EndTurn,
        2..=4 => Input::Advance,
        5 => {
            // Re-deliver a recent timestamp.
            Input::Throw(RawHit::new(SegmentKind::Triple, 20, 3, clock.saturating_sub(1)))
        }
        _ => {
            *clock += 1;
            let kind = KINDS[rng.gen_range(0..KINDS.len())];
            let base = rng.gen_range(0..=26);
            Input::Throw(RawHit::new(kind, base, rng.gen_range(0..=3), *clock))
        }
    }
}

#[test]
fn random_sequences_preserve_scoring_invariants() {
    let mut rng = StdRng::seed_from_u64(20261017);

    for game in 0..200 {
        let in_mode = CheckMode::ALL[game % 3];
        let out_mode = CheckMode::ALL[(game / 3) % 3];
        let start = if game % 2 == 0 { 301 } else { 501 };
        let config = GameConfig::new(start, in_mode, out_mode).with_split_bull(game % 5 == 0);
        let mut state = MatchState::new(config, PlayerId::BOTH[game % 2]);
        state.handle(Input::Begin);

        let mut clock = 0u64;
        for _ in 0..600 {
            let input = random_input(&mut rng, &mut clock);
            let before_darts: u32 = state.players().iter().map(|p| p.darts_thrown).sum();
            let before_phase = state.phase();
            state.handle(input);

            for player in state.players() {
                assert!(player.score <= start);
                assert_ne!(player.score, 1, "a score of one is never accepted");
            }
            assert!(state.turn().darts().len() <= 3);
            assert!(state.undo_remaining() <= config.undo_limit);

            let after_darts: u32 = state.players().iter().map(|p| p.darts_thrown).sum();
            if before_phase != Phase::AwaitingThrow {
                assert!(after_darts <= before_darts, "no darts outside awaiting_throw");
            }

            if let Phase::GameOver { winner } = state.phase() {
                assert_eq!(state.player(winner).score, 0);
                assert_ne!(state.player(winner.other()).score, 0);
                break;
            }
        }
    }
}

#[test]
fn checkout_hint_always_describes_a_legal_finish() {
    let mut rng = StdRng::seed_from_u64(7);

    for game in 0..100 {
        let out_mode = CheckMode::ALL[game % 3];
        let config = GameConfig::new(301, CheckMode::Open, out_mode);
        let mut state = MatchState::new(config, PlayerId::Home);
        state.handle(Input::Begin);

        let mut clock = 0u64;
        for _ in 0..400 {
            if let Some(hint) = state.checkout_hint() {
                let player = state.player(state.active_player());
                let total: u32 = hint.darts().iter().map(|d| d.score()).sum();
                assert_eq!(total, player.score);
                assert!(hint.len() <= state.turn().darts_remaining());
                assert!(out_mode.accepts(*hint.darts().last().unwrap()));
            }
            let input = random_input(&mut rng, &mut clock);
            state.handle(input);
            if state.winner().is_some() {
                break;
            }
        }
    }
}
