use crate::achievement::{self, Achievement};
use crate::checkout::{self, Checkout};
use crate::game::history::{Snapshot, UndoHistory};
use crate::model::config::GameConfig;
use crate::model::dart::Dart;
use crate::model::hit::{Hit, RawHit, classify};
use crate::model::player::{PlayerId, PlayerState};
use crate::model::turn::TurnState;
use crate::rules::{self, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnding {
    Completed,
    Bust,
    /// Button press or explicit end-turn; open slots were filled with misses.
    EndedEarly,
    Checkout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Intro,
    AwaitingThrow,
    /// Display window after a turn; throws are ignored until `Advance`.
    TurnResolving { ending: TurnEnding },
    GameOver { winner: PlayerId },
}

impl Phase {
    pub const fn name(&self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::AwaitingThrow => "awaiting_throw",
            Phase::TurnResolving { .. } => "turn_resolving",
            Phase::GameOver { .. } => "game_over",
        }
    }
}

/// External events fed to the engine, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum Input {
    Begin,
    Throw(RawHit),
    EndTurn,
    Advance,
    Undo,
    Rematch,
}

/// Events published for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notice {
    TurnChanged {
        player: PlayerId,
        round: u32,
    },
    DartRecorded {
        player: PlayerId,
        dart: String,
        verdict: Verdict,
        score: u32,
    },
    TurnEnded {
        player: PlayerId,
        darts: Vec<String>,
        turn_score: u32,
        ending: TurnEnding,
    },
    AchievementDetected {
        player: PlayerId,
        achievement: Achievement,
    },
    StatsFrozen {
        ppr: [f64; 2],
    },
    UndoApplied {
        player: PlayerId,
        remaining: u8,
    },
    GameOver {
        winner: PlayerId,
        final_scores: [u32; 2],
    },
}

/// Reasons an input was ignored. None of these stop a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    WrongPhase {
        input: &'static str,
        phase: &'static str,
    },
    DuplicateThrow(u64),
    TurnFull,
    NothingToUndo,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::WrongPhase { input, phase } => {
                write!(f, "{input} is not accepted during {phase}")
            }
            Refusal::DuplicateThrow(ts) => write!(f, "throw {ts} was already applied"),
            Refusal::TurnFull => write!(f, "turn already holds three darts"),
            Refusal::NothingToUndo => write!(f, "no undo available"),
        }
    }
}

impl std::error::Error for Refusal {}

#[derive(Debug, Clone)]
pub struct MatchState {
    config: GameConfig,
    starting_player: PlayerId,
    players: [PlayerState; 2],
    active: PlayerId,
    turn: TurnState,
    round: u32,
    turns_this_round: u8,
    phase: Phase,
    history: UndoHistory,
    seen: HashSet<u64>,
}

impl MatchState {
    pub fn new(config: GameConfig, starting_player: PlayerId) -> Self {
        Self {
            config,
            starting_player,
            players: [PlayerState::new(config.start_score); 2],
            active: starting_player,
            turn: TurnState::new(),
            round: 1,
            turns_this_round: 0,
            phase: Phase::Intro,
            history: UndoHistory::new(config.undo_limit),
            seen: HashSet::new(),
        }
    }

    pub(crate) fn from_parts(
        config: GameConfig,
        starting_player: PlayerId,
        snapshot: Snapshot,
        phase: Phase,
        undo_remaining: u8,
    ) -> Self {
        let mut state = Self::new(config, starting_player);
        state.restore(snapshot);
        state.phase = phase;
        state.history = UndoHistory::with_remaining(config.undo_limit, undo_remaining);
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn starting_player(&self) -> PlayerId {
        self.starting_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn players(&self) -> &[PlayerState; 2] {
        &self.players
    }

    pub fn scores(&self) -> [u32; 2] {
        [self.players[0].score, self.players[1].score]
    }

    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub(crate) fn turns_this_round(&self) -> u8 {
        self.turns_this_round
    }

    pub fn undo_remaining(&self) -> u8 {
        self.history.remaining()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn ppr(&self, id: PlayerId) -> f64 {
        self.player(id).ppr(self.config.start_score)
    }

    pub fn stats_frozen(&self) -> bool {
        self.players.iter().any(|p| p.frozen_ppr.is_some())
    }

    /// Finishing suggestion for the active player, if one exists right now.
    pub fn checkout_hint(&self) -> Option<Checkout> {
        if self.phase != Phase::AwaitingThrow {
            return None;
        }
        let player = self.player(self.active);
        if !player.has_started {
            return None;
        }
        checkout::suggest(
            player.score,
            self.turn.darts_remaining(),
            self.config.out_mode,
            self.config.split_bull,
        )
    }

    /// Applies one input, silently ignoring anything the engine refuses.
    pub fn handle(&mut self, input: Input) -> Vec<Notice> {
        let result = match input {
            Input::Begin => self.begin(),
            Input::Throw(raw) => self.throw(raw),
            Input::EndTurn => self.end_turn(),
            Input::Advance => self.advance(),
            Input::Undo => self.undo(),
            Input::Rematch => Ok(self.rematch()),
        };
        result.unwrap_or_else(|refusal| {
            event!(Level::DEBUG, %refusal, ?input, "input ignored");
            Vec::new()
        })
    }

    pub fn begin(&mut self) -> Result<Vec<Notice>, Refusal> {
        self.expect_phase("begin", matches!(self.phase, Phase::Intro))?;
        self.phase = Phase::AwaitingThrow;
        Ok(vec![Notice::TurnChanged {
            player: self.active,
            round: self.round,
        }])
    }

    pub fn throw(&mut self, raw: RawHit) -> Result<Vec<Notice>, Refusal> {
        self.expect_phase("throw", matches!(self.phase, Phase::AwaitingThrow))?;
        if self.turn.is_complete() {
            return Err(Refusal::TurnFull);
        }
        if !self.seen.insert(raw.timestamp) {
            return Err(Refusal::DuplicateThrow(raw.timestamp));
        }

        match classify(&raw) {
            Hit::Button => Ok(self.close_turn_early()),
            Hit::Dart(dart) => Ok(self.apply_dart(dart)),
        }
    }

    /// Explicit end-turn action: remaining darts become misses.
    pub fn end_turn(&mut self) -> Result<Vec<Notice>, Refusal> {
        self.expect_phase("end_turn", matches!(self.phase, Phase::AwaitingThrow))?;
        Ok(self.close_turn_early())
    }

    /// Leaves the turn-resolution window and hands control over.
    pub fn advance(&mut self) -> Result<Vec<Notice>, Refusal> {
        self.expect_phase(
            "advance",
            matches!(self.phase, Phase::TurnResolving { .. }),
        )?;

        self.turns_this_round += 1;
        if self.turns_this_round >= 2 {
            self.round += 1;
            self.turns_this_round = 0;
        }
        self.active = self.active.other();
        self.turn = TurnState::new();
        self.phase = Phase::AwaitingThrow;

        Ok(vec![Notice::TurnChanged {
            player: self.active,
            round: self.round,
        }])
    }

    pub fn undo(&mut self) -> Result<Vec<Notice>, Refusal> {
        self.expect_phase(
            "undo",
            matches!(
                self.phase,
                Phase::AwaitingThrow | Phase::TurnResolving { .. }
            ),
        )?;
        let snapshot = self.history.undo().ok_or(Refusal::NothingToUndo)?;

        let previous = self.active;
        self.restore(snapshot);
        self.phase = Phase::AwaitingThrow;

        let remaining = self.history.remaining();
        event!(
            Level::INFO,
            player = %self.active,
            remaining,
            score = self.player(self.active).score,
            "undo applied"
        );

        let mut notices = vec![Notice::UndoApplied {
            player: self.active,
            remaining,
        }];
        if previous != self.active {
            notices.push(Notice::TurnChanged {
                player: self.active,
                round: self.round,
            });
        }
        Ok(notices)
    }

    /// Resets every piece of match state back to the intro.
    pub fn rematch(&mut self) -> Vec<Notice> {
        *self = MatchState::new(self.config, self.starting_player);
        Vec::new()
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            players: self.players,
            active: self.active,
            turn: self.turn.clone(),
            round: self.round,
            turns_this_round: self.turns_this_round,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.players = snapshot.players;
        self.active = snapshot.active;
        self.turn = snapshot.turn;
        self.round = snapshot.round;
        self.turns_this_round = snapshot.turns_this_round;
    }

    fn expect_phase(&self, input: &'static str, ok: bool) -> Result<(), Refusal> {
        if ok {
            Ok(())
        } else {
            Err(Refusal::WrongPhase {
                input,
                phase: self.phase.name(),
            })
        }
    }

    fn apply_dart(&mut self, dart: Dart) -> Vec<Notice> {
        let snapshot = self.snapshot();
        let player_id = self.active;
        let outcome = rules::apply(dart, self.player(player_id), &self.config);

        if self.turn.record(dart, outcome.effective_score).is_err() {
            return Vec::new();
        }
        self.history.push(snapshot);

        let player = &mut self.players[player_id.index()];
        player.darts_thrown += 1;
        if outcome.starts_player {
            player.has_started = true;
        }
        player.score -= outcome.effective_score;
        let score = player.score;

        let mut notices = vec![Notice::DartRecorded {
            player: player_id,
            dart: dart.label(),
            verdict: outcome.verdict,
            score,
        }];

        match outcome.verdict {
            Verdict::Bust(reason) => {
                event!(Level::INFO, player = %player_id, %dart, ?reason, score, "bust");
                self.turn.mark_bust();
                notices.extend(self.finish_turn(TurnEnding::Bust));
            }
            Verdict::Checkout => {
                notices.extend(self.freeze_stats_if_due());
                notices.extend(self.finish_match());
            }
            Verdict::Scored | Verdict::NotIn => {
                notices.extend(self.freeze_stats_if_due());
                if self.turn.is_complete() {
                    notices.extend(self.finish_turn(TurnEnding::Completed));
                }
            }
        }
        notices
    }

    fn close_turn_early(&mut self) -> Vec<Notice> {
        self.history.push(self.snapshot());
        let filled = self.turn.fill_misses();
        self.players[self.active.index()].darts_thrown += filled as u32;
        self.finish_turn(TurnEnding::EndedEarly)
    }

    fn finish_turn(&mut self, ending: TurnEnding) -> Vec<Notice> {
        let player = self.active;
        let turn_score = self.turn.round_score();
        let achievement =
            achievement::classify(self.turn.darts(), turn_score, self.turn.busted(), false);
        self.phase = Phase::TurnResolving { ending };
        self.turn_notices(player, turn_score, ending, achievement)
    }

    fn finish_match(&mut self) -> Vec<Notice> {
        let winner = self.active;
        let turn_score = self.turn.round_score();
        let achievement = achievement::classify(self.turn.darts(), turn_score, false, true);
        self.phase = Phase::GameOver { winner };

        event!(
            Level::INFO,
            %winner,
            round = self.round,
            darts = self.player(winner).darts_thrown,
            "checkout"
        );

        let mut notices = self.turn_notices(winner, turn_score, TurnEnding::Checkout, achievement);
        notices.push(Notice::GameOver {
            winner,
            final_scores: self.scores(),
        });
        notices
    }

    fn turn_notices(
        &self,
        player: PlayerId,
        turn_score: u32,
        ending: TurnEnding,
        achievement: Option<Achievement>,
    ) -> Vec<Notice> {
        if tracing::enabled!(Level::DEBUG) {
            let darts: Vec<String> = self.turn.darts().iter().map(|d| d.label()).collect();
            event!(
                Level::DEBUG,
                %player,
                darts = %darts.join(" "),
                turn_score,
                ?ending,
                ?achievement,
                "turn finished"
            );
        }

        let mut notices = vec![Notice::TurnEnded {
            player,
            darts: self.turn.darts().iter().map(|d| d.label()).collect(),
            turn_score,
            ending,
        }];
        if let Some(achievement) = achievement {
            notices.push(Notice::AchievementDetected {
                player,
                achievement,
            });
        }
        notices
    }

    fn freeze_stats_if_due(&mut self) -> Option<Notice> {
        if self.stats_frozen() {
            return None;
        }
        let threshold = self.config.freeze_threshold();
        if !self.players.iter().any(|p| p.score <= threshold) {
            return None;
        }

        let start = self.config.start_score;
        for player in &mut self.players {
            player.freeze_ppr(start);
        }
        let ppr = [self.ppr(PlayerId::Home), self.ppr(PlayerId::Away)];
        event!(Level::INFO, home = ppr[0], away = ppr[1], "scoring rate frozen");
        Some(Notice::StatsFrozen { ppr })
    }
}

/// Reducer form of [`MatchState::handle`].
pub fn reduce(mut state: MatchState, input: Input) -> (MatchState, Vec<Notice>) {
    let notices = state.handle(input);
    (state, notices)
}
