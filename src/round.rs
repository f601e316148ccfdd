//! Timed rounds against the computer.
//!
//! [`RoundStateMachine`] is driven once per video frame by [`RoundStateMachine::tick`]. Every tick
//! gets the gesture currently shown, the time at which the frame was processed, and the input
//! event of that frame, if any. All countdown timing is derived from these timestamps, so the
//! machine behaves the same no matter how irregularly frames arrive.
//!
//! ```text
//!          Start                 elapsed >= capture
//!   Idle ---------> Countdown ----------------------> Result
//!                      ^                                |
//!                      +------------- Start ------------+
//! ```

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::{gesture::Gesture, session::Key};

/// Control events produced by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Starts a new round. Ignored while a countdown is running.
    Start,
    /// Ends the session. Accepted in every state.
    Quit,
}

impl InputEvent {
    /// Maps a key press to an event: space starts a round, `q` quits, all other keys are ignored.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Space => Some(InputEvent::Start),
            Key::Char('q') => Some(InputEvent::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Waiting for the player to start the first round.
    Idle,
    Countdown,
    /// Showing the result of the last round until the next one is started.
    Result,
}

/// What the countdown currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Three,
    Two,
    One,
    /// The player should show their gesture now.
    Show,
}

impl CountdownPhase {
    /// Returns the phase `elapsed` time after the countdown started.
    ///
    /// Every phase covers a closed-open interval. Returns [`None`] once the capture instant
    /// ([`Timings::capture_at`]) is reached.
    pub fn at(elapsed: Duration, timings: &Timings) -> Option<Self> {
        let step = timings.step;
        if elapsed < step {
            Some(CountdownPhase::Three)
        } else if elapsed < step * 2 {
            Some(CountdownPhase::Two)
        } else if elapsed < step * 3 {
            Some(CountdownPhase::One)
        } else if elapsed < timings.capture_at() {
            Some(CountdownPhase::Show)
        } else {
            None
        }
    }
}

/// Durations of the countdown phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long each of the numbers "3", "2" and "1" is shown.
    pub step: Duration,
    /// How long the "show" cue is displayed before the gesture is captured.
    pub show: Duration,
}

impl Timings {
    /// Time from the start of the countdown until the player's gesture is captured.
    pub fn capture_at(&self) -> Duration {
        self.step * 3 + self.show
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            step: Duration::from_secs(1),
            show: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PlayerWin,
    ComputerWin,
    Draw,
    /// No gesture was recognized when the round was captured. Nobody scores.
    NoGesture,
}

impl Outcome {
    /// Decides a round.
    ///
    /// If either side did not play one of the [`Gesture::PLAYABLE`] gestures, the result is
    /// [`Outcome::NoGesture`].
    pub fn decide(player: Option<Gesture>, computer: Gesture) -> Self {
        match player {
            Some(player) if player.is_playable() && computer.is_playable() => {
                if player == computer {
                    Outcome::Draw
                } else if player.beats(computer) {
                    Outcome::PlayerWin
                } else {
                    Outcome::ComputerWin
                }
            }
            _ => Outcome::NoGesture,
        }
    }
}

/// Running score of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    pub player: u32,
    pub computer: u32,
}

impl ScoreBoard {
    /// Credits the winner of a round, if there is one.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWin => self.player += 1,
            Outcome::ComputerWin => self.computer += 1,
            Outcome::Draw | Outcome::NoGesture => {}
        }
    }
}

impl fmt::Display for ScoreBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {} - {} computer", self.player, self.computer)
    }
}

/// The choices and outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRecord {
    /// The gesture shown at the capture instant. [`None`] if no hand was visible at all.
    pub player_choice: Option<Gesture>,
    pub computer_choice: Gesture,
    pub outcome: Outcome,
}

/// The computer's side of the game.
pub trait Opponent {
    /// Picks one of the [`Gesture::PLAYABLE`] gestures for the next round.
    fn choose(&mut self) -> Gesture;
}

impl<F: FnMut() -> Gesture> Opponent for F {
    fn choose(&mut self) -> Gesture {
        self()
    }
}

/// An [`Opponent`] that picks uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomOpponent {
    rng: fastrand::Rng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Creates an opponent with a fixed seed, producing a reproducible sequence of choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn choose(&mut self) -> Gesture {
        Gesture::PLAYABLE[self.rng.usize(..Gesture::PLAYABLE.len())]
    }
}

/// What to show on screen after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Idle,
    Countdown(CountdownPhase),
    Result(RoundRecord),
}

/// Declarative description of the screen, returned by [`RoundStateMachine::tick`].
///
/// This carries no layout or styling; see [`crate::layout`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub scene: Scene,
    pub scores: ScoreBoard,
    /// The playable gesture currently recognized, if any, for a live preview.
    pub live_gesture: Option<Gesture>,
    /// Set once a [`InputEvent::Quit`] has been processed.
    pub terminated: bool,
}

/// Runs rounds of rock, paper, scissors and keeps score.
pub struct RoundStateMachine {
    opponent: Box<dyn Opponent>,
    timings: Timings,
    stage: Stage,
    scores: ScoreBoard,
    terminated: bool,
}

/// [`RoundState`] plus the data that is only valid in that state.
#[derive(Debug, Clone, Copy)]
enum Stage {
    Idle,
    Countdown { start: Instant },
    Result { start: Instant, record: RoundRecord },
}

impl Default for RoundStateMachine {
    fn default() -> Self {
        Self::new(RandomOpponent::new())
    }
}

impl RoundStateMachine {
    /// Creates a state machine in [`RoundState::Idle`], playing against `opponent`.
    pub fn new<O: Opponent + 'static>(opponent: O) -> Self {
        Self {
            opponent: Box::new(opponent),
            timings: Timings::default(),
            stage: Stage::Idle,
            scores: ScoreBoard::default(),
            terminated: false,
        }
    }

    /// Replaces the countdown [`Timings`].
    ///
    /// A countdown that is already running will use the new timings from the next tick on.
    pub fn set_timings(&mut self, timings: Timings) {
        self.timings = timings;
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.set_timings(timings);
        self
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn state(&self) -> RoundState {
        match self.stage {
            Stage::Idle => RoundState::Idle,
            Stage::Countdown { .. } => RoundState::Countdown,
            Stage::Result { .. } => RoundState::Result,
        }
    }

    /// Returns the record of the last finished round.
    ///
    /// This is cleared whenever a new countdown starts, so it is only available in
    /// [`RoundState::Result`].
    pub fn record(&self) -> Option<&RoundRecord> {
        match &self.stage {
            Stage::Result { record, .. } => Some(record),
            _ => None,
        }
    }

    /// Returns when the running countdown was started.
    pub fn countdown_start(&self) -> Option<Instant> {
        match self.stage {
            Stage::Countdown { start } => Some(start),
            _ => None,
        }
    }

    /// Returns when the displayed round result was captured.
    pub fn result_start(&self) -> Option<Instant> {
        match self.stage {
            Stage::Result { start, .. } => Some(start),
            _ => None,
        }
    }

    /// Returns the current score. This can be called at any time, including after termination.
    pub fn final_score(&self) -> ScoreBoard {
        self.scores
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Advances the machine by one frame.
    ///
    /// - `gesture` is the gesture recognized in this frame, or [`None`] if no hand was found.
    /// - `now` is the time the frame is processed at. It must not go backwards between ticks.
    /// - `input` is the control event received during this frame, if any.
    ///
    /// A [`InputEvent::Start`] is applied first, so a new countdown shows "3" in the same tick.
    /// A running countdown is then advanced to `now`, capturing the round once its capture instant
    /// is reached. A [`InputEvent::Quit`] terminates the machine last, so a round that is due in
    /// this tick is still scored. Every tick after termination only repeats the final screen.
    pub fn tick(
        &mut self,
        gesture: Option<Gesture>,
        now: Instant,
        input: Option<InputEvent>,
    ) -> RenderState {
        if self.terminated {
            return self.render(gesture, now);
        }

        if input == Some(InputEvent::Start) {
            match self.stage {
                Stage::Idle | Stage::Result { .. } => self.start_countdown(now),
                Stage::Countdown { .. } => log::trace!("ignoring start during countdown"),
            }
        }

        if let Stage::Countdown { start } = self.stage {
            if self.phase_since(start, now).is_none() {
                self.capture(gesture, now);
            }
        }

        if input == Some(InputEvent::Quit) {
            log::debug!("quit in {:?}, final score: {}", self.state(), self.scores);
            self.terminated = true;
        }

        self.render(gesture, now)
    }

    fn start_countdown(&mut self, now: Instant) {
        log::debug!("{:?} -> Countdown", self.state());
        self.stage = Stage::Countdown { start: now };
    }

    fn capture(&mut self, gesture: Option<Gesture>, now: Instant) {
        let computer_choice = self.opponent.choose();
        if !computer_choice.is_playable() {
            log::warn!("opponent chose {computer_choice}, which can't be played");
        }

        let outcome = Outcome::decide(gesture, computer_choice);
        self.scores.record(outcome);

        log::info!(
            "player: {}, computer: {computer_choice} => {outcome:?} ({})",
            gesture.map_or("no hand".to_string(), |g| g.to_string()),
            self.scores,
        );

        self.stage = Stage::Result {
            start: now,
            record: RoundRecord {
                player_choice: gesture,
                computer_choice,
                outcome,
            },
        };
    }

    fn phase_since(&self, start: Instant, now: Instant) -> Option<CountdownPhase> {
        CountdownPhase::at(now.saturating_duration_since(start), &self.timings)
    }

    fn render(&self, gesture: Option<Gesture>, now: Instant) -> RenderState {
        let scene = match self.stage {
            Stage::Idle => Scene::Idle,
            // Past the capture instant, this is only reachable after termination froze the
            // countdown.
            Stage::Countdown { start } => Scene::Countdown(
                self.phase_since(start, now)
                    .unwrap_or(CountdownPhase::Show),
            ),
            Stage::Result { record, .. } => Scene::Result(record),
        };

        RenderState {
            scene,
            scores: self.scores,
            live_gesture: gesture.filter(|g| g.is_playable()),
            terminated: self.terminated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn always(gesture: Gesture) -> impl FnMut() -> Gesture {
        move || gesture
    }

    /// Starts a countdown at `t0` and returns the machine.
    fn counting(opponent: Gesture, t0: Instant) -> RoundStateMachine {
        let mut machine = RoundStateMachine::new(always(opponent));
        machine.tick(None, t0, Some(InputEvent::Start));
        assert_eq!(machine.state(), RoundState::Countdown);
        machine
    }

    #[test]
    fn outcome_rule() {
        use Gesture::*;
        assert_eq!(Outcome::decide(Some(Rock), Scissors), Outcome::PlayerWin);
        assert_eq!(Outcome::decide(Some(Scissors), Paper), Outcome::PlayerWin);
        assert_eq!(Outcome::decide(Some(Paper), Rock), Outcome::PlayerWin);
        assert_eq!(Outcome::decide(Some(Scissors), Rock), Outcome::ComputerWin);
        assert_eq!(Outcome::decide(Some(Paper), Scissors), Outcome::ComputerWin);
        assert_eq!(Outcome::decide(Some(Rock), Paper), Outcome::ComputerWin);
        assert_eq!(Outcome::decide(None, Rock), Outcome::NoGesture);
        assert_eq!(Outcome::decide(Some(Unknown), Paper), Outcome::NoGesture);
        assert_eq!(Outcome::decide(Some(Rock), Unknown), Outcome::NoGesture);
    }

    #[test]
    fn outcome_is_antisymmetric() {
        for a in Gesture::PLAYABLE {
            for b in Gesture::PLAYABLE {
                let ab = Outcome::decide(Some(a), b);
                let ba = Outcome::decide(Some(b), a);
                if a == b {
                    assert_eq!(ab, Outcome::Draw);
                } else {
                    assert_eq!(ab == Outcome::PlayerWin, ba == Outcome::ComputerWin);
                    assert_ne!(ab, Outcome::Draw);
                }
            }
        }
    }

    #[test]
    fn phase_boundaries() {
        let timings = Timings::default();
        let cases = [
            (0, Some(CountdownPhase::Three)),
            (999, Some(CountdownPhase::Three)),
            (1000, Some(CountdownPhase::Two)),
            (1999, Some(CountdownPhase::Two)),
            (2000, Some(CountdownPhase::One)),
            (2999, Some(CountdownPhase::One)),
            (3000, Some(CountdownPhase::Show)),
            (3499, Some(CountdownPhase::Show)),
            (3500, None),
            (60_000, None),
        ];
        for (elapsed, phase) in cases {
            assert_eq!(CountdownPhase::at(ms(elapsed), &timings), phase, "{elapsed}ms");
        }
    }

    #[test]
    fn countdown_renders_phases_until_capture() {
        let t0 = Instant::now();
        let mut machine = counting(Gesture::Rock, t0);

        for (elapsed, phase) in [
            (0, CountdownPhase::Three),
            (1000, CountdownPhase::Two),
            (2999, CountdownPhase::One),
            (3499, CountdownPhase::Show),
        ] {
            let render = machine.tick(Some(Gesture::Paper), t0 + ms(elapsed), None);
            assert_eq!(render.scene, Scene::Countdown(phase), "{elapsed}ms");
            assert_eq!(machine.record(), None);
        }

        let render = machine.tick(Some(Gesture::Paper), t0 + ms(3500), None);
        assert_eq!(machine.state(), RoundState::Result);
        assert_eq!(machine.result_start(), Some(t0 + ms(3500)));
        assert!(matches!(render.scene, Scene::Result(_)));
    }

    #[test]
    fn scenario_player_wins() {
        let t0 = Instant::now();
        let mut machine = RoundStateMachine::new(always(Gesture::Scissors));
        assert_eq!(machine.state(), RoundState::Idle);

        let render = machine.tick(None, t0, Some(InputEvent::Start));
        assert_eq!(machine.state(), RoundState::Countdown);
        assert_eq!(machine.countdown_start(), Some(t0));
        assert_eq!(render.scene, Scene::Countdown(CountdownPhase::Three));

        let render = machine.tick(Some(Gesture::Rock), t0 + ms(3600), None);
        assert_eq!(machine.state(), RoundState::Result);
        let expected = RoundRecord {
            player_choice: Some(Gesture::Rock),
            computer_choice: Gesture::Scissors,
            outcome: Outcome::PlayerWin,
        };
        assert_eq!(render.scene, Scene::Result(expected));
        assert_eq!(machine.record(), Some(&expected));
        assert_eq!(
            machine.final_score(),
            ScoreBoard {
                player: 1,
                computer: 0
            }
        );
    }

    #[test]
    fn restart_from_result_keeps_scores() {
        let t0 = Instant::now();
        let mut machine = counting(Gesture::Scissors, t0);
        machine.tick(Some(Gesture::Rock), t0 + ms(3600), None);
        assert_eq!(machine.final_score(), ScoreBoard { player: 1, computer: 0 });

        // The result stays up for as long as nobody presses start.
        let render = machine.tick(None, t0 + ms(60_000), None);
        assert!(matches!(render.scene, Scene::Result(_)));

        let t1 = t0 + ms(61_000);
        let render = machine.tick(None, t1, Some(InputEvent::Start));
        assert_eq!(machine.state(), RoundState::Countdown);
        assert_eq!(machine.countdown_start(), Some(t1));
        assert_eq!(machine.record(), None);
        assert_eq!(render.scores, ScoreBoard { player: 1, computer: 0 });
    }

    #[test]
    fn no_gesture_scores_nothing() {
        for gesture in [None, Some(Gesture::Unknown)] {
            let t0 = Instant::now();
            let mut machine = counting(Gesture::Paper, t0);
            let render = machine.tick(gesture, t0 + ms(3500), None);

            assert_eq!(machine.state(), RoundState::Result);
            match render.scene {
                Scene::Result(record) => {
                    assert_eq!(record.outcome, Outcome::NoGesture);
                    assert_eq!(record.player_choice, gesture);
                    assert_eq!(record.computer_choice, Gesture::Paper);
                }
                scene => panic!("unexpected scene {scene:?}"),
            }
            assert_eq!(machine.final_score(), ScoreBoard::default());
        }
    }

    #[test]
    fn scores_move_by_one() {
        let cases = [
            (Gesture::Rock, Gesture::Scissors, ScoreBoard { player: 1, computer: 0 }),
            (Gesture::Rock, Gesture::Paper, ScoreBoard { player: 0, computer: 1 }),
            (Gesture::Rock, Gesture::Rock, ScoreBoard { player: 0, computer: 0 }),
        ];
        for (player, computer, expected) in cases {
            let t0 = Instant::now();
            let mut machine = counting(computer, t0);
            machine.tick(Some(player), t0 + ms(4000), None);
            assert_eq!(machine.final_score(), expected, "{player} vs {computer}");
        }
    }

    #[test]
    fn start_is_ignored_during_countdown() {
        let t0 = Instant::now();
        let mut machine = counting(Gesture::Rock, t0);
        machine.tick(None, t0 + ms(2500), Some(InputEvent::Start));
        assert_eq!(machine.countdown_start(), Some(t0));

        let render = machine.tick(None, t0 + ms(3000), None);
        assert_eq!(render.scene, Scene::Countdown(CountdownPhase::Show));
    }

    #[test]
    fn stalled_ticks_capture_on_next_frame() {
        let t0 = Instant::now();
        let mut machine = counting(Gesture::Paper, t0);
        // No frames for ten seconds: the next tick goes straight to the result.
        let render = machine.tick(Some(Gesture::Scissors), t0 + ms(10_000), None);
        assert_eq!(
            render.scene,
            Scene::Result(RoundRecord {
                player_choice: Some(Gesture::Scissors),
                computer_choice: Gesture::Paper,
                outcome: Outcome::PlayerWin,
            })
        );
    }

    #[test]
    fn live_gesture_only_reports_playable() {
        let mut machine = RoundStateMachine::new(always(Gesture::Rock));
        let now = Instant::now();
        assert_eq!(
            machine.tick(Some(Gesture::Paper), now, None).live_gesture,
            Some(Gesture::Paper)
        );
        assert_eq!(machine.tick(Some(Gesture::Unknown), now, None).live_gesture, None);
        assert_eq!(machine.tick(None, now, None).live_gesture, None);
    }

    #[test]
    fn quit_freezes_everything() {
        let t0 = Instant::now();
        let mut machine = counting(Gesture::Scissors, t0);
        let render = machine.tick(Some(Gesture::Rock), t0 + ms(1000), Some(InputEvent::Quit));
        assert!(render.terminated);
        assert!(machine.is_terminated());
        assert_eq!(render.scene, Scene::Countdown(CountdownPhase::Two));

        // The capture instant passes, but nothing is captured any more.
        let render = machine.tick(Some(Gesture::Rock), t0 + ms(5000), Some(InputEvent::Start));
        assert_eq!(machine.state(), RoundState::Countdown);
        assert_eq!(render.scene, Scene::Countdown(CountdownPhase::Show));
        assert_eq!(machine.final_score(), ScoreBoard::default());
    }

    #[test]
    fn quit_on_capture_tick_still_scores() {
        let t0 = Instant::now();
        let mut machine = counting(Gesture::Scissors, t0);
        let render = machine.tick(Some(Gesture::Rock), t0 + ms(3600), Some(InputEvent::Quit));
        assert!(render.terminated);
        assert_eq!(
            render.scene,
            Scene::Result(RoundRecord {
                player_choice: Some(Gesture::Rock),
                computer_choice: Gesture::Scissors,
                outcome: Outcome::PlayerWin,
            })
        );
        assert_eq!(machine.final_score(), ScoreBoard { player: 1, computer: 0 });

        // Later ticks neither restart nor score again.
        let render = machine.tick(Some(Gesture::Paper), t0 + ms(9000), Some(InputEvent::Start));
        assert_eq!(machine.state(), RoundState::Result);
        assert_eq!(render.scores, ScoreBoard { player: 1, computer: 0 });
    }

    #[test]
    fn quit_in_idle_and_result() {
        let now = Instant::now();
        let mut machine = RoundStateMachine::new(always(Gesture::Rock));
        assert!(machine.tick(None, now, Some(InputEvent::Quit)).terminated);

        let mut machine = counting(Gesture::Rock, now);
        machine.tick(Some(Gesture::Paper), now + ms(3500), None);
        let render = machine.tick(None, now + ms(4000), Some(InputEvent::Quit));
        assert!(render.terminated);
        assert_eq!(machine.final_score(), ScoreBoard { player: 1, computer: 0 });
    }

    #[test]
    fn custom_timings() {
        let t0 = Instant::now();
        let timings = Timings {
            step: ms(100),
            show: ms(50),
        };
        let mut machine = RoundStateMachine::new(always(Gesture::Rock)).with_timings(timings);
        machine.tick(None, t0, Some(InputEvent::Start));
        assert_eq!(
            machine.tick(None, t0 + ms(320), None).scene,
            Scene::Countdown(CountdownPhase::Show)
        );
        machine.tick(None, t0 + ms(350), None);
        assert_eq!(machine.state(), RoundState::Result);
    }

    #[test]
    fn random_opponent_plays_everything() {
        let mut opponent = RandomOpponent::with_seed(7);
        let picks: Vec<_> = (0..200).map(|_| opponent.choose()).collect();
        for gesture in Gesture::PLAYABLE {
            assert!(picks.contains(&gesture), "{gesture} never picked");
        }
        assert!(!picks.contains(&Gesture::Unknown));
    }

    #[test]
    fn key_mapping() {
        assert_eq!(InputEvent::from_key(Key::Space), Some(InputEvent::Start));
        assert_eq!(InputEvent::from_key(Key::Char('q')), Some(InputEvent::Quit));
        assert_eq!(InputEvent::from_key(Key::Char('x')), None);
        assert_eq!(InputEvent::from_key(Key::Other), None);
    }
}
