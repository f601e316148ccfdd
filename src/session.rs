//! The frame loop around the round logic.
//!
//! A [`Session`] owns the collaborators that connect the game to the outside world: a
//! [`FrameSource`] delivering video frames, a [`PoseTracker`] finding a hand in them, an
//! [`InputSource`] for key presses, a [`Renderer`] presenting the result, and a [`Clock`]. None of
//! these are implemented here. A camera, a hand landmark model and a window are all supplied by the
//! application.

use std::time::Instant;

use crate::{
    filter::Ema,
    gesture::{Classifier, Gesture},
    hand::HandLandmarks,
    landmark::LandmarkFilter,
    layout::{layout, Language, TextLine},
    options::Options,
    round::{InputEvent, Opponent, RenderState, RoundStateMachine, ScoreBoard},
    timer::TickCounter,
};

/// A key pressed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Char(char),
    /// Any key without a meaning in this game.
    Other,
}

/// Delivers video frames, one per tick.
pub trait FrameSource {
    type Frame;

    /// Reads the next frame, blocking until one is available.
    ///
    /// `Ok(None)` means that no frame could be produced this time, but that the source is still
    /// usable. Both that and errors are retried by the [`Session`].
    fn read(&mut self) -> crate::Result<Option<Self::Frame>>;
}

/// Finds a hand in a frame and computes its landmarks.
///
/// If more than one hand is visible, only the first one should be returned.
pub trait PoseTracker<F> {
    fn track(&mut self, frame: &F) -> Option<HandLandmarks>;
}

impl<F, T: FnMut(&F) -> Option<HandLandmarks>> PoseTracker<F> for T {
    fn track(&mut self, frame: &F) -> Option<HandLandmarks> {
        self(frame)
    }
}

/// Non-blocking keyboard input.
pub trait InputSource {
    /// Returns the next key pressed since the last call, if any.
    fn poll(&mut self) -> Option<Key>;
}

impl<T: FnMut() -> Option<Key>> InputSource for T {
    fn poll(&mut self) -> Option<Key> {
        self()
    }
}

/// Presents a processed frame to the player.
pub trait Renderer<F> {
    /// Renders one tick.
    ///
    /// `lines` is the laid-out text for `state`, in the session's language. `hand` is the hand as
    /// it was classified, after optional mirroring and smoothing.
    fn render(
        &mut self,
        frame: F,
        state: &RenderState,
        lines: &[TextLine],
        hand: Option<&HandLandmarks>,
    ) -> crate::Result<()>;
}

/// A source of timestamps. Read exactly once per tick.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<T: Fn() -> Instant> Clock for T {
    fn now(&self) -> Instant {
        self()
    }
}

/// A [`Clock`] returning [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Runs the game loop: one tick per frame, until the player quits.
pub struct Session<S, T, I, R, C = SystemClock> {
    source: S,
    tracker: T,
    input: I,
    renderer: R,
    clock: C,
    machine: RoundStateMachine,
    classifier: Classifier,
    language: Language,
    mirror_landmarks: bool,
    smoothing: Option<f32>,
    filter: LandmarkFilter,
    max_frame_failures: Option<u32>,
    counter: TickCounter,
}

impl<S, T, I, R> Session<S, T, I, R>
where
    S: FrameSource,
    T: PoseTracker<S::Frame>,
    I: InputSource,
    R: Renderer<S::Frame>,
{
    /// Creates a session playing against a
    /// [`RandomOpponent`][crate::round::RandomOpponent], timed by the [`SystemClock`].
    pub fn new(options: Options, source: S, tracker: T, input: I, renderer: R) -> Self {
        log::debug!("creating session with {:?}", options);
        Self {
            source,
            tracker,
            input,
            renderer,
            clock: SystemClock,
            machine: RoundStateMachine::default().with_timings(options.timings),
            classifier: Classifier::new(options.thumb).max_tilt(options.max_tilt),
            language: options.language,
            mirror_landmarks: options.mirror_landmarks,
            smoothing: options.smoothing,
            filter: make_filter(options.smoothing),
            max_frame_failures: options.max_frame_failures,
            counter: TickCounter::new("session"),
        }
    }
}

impl<S, T, I, R, C> Session<S, T, I, R, C>
where
    S: FrameSource,
    T: PoseTracker<S::Frame>,
    I: InputSource,
    R: Renderer<S::Frame>,
    C: Clock,
{
    /// Replaces the clock that timestamps every tick.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Session<S, T, I, R, C2> {
        Session {
            source: self.source,
            tracker: self.tracker,
            input: self.input,
            renderer: self.renderer,
            clock,
            machine: self.machine,
            classifier: self.classifier,
            language: self.language,
            mirror_landmarks: self.mirror_landmarks,
            smoothing: self.smoothing,
            filter: self.filter,
            max_frame_failures: self.max_frame_failures,
            counter: self.counter,
        }
    }

    /// Replaces the computer opponent.
    ///
    /// This restarts the round state machine, so it should be called before the first tick.
    pub fn with_opponent<O: Opponent + 'static>(mut self, opponent: O) -> Self {
        let timings = *self.machine.timings();
        self.machine = RoundStateMachine::new(opponent).with_timings(timings);
        self
    }

    pub fn machine(&self) -> &RoundStateMachine {
        &self.machine
    }

    /// Runs a single tick and returns what was rendered.
    ///
    /// Fails if no frame could be read within the configured number of attempts, or if the
    /// renderer fails.
    pub fn step(&mut self) -> crate::Result<RenderState> {
        let frame = self.next_frame()?;

        let hand = self.track(&frame);
        let gesture: Option<Gesture> = hand.as_ref().map(|hand| self.classifier.classify(hand));
        let input = self.input.poll().and_then(InputEvent::from_key);
        let now = self.clock.now();

        let state = self.machine.tick(gesture, now, input);
        let lines = layout(&state, self.language);
        self.renderer.render(frame, &state, &lines, hand.as_ref())?;

        self.counter.tick();
        Ok(state)
    }

    /// Runs ticks until the player quits, and returns the final score.
    ///
    /// The tick processing the quit is still rendered.
    pub fn run(mut self) -> crate::Result<ScoreBoard> {
        while !self.step()?.terminated {}

        let score = self.machine.final_score();
        log::info!("final score: {score}");
        Ok(score)
    }

    fn next_frame(&mut self) -> crate::Result<S::Frame> {
        let mut failures = 0;
        loop {
            match self.source.read() {
                Ok(Some(frame)) => return Ok(frame),
                Ok(None) => log::warn!("no frame available, retrying"),
                Err(e) => log::warn!("failed to read frame, retrying: {e}"),
            }

            failures += 1;
            self.counter.retry();
            if let Some(max) = self.max_frame_failures {
                if failures >= max {
                    return Err(format!("no frame could be read in {failures} attempts").into());
                }
            }
        }
    }

    fn track(&mut self, frame: &S::Frame) -> Option<HandLandmarks> {
        let mut hand = match self.tracker.track(frame) {
            Some(hand) => hand,
            None => {
                // Don't blend a hand that reappears with where it was last seen.
                if self.smoothing.is_some() {
                    self.filter = make_filter(self.smoothing);
                }
                return None;
            }
        };

        if self.mirror_landmarks {
            hand.flip_horizontal();
        }
        self.filter.filter(hand.landmarks_mut());
        Some(hand)
    }
}

fn make_filter(smoothing: Option<f32>) -> LandmarkFilter {
    match smoothing {
        Some(alpha) => LandmarkFilter::new(Ema::new(alpha), HandLandmarks::NUM_LANDMARKS),
        None => LandmarkFilter::default(),
    }
}
