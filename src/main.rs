//! Terminal-driven demo of the game loop.
//!
//! There is no camera or landmark model here: frames are blank and the "tracked" hand is
//! synthesized from the gesture last typed on stdin. Type a line and press enter:
//!
//! - (empty line): start a round
//! - `r`, `p`, `s`: hold up rock, paper or scissors
//! - `n`: take the hand out of the frame
//! - `q`: quit

use std::{
    cell::Cell,
    env, io,
    path::PathBuf,
    rc::Rc,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use shifumi::{
    draw::Canvas,
    hand::{pose::HandPose, HandLandmarks},
    layout::TextLine,
    options::Options,
    round::{RenderState, Scene},
    session::{FrameSource, InputSource, Key, Renderer, Session},
};

const ENV_VAR_SNAPSHOT: &str = "SHIFUMI_SNAPSHOT";

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

fn main() -> anyhow::Result<()> {
    shifumi::init_logger!();

    let options = Options::from_env();
    let snapshot = env::var_os(ENV_VAR_SNAPSHOT).map(PathBuf::from);

    let held = Rc::new(Cell::new(None::<HandPose>));
    let tracker = {
        let held = held.clone();
        move |_: &Canvas| held.get().map(|pose| pose.landmarks())
    };
    let keyboard = Keyboard {
        keys: spawn_stdin_reader()?,
        held,
    };

    println!("enter: play, r/p/s: show rock/paper/scissors, n: no hand, q: quit");

    let session = Session::new(
        options,
        BlankFrames::new(FRAME_INTERVAL),
        tracker,
        keyboard,
        TerminalRenderer {
            last_scene: None,
            snapshot,
        },
    );
    let score = session.run().map_err(|e| anyhow::anyhow!(e))?;

    println!("final score: {score}");
    Ok(())
}

/// Produces black frames at a fixed rate.
struct BlankFrames {
    interval: Duration,
    next: Instant,
}

impl BlankFrames {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
        }
    }
}

impl FrameSource for BlankFrames {
    type Frame = Canvas;

    fn read(&mut self) -> shifumi::Result<Option<Canvas>> {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        }
        self.next = self.next.max(now) + self.interval;
        Ok(Some(Canvas::new(WIDTH, HEIGHT)))
    }
}

/// Reads lines from stdin on a background thread.
///
/// When stdin is closed, a `q` is sent so the game ends.
fn spawn_stdin_reader() -> io::Result<Receiver<Key>> {
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::error!("failed to read stdin: {e}");
                        break;
                    }
                };
                let key = match line.trim().chars().next() {
                    None | Some(' ') => Key::Space,
                    Some(c) => Key::Char(c.to_ascii_lowercase()),
                };
                if sender.send(key).is_err() {
                    return;
                }
            }
            sender.send(Key::Char('q')).ok();
        })?;
    Ok(receiver)
}

struct Keyboard {
    keys: Receiver<Key>,
    held: Rc<Cell<Option<HandPose>>>,
}

impl InputSource for Keyboard {
    fn poll(&mut self) -> Option<Key> {
        let key = match self.keys.try_recv() {
            Ok(key) => key,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => return Some(Key::Char('q')),
        };

        let pose = match key {
            Key::Char('r') => HandPose::rock(),
            Key::Char('p') => HandPose::paper(),
            Key::Char('s') => HandPose::scissors(),
            Key::Char('n') => {
                self.held.set(None);
                return Some(key);
            }
            _ => return Some(key),
        };
        self.held.set(Some(pose.at(0.5, 0.55)));
        Some(key)
    }
}

/// Draws every frame and prints the text whenever the scene changes.
struct TerminalRenderer {
    last_scene: Option<Scene>,
    snapshot: Option<PathBuf>,
}

impl Renderer<Canvas> for TerminalRenderer {
    fn render(
        &mut self,
        mut frame: Canvas,
        state: &RenderState,
        lines: &[TextLine],
        hand: Option<&HandLandmarks>,
    ) -> shifumi::Result<()> {
        if let Some(hand) = hand {
            frame.draw_hand(hand);
        }
        frame.draw_lines(lines);

        if self.last_scene != Some(state.scene) {
            let text = lines.iter().map(|l| &*l.text).collect::<Vec<_>>();
            println!("{}", text.join(" | "));
            self.last_scene = Some(state.scene);
        }

        if state.terminated {
            if let Some(path) = &self.snapshot {
                frame.save(path)?;
                log::info!("saved last frame to {}", path.display());
            }
        }
        Ok(())
    }
}
