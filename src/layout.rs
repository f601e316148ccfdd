//! Screen layout: turns a [`RenderState`] into positioned text.
//!
//! All visible text is looked up from the enums in [`crate::round`] and [`crate::gesture`]. The
//! layout targets a 640x480 frame.

use std::{fmt, str::FromStr};

use crate::{
    draw::Color,
    gesture::Gesture,
    round::{CountdownPhase, Outcome, RenderState, RoundRecord, Scene},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    French,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.to_ascii_lowercase() {
            "en" | "english" => Ok(Language::English),
            "fr" | "french" | "francais" => Ok(Language::French),
            _ => Err(format!("unknown language '{s}' (expected `en` or `fr`)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::English => "en",
            Language::French => "fr",
        })
    }
}

/// Relative text size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Normal,
    Large,
    Huge,
}

/// Horizontal placement of a [`TextLine`] relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A line of text to draw. `y` is the text's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub size: TextSize,
    pub align: Align,
}

impl TextLine {
    fn new(text: impl Into<String>, x: i32, y: i32, color: Color, size: TextSize) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            color,
            size,
            align: Align::Center,
        }
    }

    fn align(self, align: Align) -> Self {
        Self { align, ..self }
    }
}

struct Strings {
    title: &'static str,
    start_hint: &'static str,
    player: &'static str,
    computer: &'static str,
    gesture: &'static str,
    show: &'static str,
    score: &'static str,
    replay_hint: &'static str,
    player_win: &'static str,
    computer_win: &'static str,
    draw: &'static str,
    no_gesture: &'static str,
    rock: &'static str,
    paper: &'static str,
    scissors: &'static str,
}

const ENGLISH: Strings = Strings {
    title: "Rock Paper Scissors!",
    start_hint: "Press SPACE to play",
    player: "You",
    computer: "Computer",
    gesture: "Gesture",
    show: "SHOW!",
    score: "Score",
    replay_hint: "SPACE = play again  Q = quit",
    player_win: "You win!",
    computer_win: "Computer wins!",
    draw: "Draw!",
    no_gesture: "Gesture not recognized!",
    rock: "rock",
    paper: "paper",
    scissors: "scissors",
};

const FRENCH: Strings = Strings {
    title: "Pierre Feuille Ciseaux!",
    start_hint: "Appuie sur ESPACE pour jouer",
    player: "Toi",
    computer: "Ordi",
    gesture: "Geste",
    show: "MONTRE!",
    score: "Score",
    replay_hint: "ESPACE = rejouer  Q = quitter",
    player_win: "Tu gagnes!",
    computer_win: "L'ordi gagne!",
    draw: "Egalite!",
    no_gesture: "Geste non reconnu!",
    rock: "pierre",
    paper: "feuille",
    scissors: "ciseaux",
};

impl Language {
    fn strings(self) -> &'static Strings {
        match self {
            Language::English => &ENGLISH,
            Language::French => &FRENCH,
        }
    }

    /// Returns the display name of a gesture. Unrecognized gestures are shown as `?`.
    pub fn gesture_name(self, gesture: Option<Gesture>) -> &'static str {
        let s = self.strings();
        match gesture {
            Some(Gesture::Rock) => s.rock,
            Some(Gesture::Paper) => s.paper,
            Some(Gesture::Scissors) => s.scissors,
            Some(Gesture::Unknown) | None => "?",
        }
    }

    pub fn outcome_text(self, outcome: Outcome) -> &'static str {
        let s = self.strings();
        match outcome {
            Outcome::PlayerWin => s.player_win,
            Outcome::ComputerWin => s.computer_win,
            Outcome::Draw => s.draw,
            Outcome::NoGesture => s.no_gesture,
        }
    }
}

pub fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::PlayerWin => Color::GREEN,
        Outcome::ComputerWin => Color::RED,
        Outcome::Draw | Outcome::NoGesture => Color::CYAN,
    }
}

fn countdown_color(phase: CountdownPhase) -> Color {
    match phase {
        CountdownPhase::Three => Color::RED,
        CountdownPhase::Two => Color::ORANGE,
        CountdownPhase::One => Color::YELLOW,
        CountdownPhase::Show => Color::GREEN,
    }
}

const PLAYER_CHOICE_COLOR: Color = Color::from_rgb8(0, 200, 255);
const COMPUTER_CHOICE_COLOR: Color = Color::from_rgb8(200, 0, 255);

/// Lays out the screen for `state`.
pub fn layout(state: &RenderState, language: Language) -> Vec<TextLine> {
    let s = language.strings();
    let scores = state.scores;
    let mut lines = Vec::new();

    match state.scene {
        Scene::Idle => {
            lines.push(TextLine::new(s.title, 320, 50, Color::YELLOW, TextSize::Large));
            lines.push(TextLine::new(
                s.start_hint,
                320,
                100,
                Color::WHITE,
                TextSize::Normal,
            ));
            lines.push(
                TextLine::new(
                    format!(
                        "{}: {}  {}: {}",
                        s.player, scores.player, s.computer, scores.computer
                    ),
                    620,
                    450,
                    Color::CYAN,
                    TextSize::Normal,
                )
                .align(Align::Right),
            );
            if let Some(gesture) = state.live_gesture {
                lines.push(
                    TextLine::new(
                        format!("{}: {}", s.gesture, language.gesture_name(Some(gesture))),
                        20,
                        450,
                        Color::GREEN,
                        TextSize::Normal,
                    )
                    .align(Align::Left),
                );
            }
        }
        Scene::Countdown(phase) => {
            let text = match phase {
                CountdownPhase::Three => "3",
                CountdownPhase::Two => "2",
                CountdownPhase::One => "1",
                CountdownPhase::Show => s.show,
            };
            lines.push(TextLine::new(
                text,
                320,
                270,
                countdown_color(phase),
                TextSize::Huge,
            ));
        }
        Scene::Result(RoundRecord {
            player_choice,
            computer_choice,
            outcome,
        }) => {
            lines.push(
                TextLine::new(
                    format!("{}: {}", s.player, language.gesture_name(player_choice)),
                    50,
                    200,
                    PLAYER_CHOICE_COLOR,
                    TextSize::Normal,
                )
                .align(Align::Left),
            );
            lines.push(
                TextLine::new(
                    format!(
                        "{}: {}",
                        s.computer,
                        language.gesture_name(Some(computer_choice))
                    ),
                    590,
                    200,
                    COMPUTER_CHOICE_COLOR,
                    TextSize::Normal,
                )
                .align(Align::Right),
            );
            lines.push(TextLine::new(
                language.outcome_text(outcome),
                320,
                300,
                outcome_color(outcome),
                TextSize::Large,
            ));
            lines.push(TextLine::new(
                format!(
                    "{} - {}: {}  {}: {}",
                    s.score, s.player, scores.player, s.computer, scores.computer
                ),
                320,
                380,
                Color::WHITE,
                TextSize::Normal,
            ));
            lines.push(TextLine::new(
                s.replay_hint,
                320,
                450,
                Color::GRAY,
                TextSize::Small,
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use crate::round::ScoreBoard;

    use super::*;

    fn state(scene: Scene) -> RenderState {
        RenderState {
            scene,
            scores: ScoreBoard {
                player: 2,
                computer: 1,
            },
            live_gesture: None,
            terminated: false,
        }
    }

    fn texts(lines: &[TextLine]) -> Vec<&str> {
        lines.iter().map(|l| &*l.text).collect()
    }

    #[test]
    fn idle() {
        let lines = layout(&state(Scene::Idle), Language::French);
        assert_eq!(
            texts(&lines),
            [
                "Pierre Feuille Ciseaux!",
                "Appuie sur ESPACE pour jouer",
                "Toi: 2  Ordi: 1"
            ]
        );

        let mut with_preview = state(Scene::Idle);
        with_preview.live_gesture = Some(Gesture::Scissors);
        let lines = layout(&with_preview, Language::English);
        assert_eq!(lines.last().map(|l| &*l.text), Some("Gesture: scissors"));
    }

    #[test]
    fn countdown() {
        let lines = layout(
            &state(Scene::Countdown(CountdownPhase::Two)),
            Language::English,
        );
        assert_eq!(texts(&lines), ["2"]);
        assert_eq!(lines[0].color, Color::ORANGE);
        assert_eq!(lines[0].size, TextSize::Huge);

        let lines = layout(
            &state(Scene::Countdown(CountdownPhase::Show)),
            Language::French,
        );
        assert_eq!(texts(&lines), ["MONTRE!"]);
    }

    #[test]
    fn result_colors_follow_outcome() {
        for (outcome, color) in [
            (Outcome::PlayerWin, Color::GREEN),
            (Outcome::ComputerWin, Color::RED),
            (Outcome::Draw, Color::CYAN),
            (Outcome::NoGesture, Color::CYAN),
        ] {
            let lines = layout(
                &state(Scene::Result(RoundRecord {
                    player_choice: None,
                    computer_choice: Gesture::Rock,
                    outcome,
                })),
                Language::English,
            );
            let line = lines
                .iter()
                .find(|l| l.text == Language::English.outcome_text(outcome))
                .unwrap();
            assert_eq!(line.color, color);
        }
    }

    #[test]
    fn result_texts() {
        let lines = layout(
            &state(Scene::Result(RoundRecord {
                player_choice: Some(Gesture::Unknown),
                computer_choice: Gesture::Paper,
                outcome: Outcome::NoGesture,
            })),
            Language::French,
        );
        assert_eq!(
            texts(&lines),
            [
                "Toi: ?",
                "Ordi: feuille",
                "Geste non reconnu!",
                "Score - Toi: 2  Ordi: 1",
                "ESPACE = rejouer  Q = quitter",
            ]
        );
    }

    #[test]
    fn parse_language() {
        assert_eq!("fr".parse(), Ok(Language::French));
        assert_eq!("EN".parse(), Ok(Language::English));
        assert!("de".parse::<Language>().is_err());
    }
}
