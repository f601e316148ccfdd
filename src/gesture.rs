//! Rock, paper, scissors gesture classification.
//!
//! The classifier is a purely geometric heuristic: each finger is compared against one of its own
//! joints, so the result does not depend on the size of the hand or its distance to the camera. It
//! does depend on the hand being roughly upright and on the frame's mirroring.

use std::fmt;

use crate::hand::{Finger, HandLandmarks};

/// A hand gesture, as recognized by the [`Classifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
    /// The hand doesn't show any of the three gestures confidently.
    Unknown,
}

impl Gesture {
    /// The gestures that can be played in a round.
    pub const PLAYABLE: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    pub fn is_playable(self) -> bool {
        self != Gesture::Unknown
    }

    /// Returns whether `self` wins against `other`.
    ///
    /// [`Gesture::Unknown`] never wins and is never beaten.
    pub fn beats(self, other: Gesture) -> bool {
        matches!(
            (self, other),
            (Gesture::Rock, Gesture::Scissors)
                | (Gesture::Scissors, Gesture::Paper)
                | (Gesture::Paper, Gesture::Rock)
        )
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gesture::Rock => "rock",
            Gesture::Paper => "paper",
            Gesture::Scissors => "scissors",
            Gesture::Unknown => "unknown",
        })
    }
}

/// Which horizontal direction an extended thumb points in.
///
/// The thumb can't be judged vertically like the other fingers, so it is considered extended when
/// its tip lies on the outer side of the IP joint. Which side is "outer" depends on whether the
/// frame was mirrored before tracking.
///
/// With the default mirrored (selfie-view) frame and a right hand facing the camera, an extended
/// thumb points to the left of the image. If the frame source stops mirroring, this has to flip
/// too (or the landmarks need to be flipped with [`HandLandmarks::flip_horizontal`]); nothing
/// else will notice the mismatch, the classifier just gets worse at recognizing rock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbDirection {
    /// Extended if the tip's X coordinate is less than the IP joint's.
    #[default]
    TipLeftOfJoint,
    /// Extended if the tip's X coordinate is greater than the IP joint's.
    TipRightOfJoint,
}

/// Extension state of each finger of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    up: [bool; 5],
}

impl FingerStates {
    #[inline]
    pub fn is_up(&self, finger: Finger) -> bool {
        self.up[finger as usize]
    }

    /// Returns the number of raised fingers, not counting the thumb.
    pub fn count(&self) -> usize {
        Finger::NON_THUMB
            .iter()
            .filter(|finger| self.is_up(**finger))
            .count()
    }
}

/// Classifies [`HandLandmarks`] into [`Gesture`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    thumb: ThumbDirection,
    max_tilt: Option<f32>,
}

impl Classifier {
    pub fn new(thumb: ThumbDirection) -> Self {
        Self {
            thumb,
            max_tilt: None,
        }
    }

    /// Sets how far (in radians, either way) the hand may be rotated away from upright before it
    /// is classified as [`Gesture::Unknown`].
    ///
    /// The finger test compares Y coordinates, so a hand lying on its side produces arbitrary
    /// results. [`None`] disables the check, which is the default.
    ///
    /// # Panics
    ///
    /// Panics if `max_tilt` is negative.
    pub fn max_tilt(self, max_tilt: Option<f32>) -> Self {
        if let Some(max) = max_tilt {
            assert!(max >= 0.0, "maximum tilt must not be negative, got {max}");
        }
        Self { max_tilt, ..self }
    }

    pub fn thumb_direction(&self) -> ThumbDirection {
        self.thumb
    }

    /// Determines which fingers are raised.
    ///
    /// A non-thumb finger is up when its tip is above (smaller Y than) its PIP joint. The thumb is
    /// up when its tip points outwards, as configured by the [`ThumbDirection`].
    pub fn finger_states(&self, hand: &HandLandmarks) -> FingerStates {
        let mut states = FingerStates::default();
        for finger in Finger::NON_THUMB {
            let tip = hand.get(finger.tip());
            let joint = hand.get(finger.reference_joint());
            states.up[finger as usize] = tip.y() < joint.y();
        }

        let tip = hand.get(Finger::Thumb.tip()).x();
        let joint = hand.get(Finger::Thumb.reference_joint()).x();
        states.up[Finger::Thumb as usize] = match self.thumb {
            ThumbDirection::TipLeftOfJoint => tip < joint,
            ThumbDirection::TipRightOfJoint => tip > joint,
        };

        states
    }

    /// Classifies the gesture shown by `hand`.
    ///
    /// Rules are checked in order, and the first match wins:
    ///
    /// 1. At most one finger up and the thumb folded: [`Gesture::Rock`].
    /// 2. Exactly index and middle finger up: [`Gesture::Scissors`] (the thumb is ignored).
    /// 3. Three or more fingers up: [`Gesture::Paper`].
    /// 4. Anything else: [`Gesture::Unknown`].
    ///
    /// If a [maximum tilt][Self::max_tilt] is set, a hand rotated further than that is
    /// [`Gesture::Unknown`] before any rule is checked.
    pub fn classify(&self, hand: &HandLandmarks) -> Gesture {
        if let Some(max) = self.max_tilt {
            let tilt = hand.rotation_radians();
            if tilt.abs() > max {
                log::trace!("hand tilted by {:.0} degrees", tilt.to_degrees());
                return Gesture::Unknown;
            }
        }

        let states = self.finger_states(hand);
        let count = states.count();

        if count <= 1 && !states.is_up(Finger::Thumb) {
            Gesture::Rock
        } else if states.is_up(Finger::Index)
            && states.is_up(Finger::Middle)
            && !states.is_up(Finger::Ring)
            && !states.is_up(Finger::Pinky)
        {
            Gesture::Scissors
        } else if count >= 3 {
            Gesture::Paper
        } else {
            Gesture::Unknown
        }
    }
}

/// Classifies `hand` with the default [`Classifier`], which expects a mirrored frame.
pub fn classify(hand: &HandLandmarks) -> Gesture {
    Classifier::default().classify(hand)
}
