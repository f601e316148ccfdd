//! Synthetic hand poses.
//!
//! [`HandPose`] generates the landmarks of an upright hand, seen from the front in a mirrored
//! frame, with an arbitrary set of extended fingers. It stands in for a real pose tracker in tests
//! and in the terminal demo.

use nalgebra::{Rotation2, Vector2};

use crate::landmark::Landmarks;

use super::{Finger, HandLandmark, HandLandmarks};

/// Builder for synthetic [`HandLandmarks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    extended: [bool; 5],
    center: [f32; 2],
    scale: f32,
    tilt: f32,
}

impl HandPose {
    /// A closed fist, including the thumb.
    pub fn fist() -> Self {
        Self {
            extended: [false; 5],
            center: [0.5, 0.5],
            scale: 1.0,
            tilt: 0.0,
        }
    }

    pub fn rock() -> Self {
        Self::fist()
    }

    /// An open hand with all five fingers extended.
    pub fn paper() -> Self {
        Self {
            extended: [true; 5],
            ..Self::fist()
        }
    }

    /// Index and middle finger extended, everything else folded.
    pub fn scissors() -> Self {
        Self::fist()
            .with_finger(Finger::Index, true)
            .with_finger(Finger::Middle, true)
    }

    pub fn with_finger(mut self, finger: Finger, extended: bool) -> Self {
        self.extended[finger as usize] = extended;
        self
    }

    /// Moves the center of the palm to normalized coordinates (`x`, `y`).
    pub fn at(self, x: f32, y: f32) -> Self {
        Self {
            center: [x, y],
            ..self
        }
    }

    /// Scales the hand relative to its default size (which spans about half the frame height).
    pub fn scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    /// Rotates the hand around the center of the palm, clockwise as seen on screen.
    pub fn tilt(self, radians: f32) -> Self {
        Self {
            tilt: radians,
            ..self
        }
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.extended[finger as usize]
    }

    pub fn landmarks(&self) -> HandLandmarks {
        let mut landmarks = Landmarks::new(HandLandmarks::NUM_LANDMARKS);
        let [cx, cy] = self.center;
        let rotation = Rotation2::new(self.tilt);
        let mut put = |lm: HandLandmark, dx: f32, dy: f32| {
            let offset = rotation * Vector2::new(dx, dy) * self.scale;
            landmarks.positions_mut()[lm as usize] = [cx + offset.x, cy + offset.y, 0.0];
        };

        put(HandLandmark::Wrist, 0.0, 0.3);

        // The thumb sticks out sideways when extended, and is tucked across the palm otherwise.
        let [cmc, mcp, ip, tip] = Finger::Thumb.joints();
        put(cmc, -0.08, 0.22);
        put(mcp, -0.15, 0.15);
        if self.is_extended(Finger::Thumb) {
            put(ip, -0.22, 0.08);
            put(tip, -0.28, 0.02);
        } else {
            put(ip, -0.12, 0.08);
            put(tip, -0.03, 0.06);
        }

        for (finger, dx) in Finger::NON_THUMB.into_iter().zip([-0.07, 0.0, 0.06, 0.11]) {
            let [mcp, pip, dip, tip] = finger.joints();
            put(mcp, dx, 0.0);
            if self.is_extended(finger) {
                put(pip, dx, -0.1);
                put(dip, dx, -0.17);
                put(tip, dx, -0.23);
            } else {
                // Curled down into the palm: the tip ends up below the PIP joint.
                put(pip, dx, -0.08);
                put(dip, dx, -0.02);
                put(tip, dx, 0.03);
            }
        }

        HandLandmarks { landmarks }
    }
}
