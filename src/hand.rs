//! Hands tracked with the 21-point landmark convention.
//!
//! The external pose tracker is expected to deliver landmarks in the MediaPipe Hands layout (see
//! [`HandLandmark`]) with normalized coordinates: origin in the top-left corner of the frame,
//! Y pointing down.

pub mod landmark;
pub mod pose;

use nalgebra::{Point2, Rotation2, Vector2};

use crate::landmark::{Landmark, Landmarks};

pub use landmark::{Finger, HandLandmark, CONNECTIVITY};

/// The landmarks of a single tracked hand.
///
/// This is a [`Landmarks`] collection that is guaranteed to contain exactly
/// [`HandLandmarks::NUM_LANDMARKS`] entries, so indexing it with a [`HandLandmark`] never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    landmarks: Landmarks,
}

impl HandLandmarks {
    pub const NUM_LANDMARKS: usize = 21;

    /// Wraps a [`Landmarks`] collection produced by a pose tracker.
    ///
    /// Returns an error if `landmarks` doesn't contain exactly [`HandLandmarks::NUM_LANDMARKS`]
    /// entries.
    pub fn new(landmarks: Landmarks) -> crate::Result<Self> {
        if landmarks.len() != Self::NUM_LANDMARKS {
            return Err(format!(
                "hand landmarks must have exactly {} entries, got {}",
                Self::NUM_LANDMARKS,
                landmarks.len()
            )
            .into());
        }

        Ok(Self { landmarks })
    }

    #[inline]
    pub fn get(&self, landmark: HandLandmark) -> Landmark {
        self.landmarks.get(landmark as usize)
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// Returns a mutable reference to the underlying landmarks.
    ///
    /// The number of landmarks cannot be changed through this reference.
    #[inline]
    pub fn landmarks_mut(&mut self) -> &mut Landmarks {
        &mut self.landmarks
    }

    /// Mirrors the hand horizontally, in normalized coordinates (`x -> 1.0 - x`).
    ///
    /// This turns a left hand into a right hand (and vice versa), and must be applied when the
    /// frames were tracked without the mirroring the classifier expects.
    pub fn flip_horizontal(&mut self) {
        self.landmarks.map_positions(|[x, y, z]| [1.0 - x, y, z]);
    }

    /// Computes the clockwise rotation of the palm compared to an upright position.
    ///
    /// A rotation of 0° means that fingers are pointed upwards. The finger test of the gesture
    /// classifier assumes a roughly upright hand.
    pub fn rotation_radians(&self) -> f32 {
        let p = self.get(HandLandmark::MiddleFingerMcp);
        let finger = Point2::new(p.x(), p.y());
        let p = self.get(HandLandmark::Wrist);
        let wrist = Point2::new(p.x(), p.y());

        let rel = wrist - finger;
        Rotation2::rotation_between(&Vector2::y(), &rel).angle()
    }
}

impl TryFrom<Landmarks> for HandLandmarks {
    type Error = crate::Error;

    fn try_from(landmarks: Landmarks) -> crate::Result<Self> {
        Self::new(landmarks)
    }
}
