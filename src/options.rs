//! Session configuration.

use std::env;

use crate::{gesture::ThumbDirection, layout::Language, round::Timings};

const ENV_VAR_LANG: &str = "SHIFUMI_LANG";
const ENV_VAR_MIRROR: &str = "SHIFUMI_MIRROR";
const ENV_VAR_SMOOTHING: &str = "SHIFUMI_SMOOTHING";
const ENV_VAR_MAX_TILT: &str = "SHIFUMI_MAX_TILT";

/// Options for a [`Session`][crate::session::Session].
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub(crate) language: Language,
    pub(crate) mirror_landmarks: bool,
    pub(crate) thumb: ThumbDirection,
    pub(crate) smoothing: Option<f32>,
    pub(crate) max_tilt: Option<f32>,
    pub(crate) timings: Timings,
    pub(crate) max_frame_failures: Option<u32>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            language: Language::default(),
            mirror_landmarks: false,
            thumb: ThumbDirection::default(),
            smoothing: None,
            max_tilt: None,
            timings: Timings::default(),
            max_frame_failures: None,
        }
    }
}

impl Options {
    /// Creates the default options and overrides them with any `SHIFUMI_*` environment variables
    /// that are set.
    ///
    /// Variables with invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().apply_env(|name| env::var(name).ok())
    }

    fn apply_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(lang) = var(ENV_VAR_LANG) {
            match lang.parse() {
                Ok(lang) => self.language = lang,
                Err(e) => log::warn!("ignoring `{ENV_VAR_LANG}`: {e}"),
            }
        }
        if let Some(mirror) = var(ENV_VAR_MIRROR) {
            match mirror.trim() {
                "1" | "true" | "yes" => self.mirror_landmarks = true,
                "0" | "false" | "no" => self.mirror_landmarks = false,
                invalid => log::warn!("ignoring `{ENV_VAR_MIRROR}`: invalid value '{invalid}'"),
            }
        }
        if let Some(alpha) = var(ENV_VAR_SMOOTHING) {
            match alpha.trim().parse::<f32>() {
                Ok(alpha) if (0.0..=1.0).contains(&alpha) => self.smoothing = Some(alpha),
                _ => log::warn!(
                    "ignoring `{ENV_VAR_SMOOTHING}`: '{alpha}' is not a number between 0 and 1"
                ),
            }
        }
        if let Some(degrees) = var(ENV_VAR_MAX_TILT) {
            match degrees.trim().parse::<f32>() {
                Ok(degrees) if degrees >= 0.0 => self.max_tilt = Some(degrees.to_radians()),
                _ => log::warn!(
                    "ignoring `{ENV_VAR_MAX_TILT}`: '{degrees}' is not a non-negative angle"
                ),
            }
        }

        log::debug!("{:?}", self);
        self
    }

    /// Sets the language of all on-screen text.
    #[inline]
    pub fn language(self, language: Language) -> Self {
        Self { language, ..self }
    }

    /// Selects whether landmarks are mirrored horizontally before classification.
    ///
    /// The classifier expects landmarks tracked on a mirrored (selfie-view) frame. If the frame
    /// source delivers frames as the camera sees them, enable this.
    #[inline]
    pub fn mirror_landmarks(self, mirror_landmarks: bool) -> Self {
        Self {
            mirror_landmarks,
            ..self
        }
    }

    /// Sets the direction in which an extended thumb is expected to point.
    #[inline]
    pub fn thumb_direction(self, thumb: ThumbDirection) -> Self {
        Self { thumb, ..self }
    }

    /// Enables exponential smoothing of landmarks before classification, with the given `alpha`.
    ///
    /// Passing [`None`] disables smoothing, which is the default.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not between 0.0 and 1.0.
    pub fn smoothing(self, alpha: Option<f32>) -> Self {
        if let Some(alpha) = alpha {
            assert!(
                (0.0..=1.0).contains(&alpha),
                "smoothing alpha must be in range 0.0..=1.0, got {alpha}"
            );
        }
        Self {
            smoothing: alpha,
            ..self
        }
    }

    /// Sets how far the hand may be rotated away from upright, in radians, before it is no
    /// longer classified. See [`Classifier::max_tilt`][crate::gesture::Classifier::max_tilt].
    ///
    /// Passing [`None`] disables the check, which is the default.
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

    /// Sets the countdown timings.
    #[inline]
    pub fn timings(self, timings: Timings) -> Self {
        Self { timings, ..self }
    }

    /// Sets how many frames in a row may fail to be read before the session gives up.
    ///
    /// By default, frame reads are retried forever.
    #[inline]
    pub fn max_frame_failures(self, max: u32) -> Self {
        Self {
            max_frame_failures: Some(max),
            ..self
        }
    }
}
