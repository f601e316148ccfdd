//! Camera-driven rock-paper-scissors.
//!
//! The crate is split into two layers:
//!
//! * The decision core: [`gesture`] turns 21 tracked hand landmarks into a [`Gesture`], and
//!   [`round`] sequences the countdown, capture, outcome and score of each round.
//! * The plumbing around it: [`session`] drives the core from a frame source, a pose tracker and
//!   an input source, and [`layout`] + [`draw`] turn the declarative [`RenderState`] into pixels.
//!
//! # Coordinates
//!
//! Hand landmarks use normalized image coordinates: the origin is the top-left corner of the
//! frame, X points to the right, Y points *down*, and both range from 0.0 to 1.0.
//!
//! The thumb test in [`gesture::Classifier`] depends on whether the frame was mirrored before
//! tracking. By default, a mirrored (selfie-view) frame is assumed. See
//! [`gesture::ThumbDirection`].
//!
//! # Environment Variables
//!
//! [`Options::from_env`] reads the following variables:
//!
//! * `SHIFUMI_LANG`: Display language, `en` or `fr`.
//! * `SHIFUMI_MIRROR`: If `1`, landmarks are mirrored horizontally before classification (use
//!   this when the frame source does not already flip its frames).
//! * `SHIFUMI_SMOOTHING`: Alpha value in `0.0..=1.0` of an exponential moving average applied to
//!   landmarks before classification. Unset disables smoothing.
//! * `SHIFUMI_MAX_TILT`: Angle in degrees the hand may be rotated away from upright before it is
//!   no longer classified. Unset disables the check.
//! * `SHIFUMI_SNAPSHOT`: Used by the `shifumi` binary only. Path of a PNG file the last rendered
//!   frame is written to on exit.
//!
//! `RUST_LOG` is honored by [`init_logger!`].
//!
//! [`Gesture`]: gesture::Gesture
//! [`RenderState`]: round::RenderState
//! [`Options::from_env`]: options::Options::from_env

use log::LevelFilter;

pub mod draw;
pub mod filter;
pub mod gesture;
pub mod hand;
pub mod landmark;
pub mod layout;
pub mod options;
pub mod round;
pub mod session;
pub mod timer;

pub type Error = Box<dyn std::error::Error + Sync + Send>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and shifumi will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` overrides both.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
