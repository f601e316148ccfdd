//! Data filtering and smoothing.

pub mod ema;

pub use ema::Ema;

/// Parameters of a filter for values of type `V`.
///
/// The filter itself is immutable. Everything that changes while values are pushed through it
/// lives in the associated [`Filter::State`], so one set of parameters can be shared between many
/// independent streams (for example, every coordinate of every landmark).
pub trait Filter<V> {
    /// Per-stream filter state. The [`Default`] value represents a filter that has not seen any
    /// values yet.
    type State: Default;

    /// Adds `value` to the stream tracked by `state`, returning the filtered value.
    fn filter(&self, state: &mut Self::State, value: V) -> V;
}
