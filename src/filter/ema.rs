//! Exponential smoothing of landmark coordinates.

use super::Filter;

/// Exponential moving average.
///
/// Every output is a blend of the new value and the previous output, weighted by `alpha`. Tracker
/// jitter is damped at the cost of some lag when the hand moves.
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    alpha: f32,
}

impl Ema {
    /// Creates an average that weights each new value with `alpha`.
    ///
    /// `1.0` passes values through untouched. Smaller values smooth harder and lag more.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 <= alpha <= 1.0`.
    pub fn new(alpha: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&alpha),
            "EMA alpha must be in range 0.0..=1.0, got {alpha}"
        );
        Self { alpha }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Last output of an [`Ema`] stream. Empty until the first value arrives.
#[derive(Debug, Default)]
pub struct State {
    prev: Option<f32>,
}

impl Filter<f32> for Ema {
    type State = State;

    fn filter(&self, state: &mut State, value: f32) -> f32 {
        let out = state
            .prev
            .map_or(value, |prev| prev + self.alpha * (value - prev));
        state.prev = Some(out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ema: Ema, values: &[f32]) -> Vec<f32> {
        let mut state = State::default();
        values.iter().map(|v| ema.filter(&mut state, *v)).collect()
    }

    #[test]
    fn first_value_passes_through() {
        assert_eq!(run(Ema::new(0.5), &[8.0]), [8.0]);
    }

    #[test]
    fn blends_with_previous_output() {
        assert_eq!(run(Ema::new(0.5), &[1.0, 2.0, 2.0]), [1.0, 1.5, 1.75]);
        assert_eq!(run(Ema::new(0.25), &[0.0, 4.0]), [0.0, 1.0]);
    }

    #[test]
    fn alpha_one_disables_smoothing() {
        assert_eq!(run(Ema::new(1.0), &[3.0, -1.0]), [3.0, -1.0]);
    }

    #[test]
    #[should_panic]
    fn rejects_out_of_range_alpha() {
        Ema::new(1.5);
    }
}
