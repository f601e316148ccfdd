//! Generic landmark storage and filtering.
//!
//! Landmarks are produced by an external pose tracker. This module only stores them and offers a
//! few cheap transformations; it knows nothing about hands (see [`crate::hand`] for that).

use std::iter;

use crate::filter::Filter;

type Position = [f32; 3];

/// A fixed-length collection of [`Landmark`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len].into_boxed_slice(),
        }
    }

    /// Creates a [`Landmarks`] collection from a sequence of positions.
    ///
    /// 2D trackers can pass `0.0` as the Z coordinate.
    pub fn from_positions<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        self.positions.iter().map(|pos| Landmark { pos: *pos })
    }

    pub fn get(&self, index: usize) -> Landmark {
        Landmark {
            pos: self.positions[index],
        }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Position] {
        &mut self.positions
    }

    pub fn map_positions(&mut self, mut f: impl FnMut(Position) -> Position) {
        for pos in self.positions_mut() {
            *pos = f(*pos);
        }
    }
}

/// A landmark in 3D space, in the tracker's normalized coordinates.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Landmark {
    pos: Position,
}

impl Landmark {
    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }
}

/// Batch-filter for landmarks.
///
/// Every coordinate of every landmark is run through its own filter state. This is only
/// meaningful if the filter is fed landmarks of consecutive video frames.
pub struct LandmarkFilter {
    filter: Box<dyn FnMut(&mut Landmarks)>,
    num_landmarks: Option<usize>,
}

/// The default [`LandmarkFilter`] does not perform any filtering.
impl Default for LandmarkFilter {
    fn default() -> Self {
        Self {
            filter: Box::new(|_| ()),
            num_landmarks: None,
        }
    }
}

impl LandmarkFilter {
    /// Creates a new landmark filter.
    ///
    /// # Parameters
    ///
    /// - `filter` is the set of filter parameters to use.
    /// - `num_landmarks` is the number of landmarks that will be filtered with this filter in each
    ///   batch.
    pub fn new<F: Filter<f32> + 'static>(filter: F, num_landmarks: usize) -> Self {
        let mut states = iter::repeat_with(|| {
            [
                F::State::default(),
                F::State::default(),
                F::State::default(),
            ]
        })
        .take(num_landmarks)
        .collect::<Vec<_>>();

        Self {
            filter: Box::new(move |landmarks| {
                for (lm, state) in landmarks.positions.iter_mut().zip(&mut states) {
                    for (coord, state) in lm.iter_mut().zip(state) {
                        *coord = filter.filter(state, *coord);
                    }
                }
            }),
            num_landmarks: Some(num_landmarks),
        }
    }

    /// Filters a list of landmarks in-place.
    ///
    /// # Panics
    ///
    /// This method panics if `landmarks` does not have exactly as many entries as were specified in
    /// the `num_landmarks` parameter in the call to [`LandmarkFilter::new`].
    #[track_caller]
    pub fn filter(&mut self, landmarks: &mut Landmarks) {
        if let Some(expected) = self.num_landmarks {
            assert_eq!(
                landmarks.len(),
                expected,
                "`LandmarkFilter` was created for a different number of landmarks"
            );
        }
        (self.filter)(landmarks);
    }
}
