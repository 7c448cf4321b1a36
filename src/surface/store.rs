use crate::error::SurfaceResult;
use crate::surface::grid::HeightGrid;

/// Fractional parts below this are treated as an exact keyframe.
pub const BLEND_EPSILON: f32 = 1e-5;

/// Largest sweep fraction strictly below one.
const SWEEP_MAX: f32 = 1.0 - f32::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedState {
    Empty,
    /// Partial reveal of keyframe 0, `fraction` in `[0, 1)`.
    Sweep { fraction: f32 },
    /// `lerp(states[from], states[to], t)`. `from == to` with `t == 0` shows a
    /// keyframe exactly.
    Blend { from: usize, to: usize, t: f32 },
}

/// Append-only keyframe sequence.
#[derive(Debug, Default)]
pub struct StateStore {
    states: Vec<HeightGrid>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, grid: HeightGrid) -> usize {
        self.states.push(grid);
        self.states.len() - 1
    }

    pub fn add_state_from_function<F>(
        &mut self,
        height_fn: F,
        x_range: (f32, f32),
        x_samples: usize,
        z_range: (f32, f32),
        z_samples: usize,
    ) -> SurfaceResult<usize>
    where
        F: Fn(f32, f32) -> f32,
    {
        let grid = HeightGrid::sample(height_fn, x_range, x_samples, z_range, z_samples)?;
        Ok(self.add_state(grid))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HeightGrid> {
        self.states.get(index)
    }

    pub fn first(&self) -> Option<&HeightGrid> {
        self.states.first()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.states.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeightGrid> {
        self.states.iter()
    }

    /// Maps a progress value onto the stored keyframes.
    ///
    /// `[0, 1)` sweeps in keyframe 0; from 1 onwards the integer part picks
    /// the keyframe and the fractional part blends toward the next one,
    /// saturating at the last keyframe. Negative or NaN progress counts as 0.
    pub fn resolve(&self, progress: f32) -> ResolvedState {
        let Some(last) = self.last_index() else {
            return ResolvedState::Empty;
        };

        let progress = if progress.is_nan() { 0.0 } else { progress.max(0.0) };

        if progress < 1.0 {
            return ResolvedState::Sweep {
                fraction: progress.min(SWEEP_MAX),
            };
        }

        let adjusted = progress - 1.0;
        let floor = adjusted.floor();
        if !floor.is_finite() || floor >= last as f32 {
            return ResolvedState::Blend {
                from: last,
                to: last,
                t: 0.0,
            };
        }

        let idx = floor as usize;
        let t = adjusted - floor;
        if t < BLEND_EPSILON {
            ResolvedState::Blend {
                from: idx,
                to: idx,
                t: 0.0,
            }
        } else {
            ResolvedState::Blend {
                from: idx,
                to: idx + 1,
                t,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn flat(height: f32) -> HeightGrid {
        HeightGrid::from_points(2, 2, vec![Vec3::new(0.0, height, 0.0); 4]).unwrap()
    }

    fn store_with(n: usize) -> StateStore {
        let mut store = StateStore::new();
        for i in 0..n {
            store.add_state(flat(i as f32));
        }
        store
    }

    #[test]
    fn empty_store_resolves_empty() {
        let store = StateStore::new();
        assert_eq!(store.resolve(0.0), ResolvedState::Empty);
        assert_eq!(store.resolve(3.5), ResolvedState::Empty);
    }

    #[test]
    fn below_one_sweeps() {
        let store = store_with(3);
        assert_eq!(store.resolve(0.25), ResolvedState::Sweep { fraction: 0.25 });
        assert!(matches!(store.resolve(0.99999), ResolvedState::Sweep { .. }));
        assert_eq!(store.resolve(-2.0), ResolvedState::Sweep { fraction: 0.0 });
        assert_eq!(store.resolve(f32::NAN), ResolvedState::Sweep { fraction: 0.0 });
    }

    #[test]
    fn one_is_first_keyframe() {
        let store = store_with(3);
        assert_eq!(
            store.resolve(1.0),
            ResolvedState::Blend {
                from: 0,
                to: 0,
                t: 0.0
            }
        );
    }

    #[test]
    fn fractional_progress_blends_adjacent_pair() {
        let store = store_with(3);
        match store.resolve(2.25) {
            ResolvedState::Blend { from, to, t } => {
                assert_eq!((from, to), (1, 2));
                assert!((t - 0.25).abs() < 1e-6);
            }
            other => panic!("expected blend, got {other:?}"),
        }
    }

    #[test]
    fn saturates_at_last_keyframe() {
        let store = store_with(3);
        let saturated = ResolvedState::Blend {
            from: 2,
            to: 2,
            t: 0.0,
        };
        for p in [3.0, 3.5, 10.0, 1e9, f32::INFINITY] {
            assert_eq!(store.resolve(p), saturated, "progress {p}");
        }
    }

    #[test]
    fn single_keyframe_saturates_from_one() {
        let store = store_with(1);
        assert_eq!(
            store.resolve(1.7),
            ResolvedState::Blend {
                from: 0,
                to: 0,
                t: 0.0
            }
        );
    }

    #[test]
    fn add_state_from_function_rejects_bad_samples() {
        let mut store = StateStore::new();
        assert!(store
            .add_state_from_function(|_, _| 0.0, (0.0, 1.0), 2, (0.0, 1.0), 0)
            .is_err());
        assert!(store.is_empty());
        assert_eq!(
            store
                .add_state_from_function(|_, _| 0.0, (0.0, 1.0), 2, (0.0, 1.0), 2)
                .unwrap(),
            0
        );
    }
}
