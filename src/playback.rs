use std::time::{Duration, Instant};

use crate::surface::transition::Transition;

/// Plays [`Transition`]s against wall-clock time.
///
/// The controller only reacts to progress values, so the viewer owns one of
/// these and feeds its output to `set_progress` every frame.
#[derive(Debug, Default)]
pub struct Playback {
    active: Option<(Transition, Instant)>,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, transition: Transition) {
        self.start_at(transition, Instant::now());
    }

    pub fn start_at(&mut self, transition: Transition, now: Instant) {
        log::debug!(
            "playing {} -> {} over {:?}",
            transition.from,
            transition.to,
            transition.duration
        );
        self.active = Some((transition, now));
    }

    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    pub fn target(&self) -> Option<f32> {
        self.active.map(|(transition, _)| transition.to)
    }

    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    /// Progress for `now`, or `None` when idle. The final tick returns the
    /// target exactly and then goes idle.
    pub fn tick_at(&mut self, now: Instant) -> Option<f32> {
        let (transition, started) = self.active?;
        let elapsed = now.saturating_duration_since(started);
        if transition.is_finished(elapsed) {
            self.active = None;
        }
        Some(transition.progress_at(elapsed))
    }
}

/// Duration of a transition covering `distance` progress units at
/// `secs_per_unit`.
pub fn scaled_duration(distance: f32, secs_per_unit: f32) -> Duration {
    let secs = (distance.abs() * secs_per_unit.max(0.0)).min(600.0);
    Duration::from_secs_f32(if secs.is_finite() { secs } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_until_finished() {
        let start = Instant::now();
        let mut playback = Playback::new();
        playback.start_at(Transition::new(0.0, 2.0, Duration::from_secs(2)), start);

        assert_eq!(playback.tick_at(start + Duration::from_secs(1)), Some(1.0));
        assert!(playback.is_playing());
        assert_eq!(playback.tick_at(start + Duration::from_secs(3)), Some(2.0));
        assert!(!playback.is_playing());
        assert_eq!(playback.tick_at(start + Duration::from_secs(4)), None);
    }

    #[test]
    fn stop_goes_idle() {
        let mut playback = Playback::new();
        playback.start(Transition::new(1.0, 3.0, Duration::from_secs(10)));
        assert_eq!(playback.target(), Some(3.0));
        playback.stop();
        assert_eq!(playback.tick(), None);
    }

    #[test]
    fn durations_scale_with_distance() {
        assert_eq!(scaled_duration(2.0, 1.5), Duration::from_secs(3));
        assert_eq!(scaled_duration(-1.0, 2.0), Duration::from_secs(2));
        assert_eq!(scaled_duration(f32::INFINITY, 1.0), Duration::from_secs(600));
    }
}
