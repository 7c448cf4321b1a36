use std::time::Duration;

/// Describes a progress animation for an external driver to play.
///
/// The engine never advances time itself; it only hands out these
/// descriptors and reacts to whatever progress the driver sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
}

impl Transition {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Linear progress after `elapsed`, clamped to the target. Easing is the
    /// driver's business.
    pub fn progress_at(&self, elapsed: Duration) -> f32 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly() {
        let t = Transition::new(1.0, 3.0, Duration::from_secs(2));
        assert_eq!(t.progress_at(Duration::ZERO), 1.0);
        assert_eq!(t.progress_at(Duration::from_secs(1)), 2.0);
        assert_eq!(t.progress_at(Duration::from_secs(5)), 3.0);
    }

    #[test]
    fn zero_duration_jumps() {
        let t = Transition::new(0.0, 4.0, Duration::ZERO);
        assert!(t.is_finished(Duration::ZERO));
        assert_eq!(t.progress_at(Duration::ZERO), 4.0);
    }
}
