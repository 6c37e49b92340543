use crate::layout::Circle;

pub(in crate::app) const TRANSITION_SECS: f64 = 1.5;

/// Eased transition of one bubble between two circles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Motion {
    from: Circle,
    to: Circle,
    started: f64,
}

impl Motion {
    pub(in crate::app) fn new(from: Circle, to: Circle, now: f64) -> Self {
        Self {
            from,
            to,
            started: now,
        }
    }

    pub(in crate::app) fn at(&self, now: f64) -> Circle {
        let t = ease_cubic_in_out(self.progress(now));
        Circle {
            x: lerp(self.from.x, self.to.x, t),
            y: lerp(self.from.y, self.to.y, t),
            r: lerp(self.from.r, self.to.r, t),
        }
    }

    pub(in crate::app) fn target(&self) -> Circle {
        self.to
    }

    /// Restarts from wherever the bubble currently is, so a newer layout pass
    /// interrupts the previous one without a jump.
    pub(in crate::app) fn retarget(&mut self, to: Circle, now: f64) {
        self.from = self.at(now);
        self.to = to;
        self.started = now;
    }

    pub(in crate::app) fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    fn progress(&self, now: f64) -> f64 {
        ((now - self.started) / TRANSITION_SECS).clamp(0.0, 1.0)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f64, y: f64, r: f64) -> Circle {
        Circle { x, y, r }
    }

    #[test]
    fn motion_runs_from_start_to_target() {
        let motion = Motion::new(circle(0.0, 0.0, 0.0), circle(100.0, 50.0, 10.0), 2.0);
        assert_eq!(motion.at(2.0), circle(0.0, 0.0, 0.0));
        assert_eq!(motion.at(2.0 + TRANSITION_SECS / 2.0), circle(50.0, 25.0, 5.0));
        assert_eq!(motion.at(2.0 + TRANSITION_SECS), circle(100.0, 50.0, 10.0));
        assert!(!motion.is_finished(2.5));
        assert!(motion.is_finished(2.0 + TRANSITION_SECS));
    }

    #[test]
    fn retarget_continues_from_current_position() {
        let mut motion = Motion::new(circle(0.0, 0.0, 4.0), circle(100.0, 0.0, 4.0), 0.0);
        let halfway = TRANSITION_SECS / 2.0;
        motion.retarget(circle(0.0, 80.0, 8.0), halfway);

        assert_eq!(motion.at(halfway), circle(50.0, 0.0, 4.0));
        assert_eq!(motion.target(), circle(0.0, 80.0, 8.0));
        assert!(!motion.is_finished(TRANSITION_SECS));
        assert_eq!(motion.at(halfway + TRANSITION_SECS), circle(0.0, 80.0, 8.0));
    }

    #[test]
    fn easing_is_symmetric() {
        for step in 0..=10 {
            let t = step as f64 / 10.0;
            let mirrored = 1.0 - ease_cubic_in_out(1.0 - t);
            assert!((ease_cubic_in_out(t) - mirrored).abs() < 1e-12);
        }
    }
}
