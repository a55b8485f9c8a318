use helpers::geometry::{wrap_to_pi, Point2d};

/// HeadingTracker derives a smoothed facing angle from consecutive interpolated positions. The raw
/// bearing is the two-argument arctangent of the frame-to-frame displacement; displacements below
/// the noise threshold are ignored (stationary car, sampling jitter), and the bearing is smoothed
/// with an exponential low-pass filter through the wrapped angular difference so the heading never
/// snaps to a noisy raw value.
#[derive(Debug)]
pub struct HeadingTracker {
    noise_threshold: f64,
    gain: f64,
    prev_pos: Option<Point2d>,
    heading: f64,
    initialized: bool,
}

impl HeadingTracker {
    pub fn new(noise_threshold: f64, gain: f64) -> HeadingTracker {
        HeadingTracker {
            noise_threshold,
            gain,
            prev_pos: None,
            heading: 0.0,
            initialized: false,
        }
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// initialized is false until enough movement was observed for a first bearing. Consumers must
    /// not treat the heading of an uninitialized tracker as a facing angle.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn update(&mut self, pos: &Point2d) {
        let prev_pos = match self.prev_pos.as_ref() {
            Some(prev_pos) => prev_pos,
            None => {
                self.prev_pos = Some(pos.to_owned());
                return;
            }
        };

        let displacement = pos.as_vector2d().sub(&prev_pos.as_vector2d());

        // keep the reference position until the displacement exceeds the noise threshold, so a
        // crawling car still accumulates enough movement for a stable bearing
        if displacement.abs() < self.noise_threshold {
            return;
        }

        let raw_bearing = displacement.bearing();

        if !self.initialized {
            self.heading = raw_bearing;
            self.initialized = true;
        } else {
            self.heading =
                wrap_to_pi(self.heading + wrap_to_pi(raw_bearing - self.heading) * self.gain);
        }

        self.prev_pos = Some(pos.to_owned());
    }

    /// reset drops the position history and the smoothed heading. Called on every seek so no stale
    /// motion artifact survives a discontinuity.
    pub fn reset(&mut self) {
        self.prev_pos = None;
        self.heading = 0.0;
        self.initialized = false;
    }
}
