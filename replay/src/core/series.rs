use anyhow::Context;
use helpers::general::{search_sorted, InputValueError};
use helpers::geometry::Point2d;

/// PositionSeries holds the sparse, time-ordered position samples of a single driver as three
/// parallel arrays. The timestamps must be non-decreasing; if two consecutive samples share a
/// timestamp, the later sample wins when interpolating (degenerate zero-width segment).
#[derive(Debug, Clone)]
pub struct PositionSeries {
    t: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl PositionSeries {
    pub fn new(t: Vec<f64>, x: Vec<f64>, y: Vec<f64>) -> anyhow::Result<PositionSeries> {
        // check input
        if t.len() != x.len() || t.len() != y.len() {
            return Err(InputValueError)
                .context("Timestamps and coordinates must have the same number of samples!");
        }
        if t.windows(2).any(|w| w[1] < w[0]) {
            return Err(InputValueError).context("Timestamps must be non-decreasing!");
        }

        Ok(PositionSeries { t, x, y })
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn first_t(&self) -> Option<f64> {
        self.t.first().copied()
    }

    pub fn last_t(&self) -> Option<f64> {
        self.t.last().copied()
    }

    /// position_at returns the interpolated position at race time t. Queries before the first
    /// sample clamp to the first sample and queries after the last sample clamp to the last sample
    /// (no extrapolation in either direction). In between, the bracketing sample pair is located
    /// via binary search and x and y are interpolated independently. The result depends on the
    /// inserted time only, i.e. identical queries always yield identical results.
    pub fn position_at(&self, t: f64) -> Option<Point2d> {
        if self.t.is_empty() {
            return None;
        }

        let idx = search_sorted(t, &self.t);

        if idx == 0 {
            return Some(Point2d {
                x: self.x[0],
                y: self.y[0],
            });
        }
        if idx == self.t.len() {
            return Some(Point2d {
                x: *self.x.last().unwrap(),
                y: *self.y.last().unwrap(),
            });
        }

        // fraction between the bracketing samples (guard against a zero-width bracket, in which
        // case the later sample wins)
        let dt = self.t[idx] - self.t[idx - 1];
        let frac = if dt > 0.0 {
            (t - self.t[idx - 1]) / dt
        } else {
            1.0
        };

        Some(Point2d {
            x: self.x[idx - 1] + frac * (self.x[idx] - self.x[idx - 1]),
            y: self.y[idx - 1] + frac * (self.y[idx] - self.y[idx - 1]),
        })
    }

    /// position_at_windowed behaves like position_at, but additionally returns None if t lies more
    /// than the grace window outside the series' own time range. This models a car that is not yet
    /// on track or has left the session.
    pub fn position_at_windowed(&self, t: f64, grace: f64) -> Option<Point2d> {
        let first_t = self.first_t()?;
        let last_t = self.last_t()?;

        if t < first_t - grace || t > last_t + grace {
            return None;
        }

        self.position_at(t)
    }

    /// rotate returns a copy of the series with all coordinates rotated around the origin by the
    /// given angle in radians (used to align the circuit's main straight with the rendering frame).
    pub fn rotate(&self, angle: f64) -> PositionSeries {
        let mut x = Vec::with_capacity(self.x.len());
        let mut y = Vec::with_capacity(self.y.len());

        for (&xi, &yi) in self.x.iter().zip(self.y.iter()) {
            let p = Point2d { x: xi, y: yi }.rotate(angle);
            x.push(p.x);
            y.push(p.y);
        }

        PositionSeries {
            t: self.t.to_owned(),
            x,
            y,
        }
    }

    /// points iterates the raw sample positions (used for bounds computation).
    pub fn points(&self) -> impl Iterator<Item = Point2d> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| Point2d { x, y })
    }
}
