use helpers::geometry::{Point2d, Point3d};

/// TrackBounds is the bounding region over all geometry that contributes to the projection (track
/// outline, all position samples, and the optional pit lane overlay), in the rotated coordinate
/// frame. Computed once at load since the raw data does not change during a session.
#[derive(Debug, Clone)]
pub struct TrackBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl TrackBounds {
    pub fn from_points(points: impl Iterator<Item = Point2d>) -> Option<TrackBounds> {
        let mut bounds: Option<TrackBounds> = None;

        for p in points {
            match bounds.as_mut() {
                Some(bounds) => bounds.include(&p),
                None => {
                    bounds = Some(TrackBounds {
                        x_min: p.x,
                        x_max: p.x,
                        y_min: p.y,
                        y_max: p.y,
                    })
                }
            }
        }

        bounds
    }

    pub fn include(&mut self, p: &Point2d) {
        if p.x < self.x_min {
            self.x_min = p.x
        }
        if p.x > self.x_max {
            self.x_max = p.x
        }
        if p.y < self.y_min {
            self.y_min = p.y
        }
        if p.y > self.y_max {
            self.y_max = p.y
        }
    }

    /// span_x returns the width of the bounds, substituting a unit denominator for degenerate
    /// zero-width bounds so projections stay finite and centered.
    pub fn span_x(&self) -> f64 {
        let span = self.x_max - self.x_min;
        if span > 0.0 {
            span
        } else {
            1.0
        }
    }

    pub fn span_y(&self) -> f64 {
        let span = self.y_max - self.y_min;
        if span > 0.0 {
            span
        } else {
            1.0
        }
    }

    /// normalized maps a point into [0, 1] x [0, 1] relative to the bounds (values outside the
    /// bounds exceed that range accordingly).
    pub fn normalized(&self, p: &Point2d) -> Point2d {
        Point2d {
            x: (p.x - self.x_min) / self.span_x(),
            y: (p.y - self.y_min) / self.span_y(),
        }
    }
}

/// SurfaceProjection is the affine fit of the rotated bounds into a 2D rendering surface. The
/// vertical axis is flipped since screens grow downward while track coordinates grow upward. Pure
/// function of its inputs: re-running with unchanged inputs produces bit-identical results, which
/// keeps the projection stable across resize events.
#[derive(Debug, Clone)]
pub struct SurfaceProjection {
    bounds: TrackBounds,
    width: f64,
    height: f64,
    padding: f64,
}

impl SurfaceProjection {
    pub fn new(bounds: &TrackBounds, width: f64, height: f64, padding: f64) -> SurfaceProjection {
        SurfaceProjection {
            bounds: bounds.to_owned(),
            width,
            height,
            padding,
        }
    }

    pub fn project(&self, p: &Point2d) -> Point2d {
        let norm = self.bounds.normalized(p);
        let usable = 1.0 - 2.0 * self.padding;

        Point2d {
            x: (self.padding + norm.x * usable) * self.width,
            y: self.height - (self.padding + norm.y * usable) * self.height,
        }
    }
}

/// WorldProjection maps rotated telemetry coordinates into a 3D world space: the first axis stays
/// horizontal, the second axis becomes the depth axis with a sign flip, and the height is a small
/// constant above the ground plane. The world is centered on the origin.
#[derive(Debug, Clone)]
pub struct WorldProjection {
    bounds: TrackBounds,
    extent: f64,
    height: f64,
}

impl WorldProjection {
    pub fn new(bounds: &TrackBounds, extent: f64, height: f64) -> WorldProjection {
        WorldProjection {
            bounds: bounds.to_owned(),
            extent,
            height,
        }
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn project(&self, p: &Point2d) -> Point3d {
        let norm = self.bounds.normalized(p);

        Point3d {
            x: (norm.x - 0.5) * self.extent,
            y: self.height,
            z: -(norm.y - 0.5) * self.extent,
        }
    }
}

/// rotate_path rotates a polyline around the origin by the given angle in radians. Applied
/// consistently to the track outline, all position samples, and the pit lane overlay before any
/// bounds are computed.
pub fn rotate_path(path: &[Point2d], angle: f64) -> Vec<Point2d> {
    path.iter().map(|p| p.rotate(angle)).collect()
}
