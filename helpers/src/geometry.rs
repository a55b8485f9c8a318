use approx::ulps_eq;
use serde::Deserialize;

/// wrap_to_pi wraps an angle in radians to the interval (-pi, pi].
pub fn wrap_to_pi(angle: f64) -> f64 {
    let mut wrapped = angle % std::f64::consts::TAU;

    if wrapped > std::f64::consts::PI {
        wrapped -= std::f64::consts::TAU
    } else if wrapped <= -std::f64::consts::PI {
        wrapped += std::f64::consts::TAU
    }

    wrapped
}

// 2D ----------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize, Clone)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn as_vector2d(&self) -> Vector2d {
        Vector2d {
            dx: self.x,
            dy: self.y,
        }
    }
    /// rotate rotates the point around the origin by the given angle in radians
    /// (counter-clockwise for a positive angle).
    pub fn rotate(&self, angle: f64) -> Point2d {
        let (sin_a, cos_a) = angle.sin_cos();

        Point2d {
            x: self.x * cos_a - self.y * sin_a,
            y: self.x * sin_a + self.y * cos_a,
        }
    }
}

impl PartialEq for Point2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y)
    }
}

#[derive(Debug, Clone)]
pub struct Vector2d {
    pub dx: f64,
    pub dy: f64,
}

impl Vector2d {
    pub fn sub(&self, other: &Self) -> Vector2d {
        Vector2d {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
        }
    }
    pub fn add(&self, other: &Self) -> Vector2d {
        Vector2d {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
        }
    }
    pub fn mult(&self, k: f64) -> Vector2d {
        Vector2d {
            dx: self.dx * k,
            dy: self.dy * k,
        }
    }
    pub fn abs(&self) -> f64 {
        (self.dx.powf(2.0) + self.dy.powf(2.0)).sqrt()
    }
    /// bearing returns the direction of the vector in radians within (-pi, pi] (atan2 convention,
    /// zero pointing along the positive x axis).
    pub fn bearing(&self) -> f64 {
        self.dy.atan2(self.dx)
    }
}

impl PartialEq for Vector2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.dx, other.dx) && ulps_eq!(self.dy, other.dy)
    }
}

// 3D ----------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub fn as_vector3d(&self) -> Vector3d {
        Vector3d {
            dx: self.x,
            dy: self.y,
            dz: self.z,
        }
    }
    pub fn shift(&self, other: &Vector3d) -> Point3d {
        self.as_vector3d().add(other).as_point3d()
    }
    /// lerp_towards moves the point towards the target by the given gain within [0.0, 1.0] (an
    /// exponential low-pass filter when applied once per frame).
    pub fn lerp_towards(&self, target: &Point3d, gain: f64) -> Point3d {
        self.shift(
            &target
                .as_vector3d()
                .sub(&self.as_vector3d())
                .mult(gain),
        )
    }
}

impl PartialEq for Point3d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y) && ulps_eq!(self.z, other.z)
    }
}

#[derive(Debug, Clone)]
pub struct Vector3d {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector3d {
    pub fn as_point3d(&self) -> Point3d {
        Point3d {
            x: self.dx,
            y: self.dy,
            z: self.dz,
        }
    }
    pub fn sub(&self, other: &Self) -> Vector3d {
        Vector3d {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
            dz: self.dz - other.dz,
        }
    }
    pub fn add(&self, other: &Self) -> Vector3d {
        Vector3d {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
            dz: self.dz + other.dz,
        }
    }
    pub fn mult(&self, k: f64) -> Vector3d {
        Vector3d {
            dx: self.dx * k,
            dy: self.dy * k,
            dz: self.dz * k,
        }
    }
    pub fn abs(&self) -> f64 {
        (self.dx.powf(2.0) + self.dy.powf(2.0) + self.dz.powf(2.0)).sqrt()
    }
    pub fn normalized(&self) -> Vector3d {
        self.mult(1.0 / self.abs())
    }
    pub fn cross(&self, other: &Self) -> Vector3d {
        Vector3d {
            dx: self.dy * other.dz - self.dz * other.dy,
            dy: self.dz * other.dx - self.dx * other.dz,
            dz: self.dx * other.dy - self.dy * other.dx,
        }
    }
    pub fn dot(&self, other: &Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }
}

impl PartialEq for Vector3d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.dx, other.dx) && ulps_eq!(self.dy, other.dy) && ulps_eq!(self.dz, other.dz)
    }
}
