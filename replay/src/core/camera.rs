use helpers::geometry::{Point3d, Vector3d};

/// FollowCamera places a 3D camera behind and above a followed car. Camera position and look
/// target exponentially approach their computed goals with two independent gains; the position
/// follows more slowly than the target, which gives the trailing-camera feel. On a target switch
/// the camera snaps immediately instead of sweeping across the whole map.
#[derive(Debug)]
pub struct FollowCamera {
    pub eye: Point3d,
    pub target: Point3d,
    back_distance: f64,
    height: f64,
    eye_gain: f64,
    target_gain: f64,
}

impl FollowCamera {
    pub fn new(back_distance: f64, height: f64, eye_gain: f64, target_gain: f64) -> FollowCamera {
        FollowCamera {
            eye: Point3d {
                x: 0.0,
                y: height,
                z: back_distance,
            },
            target: Point3d {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            back_distance,
            height,
            eye_gain,
            target_gain,
        }
    }

    /// desired_eye computes the goal camera position behind and above the car. The heading is
    /// given in the rotated track plane, whose second axis maps to the negative world depth axis.
    fn desired_eye(&self, car: &Point3d, heading: f64) -> Point3d {
        let dir = Vector3d {
            dx: heading.cos(),
            dy: 0.0,
            dz: -heading.sin(),
        };

        car.shift(&dir.mult(-self.back_distance)).shift(&Vector3d {
            dx: 0.0,
            dy: self.height,
            dz: 0.0,
        })
    }

    pub fn update(&mut self, car: &Point3d, heading: f64) {
        let desired = self.desired_eye(car, heading);

        self.eye = self.eye.lerp_towards(&desired, self.eye_gain);
        self.target = self.target.lerp_towards(car, self.target_gain);
    }

    /// snap_to places the camera at its goal immediately. Called on follow-target or camera-mode
    /// switches.
    pub fn snap_to(&mut self, car: &Point3d, heading: f64) {
        self.eye = self.desired_eye(car, heading);
        self.target = car.to_owned();
    }
}
