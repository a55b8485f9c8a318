use eframe::egui;
use helpers::geometry::{Point3d, Vector3d};
use replay::core::camera::FollowCamera;
use replay::core::normalize::WorldProjection;
use replay::core::replay::Replay;

const WORLD_EXTENT: f64 = 200.0;
const CAR_HEIGHT: f64 = 0.5;
const FOV_Y: f64 = 60.0;
const NEAR_PLANE: f64 = 1.0;

/// PerspectiveCamera is the screen-space projection built from an eye point and a look target
/// (pinhole model with a vertical field of view). Points behind the near plane are culled.
struct PerspectiveCamera {
    eye: Point3d,
    forward: Vector3d,
    right: Vector3d,
    up: Vector3d,
    focal: f64,
    center: egui::Pos2,
}

impl PerspectiveCamera {
    fn new(eye: &Point3d, target: &Point3d, rect: &egui::Rect) -> PerspectiveCamera {
        let forward = target
            .as_vector3d()
            .sub(&eye.as_vector3d())
            .normalized();
        let world_up = Vector3d {
            dx: 0.0,
            dy: 1.0,
            dz: 0.0,
        };
        let right = forward.cross(&world_up).normalized();
        let up = right.cross(&forward);

        PerspectiveCamera {
            eye: eye.to_owned(),
            forward,
            right,
            up,
            focal: 0.5 * rect.height() as f64 / (FOV_Y.to_radians() * 0.5).tan(),
            center: rect.center(),
        }
    }

    /// project returns the screen position and the view-space depth, or None if the point lies
    /// behind the near plane.
    fn project(&self, p: &Point3d) -> Option<(egui::Pos2, f64)> {
        let rel = p.as_vector3d().sub(&self.eye.as_vector3d());
        let depth = rel.dot(&self.forward);

        if depth < NEAR_PLANE {
            return None;
        }

        let x = rel.dot(&self.right) * self.focal / depth;
        let y = rel.dot(&self.up) * self.focal / depth;

        Some((
            egui::Pos2 {
                x: self.center.x + x as f32,
                y: self.center.y - y as f32,
            },
            depth,
        ))
    }
}

/// advance_follow_camera moves the follow camera for one frame. A pending discontinuity (follow
/// target or view mode switch, or the target becoming visible for the first time) places the
/// camera at its goal immediately; otherwise the camera lerps toward its goals, which would sweep
/// across the whole map on a target switch.
pub fn advance_follow_camera(
    camera: &mut FollowCamera,
    car: &Point3d,
    heading: f64,
    snap_pending: &mut bool,
) {
    if *snap_pending {
        camera.snap_to(car, heading);
        *snap_pending = false;
    } else {
        camera.update(car, heading);
    }
}

fn polyline_shapes(
    camera: &PerspectiveCamera,
    path: &[Point3d],
    stroke: egui::Stroke,
    shapes: &mut Vec<egui::Shape>,
) {
    for segment in path.windows(2) {
        if let (Some((p1, _)), Some((p2, _))) =
            (camera.project(&segment[0]), camera.project(&segment[1]))
        {
            shapes.push(egui::Shape::line_segment([p1, p2], stroke));
        }
    }
}

/// draw_world_view renders the 3D view: the track in a perspective projection, cars as
/// depth-scaled markers with a heading tick, and either a fixed overview camera or the follow
/// camera behind the selected car.
pub fn draw_world_view(
    ui: &mut egui::Ui,
    replay: &Replay,
    follow_camera: &mut FollowCamera,
    camera_snap_pending: &mut bool,
    follow_driver: Option<&str>,
    info_text: &str,
) -> egui::Response {
    // PREPARATIONS ----------------------------------------------------------------------------
    // get UI handles
    let (response, painter) =
        ui.allocate_painter(ui.available_size_before_wrap_finite(), egui::Sense::drag());
    let rect = response.rect;

    let world = WorldProjection::new(replay.bounds(), WORLD_EXTENT, CAR_HEIGHT);

    // CAMERA ----------------------------------------------------------------------------------
    // follow the selected car if it is visible, otherwise fall back to the fixed overview
    let followed = follow_driver.and_then(|driver_id| {
        let pos = replay.position_of(driver_id)?;
        let heading = replay.heading_of(driver_id)?;
        Some((world.project(&pos), heading))
    });

    let camera = match followed {
        Some((car, heading)) => {
            advance_follow_camera(follow_camera, &car, heading, camera_snap_pending);
            PerspectiveCamera::new(&follow_camera.eye, &follow_camera.target, &rect)
        }
        None => PerspectiveCamera::new(
            &Point3d {
                x: 0.0,
                y: world.extent() * 0.7,
                z: world.extent() * 0.9,
            },
            &Point3d {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            &rect,
        ),
    };

    // create vector for drawn shapes
    let mut shapes = vec![];

    // TRACK DRAWING ---------------------------------------------------------------------------
    let outline: Vec<Point3d> = replay
        .track_outline()
        .iter()
        .map(|p| {
            let mut p3 = world.project(p);
            p3.y = 0.0;
            p3
        })
        .collect();
    polyline_shapes(
        &camera,
        &outline,
        egui::Stroke::new(2.0, egui::Color32::WHITE),
        &mut shapes,
    );

    if !replay.pit_path().is_empty() {
        let pit_path: Vec<Point3d> = replay
            .pit_path()
            .iter()
            .map(|p| {
                let mut p3 = world.project(p);
                p3.y = 0.0;
                p3
            })
            .collect();
        polyline_shapes(
            &camera,
            &pit_path,
            egui::Stroke::new(3.0, egui::Color32::from_rgb(255, 128, 0)),
            &mut shapes,
        );
    }

    // CARS DRAWING ----------------------------------------------------------------------------
    for driver_id in replay.driver_ids().iter() {
        let info = match replay.driver_info(driver_id) {
            Some(info) => info,
            None => continue,
        };
        let pos = match replay.position_of(driver_id) {
            Some(pos) => pos,
            None => continue,
        };

        let car = world.project(&pos);
        let (screen_pos, depth) = match camera.project(&car) {
            Some(projected) => projected,
            None => continue,
        };

        let color = egui::Color32::from_rgb(info.color.r, info.color.g, info.color.b);
        let radius = (600.0 / depth).min(14.0).max(2.0) as f32;

        // heading tick pointing along the direction of travel
        if let Some(heading) = replay.heading_of(driver_id) {
            let tip = car.shift(
                &Vector3d {
                    dx: heading.cos(),
                    dy: 0.0,
                    dz: -heading.sin(),
                }
                .mult(4.0),
            );

            if let Some((tip_pos, _)) = camera.project(&tip) {
                shapes.push(egui::Shape::line_segment(
                    [screen_pos, tip_pos],
                    egui::Stroke::new(2.0, color),
                ));
            }
        }

        shapes.push(egui::Shape::circle_filled(screen_pos, radius, color));

        shapes.push(egui::Shape::text(
            ui.fonts(),
            egui::Pos2 {
                x: screen_pos.x,
                y: screen_pos.y - radius - 8.0,
            },
            egui::Align2::CENTER_CENTER,
            &info.abbr,
            egui::TextStyle::Body,
            color,
        ));
    }

    // GENERAL INFORMATION TEXT ----------------------------------------------------------------
    shapes.push(egui::Shape::text(
        ui.fonts(),
        egui::Pos2 {
            x: rect.min.x + 8.0,
            y: rect.min.y + 8.0,
        },
        egui::Align2::LEFT_TOP,
        info_text,
        egui::TextStyle::Body,
        egui::Color32::WHITE,
    ));

    // DRAWING ---------------------------------------------------------------------------------
    // update shapes in UI painter and return response
    painter.extend(shapes);
    response
}
