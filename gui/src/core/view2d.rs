use eframe::egui;
use helpers::buffer::HistoryBuffer;
use helpers::geometry::Point2d;
use replay::core::laps::TrackStatus;
use replay::core::normalize::SurfaceProjection;
use replay::core::replay::Replay;
use std::collections::HashMap;

const TRACK_STROKE: f32 = 3.0;
const PIT_STROKE: f32 = 5.0;
const CAR_RADIUS: f32 = 7.0;
const PADDING: f64 = 0.05;

fn status_color(status: TrackStatus) -> egui::Color32 {
    match status {
        TrackStatus::Green => egui::Color32::from_rgb(0, 200, 80),
        TrackStatus::Yellow => egui::Color32::from_rgb(255, 200, 0),
        TrackStatus::Vsc | TrackStatus::Sc => egui::Color32::from_rgb(255, 128, 0),
        TrackStatus::Unknown => egui::Color32::GRAY,
    }
}

/// draw_flat_view renders the top-down view: track outline, pit lane overlay, fading motion
/// trails, and one marker plus abbreviation label per visible car.
pub fn draw_flat_view(
    ui: &mut egui::Ui,
    replay: &Replay,
    trails: &HashMap<String, HistoryBuffer<Point2d>>,
    follow_driver: Option<&str>,
    info_text: &str,
) -> egui::Response {
    // PREPARATIONS ----------------------------------------------------------------------------
    // get UI handles
    let (response, painter) =
        ui.allocate_painter(ui.available_size_before_wrap_finite(), egui::Sense::drag());
    let rect = response.rect;

    // fit the rotated bounds into the canvas (the projection handles the vertical axis flip)
    let projection = SurfaceProjection::new(
        replay.bounds(),
        rect.width() as f64,
        rect.height() as f64,
        PADDING,
    );

    let to_screen = |p: &Point2d| -> egui::Pos2 {
        let s = projection.project(p);
        egui::Pos2 {
            x: rect.min.x + s.x as f32,
            y: rect.min.y + s.y as f32,
        }
    };

    // create vector for drawn shapes
    let mut shapes = vec![];

    // TRACK DRAWING ---------------------------------------------------------------------------
    // add track outline
    let outline: Vec<egui::Pos2> = replay.track_outline().iter().map(|p| to_screen(p)).collect();

    shapes.push(egui::Shape::line(
        outline,
        egui::Stroke::new(TRACK_STROKE, egui::Color32::WHITE),
    ));

    // add pit lane overlay
    if !replay.pit_path().is_empty() {
        let pit_path: Vec<egui::Pos2> = replay.pit_path().iter().map(|p| to_screen(p)).collect();

        shapes.push(egui::Shape::line(
            pit_path,
            egui::Stroke::new(PIT_STROKE, egui::Color32::from_rgb(255, 128, 0)),
        ));
    }

    // CARS DRAWING ----------------------------------------------------------------------------
    for driver_id in replay.driver_ids().iter() {
        let info = match replay.driver_info(driver_id) {
            Some(info) => info,
            None => continue,
        };
        let color = egui::Color32::from_rgb(info.color.r, info.color.g, info.color.b);

        // fading trail, oldest segment most transparent
        if let Some(trail) = trails.get(driver_id) {
            let points: Vec<egui::Pos2> = trail.iter().map(|p| to_screen(p)).collect();

            for (i, segment) in points.windows(2).enumerate() {
                let alpha = (255.0 * (i + 1) as f32 / points.len() as f32) as u8;
                let faded = egui::Color32::from_rgba_unmultiplied(
                    color.r(),
                    color.g(),
                    color.b(),
                    alpha,
                );

                shapes.push(egui::Shape::line_segment(
                    [segment[0], segment[1]],
                    egui::Stroke::new(2.0, faded),
                ));
            }
        }

        let pos = match replay.position_of(driver_id) {
            Some(pos) => to_screen(&pos),
            None => continue,
        };

        shapes.push(egui::Shape::circle_filled(pos, CAR_RADIUS, color));

        if follow_driver == Some(driver_id.as_str()) {
            shapes.push(egui::Shape::circle_stroke(
                pos,
                CAR_RADIUS + 4.0,
                egui::Stroke::new(2.0, egui::Color32::WHITE),
            ));
        }

        shapes.push(egui::Shape::text(
            ui.fonts(),
            egui::Pos2 {
                x: pos.x,
                y: pos.y - CAR_RADIUS - 8.0,
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

    // track status badge
    let status = replay.current_lap_status();
    shapes.push(egui::Shape::text(
        ui.fonts(),
        egui::Pos2 {
            x: rect.max.x - 8.0,
            y: rect.min.y + 8.0,
        },
        egui::Align2::RIGHT_TOP,
        status.label(),
        egui::TextStyle::Heading,
        status_color(status),
    ));

    // DRAWING ---------------------------------------------------------------------------------
    // update shapes in UI painter and return response
    painter.extend(shapes);
    response
}
