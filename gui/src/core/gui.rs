use crate::core::view2d::draw_flat_view;
use crate::core::view3d::draw_world_view;
use crate::interfaces::load_interface::LoadInterface;
use eframe::{egui, epi};
use flume::Receiver;
use helpers::buffer::{HistoryBuffer, RingBuffer};
use helpers::general::fmt_racetime;
use helpers::geometry::Point2d;
use replay::core::camera::FollowCamera;
use replay::core::clock::{MAX_SPEED, MIN_SPEED};
use replay::core::replay::Replay;
use replay::interfaces::gui_interface::LoadMessage;
use replay::pre::replay_opts::ReplayOpts;
use std::collections::HashMap;
use std::fmt::Write;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Flat,
    World,
}

pub struct ReplayApp {
    load_interface: LoadInterface,
    replay: Option<Replay>,
    start_time: f64,
    start_speed: f64,
    view_mode: ViewMode,
    follow_driver: Option<String>,
    camera: FollowCamera,
    camera_snap_pending: bool,
    trails: HashMap<String, HistoryBuffer<Point2d>>,
    trail_generation: u64,
    speed_slider: f64,
    prev_update: Instant,
    prev_update_durations: RingBuffer<u32>,
}

impl ReplayApp {
    pub fn new(rx: Receiver<LoadMessage>, replay_opts: &ReplayOpts) -> ReplayApp {
        ReplayApp {
            load_interface: LoadInterface::new(rx),
            replay: None,
            start_time: replay_opts.start_time,
            start_speed: replay_opts.speed,
            view_mode: ViewMode::Flat,
            follow_driver: None,
            camera: FollowCamera::new(12.0, 5.0, 0.08, 0.25),
            camera_snap_pending: true,
            trails: HashMap::new(),
            trail_generation: 0,
            speed_slider: replay_opts.speed,
            prev_update: Instant::now(),
            prev_update_durations: RingBuffer::new(10),
        }
    }

    /// poll_loader checks for the loaded payloads and builds the replay once they arrive. The
    /// start options of the CLI are applied exactly once here.
    fn poll_loader(&mut self) {
        let data = match self.load_interface.update() {
            Some(data) => data,
            None => return,
        };

        match Replay::new(*data) {
            Ok(mut replay) => {
                replay.set_speed(self.start_speed);
                replay.seek(self.start_time);
                replay.play();

                self.speed_slider = replay.speed();
                self.trail_generation = replay.generation();
                self.replay = Some(replay);
            }
            Err(e) => self.load_interface.error = Some(format!("{:#}", e)),
        }
    }

    /// update_trails appends the current positions to the per-driver motion histories. A changed
    /// generation marks a seek discontinuity, in which case all histories are cleared first.
    fn update_trails(&mut self, advanced: bool) {
        let replay = match self.replay.as_ref() {
            Some(replay) => replay,
            None => return,
        };

        if replay.generation() != self.trail_generation {
            self.trail_generation = replay.generation();
            for trail in self.trails.values_mut() {
                trail.clear();
            }
        }

        if !advanced {
            return;
        }

        let trail_length = replay.pars().trail_length;

        for driver_id in replay.driver_ids().iter() {
            if let Some(pos) = replay.position_of(driver_id) {
                self.trails
                    .entry(driver_id.to_owned())
                    .or_insert_with(|| HistoryBuffer::new(trail_length))
                    .push(pos);
            }
        }
    }

    /// info_text composes the session header shown in the canvas corner, including the GUI update
    /// frequency readout.
    fn info_text(&mut self) -> String {
        let mut text = String::new();

        if let Some(replay) = self.replay.as_ref() {
            writeln!(
                &mut text,
                "{} ({})",
                replay.session().name,
                replay.session().circuit
            )
            .unwrap();
            writeln!(
                &mut text,
                "Lap: {}/{}",
                replay.current_lap(),
                replay.total_laps()
            )
            .unwrap();
            writeln!(
                &mut text,
                "Time: {} / {}",
                fmt_racetime(replay.current_time()),
                fmt_racetime(replay.max_time())
            )
            .unwrap();

            let weather = &replay.session().weather;
            if let (Some(air_temp), Some(track_temp)) = (weather.air_temp, weather.track_temp) {
                let humidity = match weather.humidity {
                    Some(humidity) => format!(", Humidity: {:.0}%", humidity),
                    None => String::new(),
                };
                writeln!(
                    &mut text,
                    "Air: {:.0}°C, Track: {:.0}°C{}{}",
                    air_temp,
                    track_temp,
                    humidity,
                    if weather.rainfall { ", Rain" } else { "" }
                )
                .unwrap();
            }
        }

        // calculate current UI update duration, append it to the buffer, and set update time
        self.prev_update_durations
            .push(self.prev_update.elapsed().as_millis() as u32);
        self.prev_update = Instant::now();

        write!(
            &mut text,
            "GUI update frequency: {:.0} Hz",
            1000.0 / self.prev_update_durations.get_avg().unwrap()
        )
        .unwrap();

        text
    }
}

impl epi::App for ReplayApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::CtxRef, _frame: &mut epi::Frame) {
        // wait for the loader thread until the payloads arrive
        if self.replay.is_none() {
            self.poll_loader();
        }

        // advance the replay and the motion trails
        let advanced = match self.replay.as_mut() {
            Some(replay) => replay.tick(Instant::now()),
            None => false,
        };
        self.update_trails(advanced);

        let info_text = self.info_text();

        // split borrows for the UI closures
        let ReplayApp {
            load_interface,
            replay,
            view_mode,
            follow_driver,
            camera,
            camera_snap_pending,
            trails,
            speed_slider,
            ..
        } = self;

        egui::CentralPanel::default().show(ctx, |ui| {
            let replay = match replay.as_mut() {
                Some(replay) => replay,
                None => {
                    // loading screen
                    match load_interface.error.as_ref() {
                        Some(error) => {
                            ui.colored_label(egui::Color32::RED, format!("Load failed: {}", error))
                        }
                        None => ui.label(&load_interface.progress),
                    };
                    return;
                }
            };

            // TRANSPORT CONTROLS --------------------------------------------------------------
            ui.horizontal(|ui| {
                let play_label = if replay.is_playing() { "Pause" } else { "Play" };
                if ui.button(play_label).clicked() {
                    if replay.is_playing() {
                        replay.pause();
                    } else {
                        replay.play();
                    }
                }

                let mut cur_time = replay.current_time();
                let time_slider = ui.add(
                    egui::Slider::new(&mut cur_time, 0.0..=replay.max_time()).show_value(false),
                );
                if time_slider.changed() {
                    replay.seek(cur_time);
                }

                let speed_response = ui.add(
                    egui::Slider::new(speed_slider, MIN_SPEED..=MAX_SPEED)
                        .logarithmic(true)
                        .text("speed"),
                );
                if speed_response.changed() {
                    replay.set_speed(*speed_slider);
                }

                if ui.button("⏮ lap").clicked() && replay.current_lap() > 1 {
                    replay.jump_to_lap(replay.current_lap() - 1);
                }
                if ui.button("lap ⏭").clicked() {
                    replay.jump_to_lap(replay.current_lap() + 1);
                }

                // a view mode switch must not resume the camera mid-sweep from a stale pose
                if ui.radio_value(view_mode, ViewMode::Flat, "2D").changed() {
                    *camera_snap_pending = true;
                }
                if ui.radio_value(view_mode, ViewMode::World, "3D").changed() {
                    *camera_snap_pending = true;
                }
            });

            // CANVAS --------------------------------------------------------------------------
            egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                match view_mode {
                    ViewMode::Flat => {
                        draw_flat_view(ui, replay, trails, follow_driver.as_deref(), &info_text)
                    }
                    ViewMode::World => draw_world_view(
                        ui,
                        replay,
                        camera,
                        camera_snap_pending,
                        follow_driver.as_deref(),
                        &info_text,
                    ),
                };
            });
        });

        // STANDINGS AND INSIGHTS WINDOWS ------------------------------------------------------
        if let Some(replay) = self.replay.as_ref() {
            let mut follow_click: Option<String> = None;

            egui::Window::new("Standings").show(ctx, |ui| {
                for (driver_id, position) in replay.standings().into_iter() {
                    let info = match replay.driver_info(&driver_id) {
                        Some(info) => info,
                        None => continue,
                    };
                    let status_label = replay
                        .status_of(&driver_id)
                        .map(|status| status.state.label())
                        .unwrap_or("—");
                    let tire_label = match replay.current_tire(&driver_id) {
                        Some((compound, Some(age))) => {
                            format!("{} ({})", compound.abbrev(), age)
                        }
                        Some((compound, None)) => String::from(compound.abbrev()),
                        None => String::from("?"),
                    };

                    let selected = self.follow_driver.as_deref() == Some(driver_id.as_str());
                    ui.horizontal(|ui| {
                        ui.colored_label(
                            egui::Color32::from_rgb(info.color.r, info.color.g, info.color.b),
                            "●",
                        );
                        let row = ui.selectable_label(
                            selected,
                            format!(
                                "P{:<2} {} {} {}",
                                position, info.abbr, tire_label, status_label
                            ),
                        );
                        if row.clicked() {
                            follow_click = Some(driver_id);
                        }
                    });
                }
            });

            egui::Window::new("Lap insights").show(ctx, |ui| {
                let events = replay.insights_for_current_lap();
                if events.is_empty() {
                    ui.label("No events this lap");
                }

                for event in events.iter() {
                    let color = event
                        .color
                        .as_ref()
                        .map(|c| egui::Color32::from_rgb(c.r, c.g, c.b))
                        .unwrap_or(egui::Color32::WHITE);
                    ui.colored_label(color, format!("{} {}", event.icon, event.title));
                    ui.label(&event.detail);
                }
            });

            // resolve a standings click to a follow-target toggle; the camera snaps to the new
            // target instead of sweeping across the map
            if let Some(driver_id) = follow_click {
                if self.follow_driver.as_deref() == Some(driver_id.as_str()) {
                    self.follow_driver = None;
                } else {
                    self.follow_driver = Some(driver_id);
                }
                self.camera_snap_pending = true;
            }
        }

        // request repaint of the UI
        ctx.request_repaint();
    }

    fn name(&self) -> &str {
        "Race Replay"
    }
}
