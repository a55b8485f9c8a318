pub mod core;
pub mod interfaces;
pub mod post;
pub mod pre;


#[cfg(test)]
mod clock_tests {
    use crate::core::clock::{ReplayClock, MAX_SPEED, MIN_SPEED};
    use approx::assert_ulps_eq;
    use std::time::{Duration, Instant};

    #[test]
    fn test_advance_is_elapsed_times_speed() {
        let t0 = Instant::now();
        let mut clock = ReplayClock::new(100.0);
        clock.set_speed(2.0);
        clock.play();

        // first tick only establishes the reference timestamp
        assert!(!clock.tick(t0));
        assert!(clock.tick(t0 + Duration::from_secs(3)));

        assert_ulps_eq!(clock.current_time(), 6.0);
    }

    #[test]
    fn test_reaching_end_clamps_and_pauses() {
        let t0 = Instant::now();
        let mut clock = ReplayClock::new(100.0);
        clock.seek(95.0);
        clock.play();
        clock.tick(t0);
        clock.tick(t0 + Duration::from_secs(10));

        assert_ulps_eq!(clock.current_time(), 100.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_play_at_end_rewinds() {
        let mut clock = ReplayClock::new(100.0);
        clock.seek(100.0);
        clock.play();

        assert_ulps_eq!(clock.current_time(), 0.0);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_pause_drops_reference_timestamp() {
        let t0 = Instant::now();
        let mut clock = ReplayClock::new(100.0);
        clock.play();
        clock.tick(t0);
        clock.pause();
        clock.play();

        // the long wall-clock gap across the pause must not be applied
        assert!(!clock.tick(t0 + Duration::from_secs(60)));
        assert_ulps_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_seek_clamps_and_ignores_non_finite() {
        let mut clock = ReplayClock::new(100.0);

        clock.seek(-5.0);
        assert_ulps_eq!(clock.current_time(), 0.0);

        clock.seek(1.0e9);
        assert_ulps_eq!(clock.current_time(), 100.0);

        clock.seek(50.0);
        clock.seek(f64::NAN);
        assert_ulps_eq!(clock.current_time(), 50.0);
    }

    #[test]
    fn test_set_speed_clamps_and_ignores_non_finite() {
        let mut clock = ReplayClock::new(100.0);

        clock.set_speed(0.001);
        assert_ulps_eq!(clock.speed(), MIN_SPEED);

        clock.set_speed(1.0e6);
        assert_ulps_eq!(clock.speed(), MAX_SPEED);

        clock.set_speed(4.0);
        clock.set_speed(f64::INFINITY);
        assert_ulps_eq!(clock.speed(), 4.0);
    }
}


#[cfg(test)]
mod status_tests {
    use crate::core::laps::{Compound, LapRecord};
    use crate::core::status::*;

    fn record(driver: &str, lap: u32, pit_in: Option<f64>, pit_out: Option<f64>) -> LapRecord {
        LapRecord {
            driver: String::from(driver),
            lap,
            lap_time: None,
            compound: Compound::Hard,
            tyre_life: None,
            pit_in,
            pit_out,
            lap_start: None,
            position: None,
            track_statuses: vec![],
            stint: None,
        }
    }

    #[test]
    fn test_classification_states() {
        let mut records = vec![];
        for lap in 1..=30 {
            records.push(record("VET", lap, None, None));
        }
        for lap in 1..=52 {
            records.push(record("HAM", lap, None, None));
        }

        let driver_ids = vec![
            String::from("VET"),
            String::from("HAM"),
            String::from("HUL"),
        ];
        let statuses = classify_drivers(&records, 52, &driver_ids);

        let vet = statuses.get("VET").unwrap();
        assert_eq!(vet.state, DriverState::Retired);
        assert_eq!(vet.retired_lap, Some(30));
        assert_eq!(vet.laps_completed, 30);

        let ham = statuses.get("HAM").unwrap();
        assert_eq!(ham.state, DriverState::Racing);
        assert_eq!(ham.retired_lap, None);

        // no lap rows at all
        let hul = statuses.get("HUL").unwrap();
        assert_eq!(hul.state, DriverState::DidNotStart);
        assert_eq!(hul.laps_completed, 0);
    }

    #[test]
    fn test_pit_lane_start_signature() {
        // a pit exit without a pit entry on lap 1 marks a pit lane start
        let records = vec![
            record("GAS", 1, None, Some(12.0)),
            record("GAS", 2, None, None),
            record("HAM", 1, Some(80.0), Some(95.0)),
            record("HAM", 2, None, None),
        ];

        let driver_ids = vec![String::from("GAS"), String::from("HAM")];
        let statuses = classify_drivers(&records, 2, &driver_ids);

        assert!(statuses.get("GAS").unwrap().pit_lane_start);
        assert!(!statuses.get("HAM").unwrap().pit_lane_start);
    }
}

#[cfg(test)]
mod normalize_tests {
    use crate::core::normalize::*;
    use approx::assert_ulps_eq;
    use helpers::geometry::Point2d;

    fn bounds() -> TrackBounds {
        TrackBounds::from_points(
            vec![Point2d { x: 0.0, y: 0.0 }, Point2d { x: 10.0, y: 20.0 }].into_iter(),
        )
        .unwrap()
    }

    #[test]
    fn test_bounds_and_normalization() {
        let b = bounds();

        assert_ulps_eq!(b.span_x(), 10.0);
        assert_ulps_eq!(b.span_y(), 20.0);

        let norm = b.normalized(&Point2d { x: 5.0, y: 10.0 });
        assert_ulps_eq!(norm.x, 0.5);
        assert_ulps_eq!(norm.y, 0.5);
    }

    #[test]
    fn test_no_points_yield_no_bounds() {
        assert!(TrackBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_surface_projection_flips_vertical_axis() {
        let proj = SurfaceProjection::new(&bounds(), 100.0, 100.0, 0.0);

        let p = proj.project(&Point2d { x: 0.0, y: 0.0 });
        assert_ulps_eq!(p.x, 0.0);
        assert_ulps_eq!(p.y, 100.0);

        let p = proj.project(&Point2d { x: 10.0, y: 20.0 });
        assert_ulps_eq!(p.x, 100.0);
        assert_ulps_eq!(p.y, 0.0);
    }

    #[test]
    fn test_surface_projection_padding() {
        let proj = SurfaceProjection::new(&bounds(), 100.0, 100.0, 0.1);

        let p = proj.project(&Point2d { x: 0.0, y: 0.0 });
        assert_ulps_eq!(p.x, 10.0);
        assert_ulps_eq!(p.y, 90.0);
    }

    #[test]
    fn test_surface_projection_is_deterministic() {
        let proj = SurfaceProjection::new(&bounds(), 640.0, 480.0, 0.05);
        let query = Point2d { x: 3.7, y: 11.2 };

        let p1 = proj.project(&query);
        let p2 = proj.project(&query);
        assert_ulps_eq!(p1.x, p2.x);
        assert_ulps_eq!(p1.y, p2.y);
    }

    #[test]
    fn test_degenerate_bounds_stay_finite() {
        let b =
            TrackBounds::from_points(vec![Point2d { x: 5.0, y: 5.0 }].into_iter()).unwrap();
        let proj = SurfaceProjection::new(&b, 100.0, 100.0, 0.1);

        let p = proj.project(&Point2d { x: 5.0, y: 5.0 });
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn test_world_projection_depth_sign() {
        let proj = WorldProjection::new(&bounds(), 200.0, 0.5);

        let p = proj.project(&Point2d { x: 0.0, y: 0.0 });
        assert_ulps_eq!(p.x, -100.0);
        assert_ulps_eq!(p.y, 0.5);
        assert_ulps_eq!(p.z, 100.0);

        // the second track axis maps to the negative depth axis
        let p = proj.project(&Point2d { x: 10.0, y: 20.0 });
        assert_ulps_eq!(p.z, -100.0);
    }
}

#[cfg(test)]
mod heading_tests {
    use crate::core::heading::HeadingTracker;
    use approx::assert_ulps_eq;
    use helpers::geometry::Point2d;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_first_valid_bearing_snaps() {
        let mut tracker = HeadingTracker::new(1.0, 0.5);
        assert!(!tracker.initialized());

        tracker.update(&Point2d { x: 0.0, y: 0.0 });
        assert!(!tracker.initialized());

        tracker.update(&Point2d { x: 0.0, y: 2.0 });
        assert!(tracker.initialized());
        assert_ulps_eq!(tracker.heading(), FRAC_PI_2);
    }

    #[test]
    fn test_noise_below_threshold_is_ignored() {
        let mut tracker = HeadingTracker::new(1.0, 0.5);
        tracker.update(&Point2d { x: 0.0, y: 0.0 });
        tracker.update(&Point2d { x: 2.0, y: 0.0 });

        // jitter around the reference position must not disturb the heading
        tracker.update(&Point2d { x: 2.1, y: 0.3 });
        assert_ulps_eq!(tracker.heading(), 0.0);

        // small displacements accumulate against the kept reference position
        tracker.update(&Point2d { x: 2.0, y: 1.5 });
        assert!(tracker.heading() > 0.0);
    }

    #[test]
    fn test_smoothing_never_snaps_after_init() {
        let mut tracker = HeadingTracker::new(1.0, 0.5);
        tracker.update(&Point2d { x: 0.0, y: 0.0 });
        tracker.update(&Point2d { x: 2.0, y: 0.0 });
        tracker.update(&Point2d { x: 2.0, y: 2.0 });

        // a 90 degree raw change moves the heading only by the filter gain
        assert_ulps_eq!(tracker.heading(), FRAC_PI_4);
    }

    #[test]
    fn test_reset_drops_history() {
        let mut tracker = HeadingTracker::new(1.0, 0.5);
        tracker.update(&Point2d { x: 0.0, y: 0.0 });
        tracker.update(&Point2d { x: 2.0, y: 0.0 });
        tracker.reset();

        assert!(!tracker.initialized());
        assert_ulps_eq!(tracker.heading(), 0.0);

        // after a reset the next valid bearing snaps again instead of being smoothed
        tracker.update(&Point2d { x: 0.0, y: 0.0 });
        tracker.update(&Point2d { x: 0.0, y: 2.0 });
        assert_ulps_eq!(tracker.heading(), FRAC_PI_2);
    }
}


#[cfg(test)]
mod replay_tests {
    use crate::core::laps::{Compound, LapRecord, TrackStatus};
    use crate::core::replay::Replay;
    use crate::core::series::PositionSeries;
    use crate::core::status::DriverState;
    use crate::interfaces::gui_interface::{LoadedData, RgbColor};
    use crate::pre::read_race_data::{
        CircuitPars, DriverInfo, RaceData, SessionInfo, Weather,
    };
    use approx::assert_ulps_eq;
    use helpers::geometry::Point2d;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    fn driver(number: &str, abbr: &str) -> DriverInfo {
        DriverInfo {
            number: String::from(number),
            abbr: String::from(abbr),
            name: String::from(abbr),
            team: String::from("Team"),
            color: RgbColor::default(),
        }
    }

    fn record(driver: &str, lap: u32, lap_start: f64, position: u32) -> LapRecord {
        LapRecord {
            driver: String::from(driver),
            lap,
            lap_time: Some(60.0),
            compound: Compound::Soft,
            tyre_life: Some(lap),
            pit_in: None,
            pit_out: None,
            lap_start: Some(lap_start),
            position: Some(position),
            track_statuses: vec![TrackStatus::Green],
            stint: Some(1),
        }
    }

    fn loaded_data() -> LoadedData {
        let mut drivers = HashMap::new();
        drivers.insert(String::from("HAM"), driver("44", "HAM"));
        drivers.insert(String::from("BOT"), driver("77", "BOT"));
        drivers.insert(String::from("HUL"), driver("27", "HUL"));

        // HAM finishes both laps, BOT retires after lap 1, HUL never starts
        let laps = vec![
            record("HAM", 1, 0.0, 1),
            record("HAM", 2, 60.0, 1),
            record("BOT", 1, 0.5, 2),
        ];

        let mut positions = HashMap::new();
        positions.insert(
            String::from("HAM"),
            PositionSeries::new(
                vec![0.0, 60.0, 120.0],
                vec![0.0, 50.0, 100.0],
                vec![0.0, 0.0, 0.0],
            )
            .unwrap(),
        );
        positions.insert(
            String::from("BOT"),
            PositionSeries::new(
                vec![0.0, 60.0, 120.0],
                vec![0.0, 40.0, 80.0],
                vec![10.0, 10.0, 10.0],
            )
            .unwrap(),
        );

        LoadedData {
            race_data: RaceData {
                session: SessionInfo {
                    name: String::from("Race"),
                    circuit: String::from("Circuit"),
                    total_laps: 2,
                    weather: Weather::default(),
                },
                drivers,
                track_outline: vec![
                    Point2d { x: 0.0, y: 0.0 },
                    Point2d { x: 100.0, y: 0.0 },
                    Point2d { x: 100.0, y: 100.0 },
                ],
                laps,
                insights: HashMap::new(),
            },
            positions,
            circuit_pars: CircuitPars::default(),
        }
    }

    #[test]
    fn test_construction_derives_state() {
        let replay = Replay::new(loaded_data()).unwrap();

        assert_ulps_eq!(replay.max_time(), 120.0);
        assert_eq!(replay.current_lap(), 1);
        assert_eq!(replay.total_laps(), 2);
        assert_eq!(replay.driver_ids().len(), 3);
    }

    #[test]
    fn test_seek_updates_lap_and_generation() {
        let mut replay = Replay::new(loaded_data()).unwrap();
        let gen0 = replay.generation();

        replay.seek(70.0);
        assert_eq!(replay.current_lap(), 2);
        assert_eq!(replay.generation(), gen0 + 1);

        // seeking is idempotent in its queries
        let p1 = replay.position_of("HAM").unwrap();
        replay.seek(70.0);
        let p2 = replay.position_of("HAM").unwrap();
        assert_ulps_eq!(p1.x, p2.x);
        assert_ulps_eq!(p1.y, p2.y);
    }

    #[test]
    fn test_jump_to_lap() {
        let mut replay = Replay::new(loaded_data()).unwrap();

        replay.jump_to_lap(2);
        assert_ulps_eq!(replay.current_time(), 60.0);
        assert_eq!(replay.current_lap(), 2);

        replay.jump_to_lap(1);
        assert_ulps_eq!(replay.current_time(), 0.0);
    }

    #[test]
    fn test_position_queries() {
        let mut replay = Replay::new(loaded_data()).unwrap();

        replay.seek(30.0);
        let p = replay.position_of("HAM").unwrap();
        assert_ulps_eq!(p.x, 25.0);

        // a driver without lap rows did not start and is never rendered
        assert!(replay.position_of("HUL").is_none());
        assert_eq!(
            replay.status_of("HUL").unwrap().state,
            DriverState::DidNotStart
        );
    }

    #[test]
    fn test_heading_requires_observed_movement() {
        let t0 = Instant::now();
        let mut replay = Replay::new(loaded_data()).unwrap();

        // no movement observed yet, so no facing angle may be reported
        assert!(replay.heading_of("HAM").is_none());

        replay.play();
        replay.tick(t0);
        replay.tick(t0 + Duration::from_secs(5));
        replay.tick(t0 + Duration::from_secs(10));

        // HAM covers well over the noise threshold between the ticks
        assert_ulps_eq!(replay.heading_of("HAM").unwrap(), 0.0);

        // a seek discontinuity drops the heading until new movement is observed
        replay.seek(30.0);
        assert!(replay.heading_of("HAM").is_none());
    }

    #[test]
    fn test_retired_car_disappears_after_cutoff() {
        let mut replay = Replay::new(loaded_data()).unwrap();

        // BOT retired on lap 1; the cutoff is the start of lap 2 plus the retire grace
        replay.seek(60.0);
        assert!(replay.position_of("BOT").is_some());

        replay.seek(70.0);
        assert!(replay.position_of("BOT").is_none());
        assert_eq!(
            replay.status_of("BOT").unwrap().retired_lap,
            Some(1)
        );
    }

    #[test]
    fn test_standings_sorted_by_position() {
        let replay = Replay::new(loaded_data()).unwrap();
        let standings = replay.standings();

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0], (String::from("HAM"), 1));
        assert_eq!(standings[1], (String::from("BOT"), 2));
    }

    #[test]
    fn test_rotation_applied_to_all_geometry() {
        let mut data = loaded_data();
        data.circuit_pars.rotation_deg = 90.0;

        let mut replay = Replay::new(data).unwrap();
        replay.seek(30.0);

        // the raw position (25, 0) maps to (0, 25) in the rotated frame
        let p = replay.position_of("HAM").unwrap();
        assert_ulps_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_ulps_eq!(p.y, 25.0);

        let outline = replay.track_outline();
        assert_ulps_eq!(outline[1].x, 0.0, epsilon = 1e-12);
        assert_ulps_eq!(outline[1].y, 100.0);
    }

    #[test]
    fn test_classification_report() {
        let replay = Replay::new(loaded_data()).unwrap();
        let report = replay.get_classification();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.total_laps, 2);

        let bot = report.rows.iter().find(|row| row.abbr == "BOT").unwrap();
        assert_eq!(bot.state, "Retired");
        assert_eq!(bot.laps_completed, 1);
    }
}
