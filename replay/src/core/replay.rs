use crate::core::clock::ReplayClock;
use crate::core::heading::HeadingTracker;
use crate::core::laps::{
    positions_at_lap, track_status_for_lap, Compound, LapIndex, LapRecord, TrackStatus,
};
use crate::core::normalize::{rotate_path, TrackBounds};
use crate::core::series::PositionSeries;
use crate::core::status::{classify_drivers, DriverState, DriverStatus};
use crate::interfaces::gui_interface::LoadedData;
use crate::post::classification::{ClassificationReport, ClassificationRow};
use crate::pre::read_race_data::{CircuitPars, DriverInfo, InsightEvent, SessionInfo};
use anyhow::Context;
use helpers::general::{argsort, InputValueError, SortOrder};
use helpers::geometry::Point2d;
use std::collections::HashMap;
use std::time::Instant;

/// Replay is the facade over the whole engine: it owns the clock, the rotated geometry, the lap
/// table and the per-driver state, and exposes the queries the rendering layers need per frame.
/// The circuit rotation is applied once here at construction; everything downstream (bounds,
/// interpolation, headings, projections) works in the rotated frame.
pub struct Replay {
    session: SessionInfo,
    drivers: HashMap<String, DriverInfo>,
    driver_ids: Vec<String>,
    series: HashMap<String, PositionSeries>,
    track_outline: Vec<Point2d>,
    pit_path: Vec<Point2d>,
    bounds: TrackBounds,
    records: Vec<LapRecord>,
    lap_index: LapIndex,
    insights: HashMap<u32, Vec<InsightEvent>>,
    statuses: HashMap<String, DriverStatus>,
    headings: HashMap<String, HeadingTracker>,
    clock: ReplayClock,
    pars: CircuitPars,
    cur_lap: u32,
    cur_lap_status: TrackStatus,
    cur_positions: HashMap<String, u32>,
    generation: u64,
}

impl Replay {
    pub fn new(data: LoadedData) -> anyhow::Result<Replay> {
        let LoadedData {
            race_data,
            positions,
            circuit_pars,
        } = data;

        let rotation = circuit_pars.rotation_deg.to_radians();

        // rotate all geometry once up front so every consumer sees one consistent frame
        let track_outline = rotate_path(&race_data.track_outline, rotation);
        let pit_path = rotate_path(&circuit_pars.pit_lane_points(), rotation);

        let mut series = HashMap::with_capacity(positions.len());
        for (driver_id, driver_series) in positions.into_iter() {
            series.insert(driver_id, driver_series.rotate(rotation));
        }

        // bounds cover the track outline, every position sample, and the pit lane overlay, so no
        // projected geometry can leave the fitted region
        let all_points = track_outline
            .iter()
            .cloned()
            .chain(series.values().flat_map(|s| s.points()))
            .chain(pit_path.iter().cloned());
        let bounds = TrackBounds::from_points(all_points)
            .ok_or(InputValueError)
            .context("The payloads contain no track or position geometry!")?;

        let max_time = series
            .values()
            .filter_map(|s| s.last_t())
            .fold(0.0, f64::max);

        let mut driver_ids: Vec<String> = race_data.drivers.keys().cloned().collect();
        driver_ids.sort_unstable();

        let statuses = classify_drivers(
            &race_data.laps,
            race_data.session.total_laps,
            &driver_ids,
        );

        let mut headings = HashMap::with_capacity(driver_ids.len());
        for driver_id in driver_ids.iter() {
            headings.insert(
                driver_id.to_owned(),
                HeadingTracker::new(
                    circuit_pars.heading_noise_threshold,
                    circuit_pars.heading_gain,
                ),
            );
        }

        let lap_index = LapIndex::from_records(&race_data.laps);

        let mut replay = Replay {
            session: race_data.session,
            drivers: race_data.drivers,
            driver_ids,
            series,
            track_outline,
            pit_path,
            bounds,
            records: race_data.laps,
            lap_index,
            insights: race_data.insights,
            statuses,
            headings,
            clock: ReplayClock::new(max_time),
            pars: circuit_pars,
            cur_lap: 0,
            cur_lap_status: TrackStatus::Green,
            cur_positions: HashMap::new(),
            generation: 0,
        };
        replay.refresh_lap_state();

        Ok(replay)
    }

    /// tick advances the clock and, if time moved, updates the per-driver headings and the
    /// lap-derived state. Lap status and standings are recomputed only when the lap changes since
    /// both are constant within a lap.
    pub fn tick(&mut self, now: Instant) -> bool {
        let advanced = self.clock.tick(now);

        if advanced {
            self.update_headings();

            if self.lap_index.lap_at(self.clock.current_time()) != self.cur_lap {
                self.refresh_lap_state();
            }
        }

        advanced
    }

    fn update_headings(&mut self) {
        let t = self.clock.current_time();

        for driver_id in self.driver_ids.iter() {
            let pos = match position_query(
                t,
                driver_id,
                &self.series,
                &self.statuses,
                &self.lap_index,
                &self.pars,
            ) {
                Some(pos) => pos,
                None => continue,
            };

            if let Some(tracker) = self.headings.get_mut(driver_id) {
                tracker.update(&pos);
            }
        }
    }

    fn refresh_lap_state(&mut self) {
        self.cur_lap = self.lap_index.lap_at(self.clock.current_time());
        self.cur_lap_status = track_status_for_lap(&self.records, self.cur_lap);
        self.cur_positions = positions_at_lap(&self.records, self.cur_lap);
    }

    // TRANSPORT -----------------------------------------------------------------------------------
    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.clock.set_speed(speed);
    }

    /// seek jumps to the inserted race time. All motion-derived state (headings, trails via the
    /// generation counter) is invalidated so no artifact of the previous position survives the
    /// discontinuity.
    pub fn seek(&mut self, t: f64) {
        self.clock.seek(t);

        for tracker in self.headings.values_mut() {
            tracker.reset();
        }

        self.generation += 1;
        self.refresh_lap_state();
    }

    /// jump_to_lap seeks to the recorded start time of the inserted lap (no-op for laps without a
    /// recorded start).
    pub fn jump_to_lap(&mut self, lap: u32) {
        if let Some(start) = self.lap_index.start_of(lap) {
            self.seek(start);
        }
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn max_time(&self) -> f64 {
        self.clock.max_time()
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    // PER-FRAME QUERIES ---------------------------------------------------------------------------
    /// position_of returns the interpolated position of the inserted driver at the current race
    /// time in the rotated frame, or None if the car should not be rendered (did not start, not yet
    /// on track, or retired beyond the visibility window).
    pub fn position_of(&self, driver_id: &str) -> Option<Point2d> {
        position_query(
            self.clock.current_time(),
            driver_id,
            &self.series,
            &self.statuses,
            &self.lap_index,
            &self.pars,
        )
    }

    /// heading_of returns the smoothed facing angle of the inserted driver, or None as long as the
    /// tracker has not observed enough movement for a first bearing (start of the replay, right
    /// after a seek).
    pub fn heading_of(&self, driver_id: &str) -> Option<f64> {
        self.headings
            .get(driver_id)
            .filter(|tracker| tracker.initialized())
            .map(|tracker| tracker.heading())
    }

    pub fn status_of(&self, driver_id: &str) -> Option<&DriverStatus> {
        self.statuses.get(driver_id)
    }

    pub fn driver_info(&self, driver_id: &str) -> Option<&DriverInfo> {
        self.drivers.get(driver_id)
    }

    /// standings returns (driver id, running position) pairs of the current lap, sorted by
    /// position.
    pub fn standings(&self) -> Vec<(String, u32)> {
        let entries: Vec<(String, u32)> = self
            .cur_positions
            .iter()
            .map(|(driver_id, &position)| (driver_id.to_owned(), position))
            .collect();

        let positions: Vec<u32> = entries.iter().map(|(_, position)| *position).collect();

        argsort(&positions, SortOrder::Ascending)
            .into_iter()
            .map(|idx| entries[idx].to_owned())
            .collect()
    }

    /// current_tire returns the tire compound and age of the inserted driver on the current lap
    /// (the latest lap record at or before the current lap).
    pub fn current_tire(&self, driver_id: &str) -> Option<(Compound, Option<u32>)> {
        self.records
            .iter()
            .filter(|record| record.driver == driver_id && record.lap <= self.cur_lap)
            .max_by_key(|record| record.lap)
            .map(|record| (record.compound, record.tyre_life))
    }

    pub fn insights_for_current_lap(&self) -> &[InsightEvent] {
        self.insights
            .get(&self.cur_lap)
            .map(|events| events.as_slice())
            .unwrap_or(&[])
    }

    // STATIC ACCESSORS ----------------------------------------------------------------------------
    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    pub fn driver_ids(&self) -> &[String] {
        &self.driver_ids
    }

    pub fn track_outline(&self) -> &[Point2d] {
        &self.track_outline
    }

    pub fn pit_path(&self) -> &[Point2d] {
        &self.pit_path
    }

    pub fn bounds(&self) -> &TrackBounds {
        &self.bounds
    }

    pub fn pars(&self) -> &CircuitPars {
        &self.pars
    }

    pub fn current_lap(&self) -> u32 {
        self.cur_lap
    }

    pub fn current_lap_status(&self) -> TrackStatus {
        self.cur_lap_status
    }

    pub fn total_laps(&self) -> u32 {
        self.session.total_laps
    }

    /// generation counts the seek discontinuities. Rendering layers that accumulate motion history
    /// (trails) clear it whenever the generation changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // POST-PROCESSING -----------------------------------------------------------------------------
    pub fn get_classification(&self) -> ClassificationReport {
        let mut rows = Vec::with_capacity(self.driver_ids.len());

        for driver_id in self.driver_ids.iter() {
            let status = match self.statuses.get(driver_id) {
                Some(status) => status,
                None => continue,
            };
            let info = match self.drivers.get(driver_id) {
                Some(info) => info,
                None => continue,
            };

            rows.push(ClassificationRow {
                car_no: info.number.to_owned(),
                abbr: info.abbr.to_owned(),
                state: status.state.label().to_owned(),
                laps_completed: status.laps_completed,
                pit_lane_start: status.pit_lane_start,
            });
        }

        ClassificationReport {
            session_name: self.session.name.to_owned(),
            circuit: self.session.circuit.to_owned(),
            total_laps: self.session.total_laps,
            rows,
        }
    }
}

/// position_query is the free-function core of Replay::position_of (kept free so the heading
/// update can use it while holding a mutable borrow of the trackers).
fn position_query(
    t: f64,
    driver_id: &str,
    series: &HashMap<String, PositionSeries>,
    statuses: &HashMap<String, DriverStatus>,
    lap_index: &LapIndex,
    pars: &CircuitPars,
) -> Option<Point2d> {
    let status = statuses.get(driver_id)?;

    if status.state == DriverState::DidNotStart {
        return None;
    }

    let driver_series = series.get(driver_id)?;

    // a retired car stays visible until shortly after the lap following its retirement lap starts,
    // then disappears for the rest of the replay
    if let Some(retired_lap) = status.retired_lap {
        let cutoff = lap_index
            .start_of(retired_lap + 1)
            .or_else(|| driver_series.last_t())?;

        if t > cutoff + pars.retire_grace {
            return None;
        }
    }

    driver_series.position_at_windowed(t, pars.offtrack_grace)
}
