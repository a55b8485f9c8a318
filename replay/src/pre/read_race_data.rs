use crate::core::laps::{Compound, LapRecord, TrackStatus};
use crate::core::series::PositionSeries;
use crate::interfaces::gui_interface::{LoadMessage, LoadedData, RgbColor};
use crate::pre::replay_opts::ReplayOpts;
use anyhow::Context;
use flume::Sender;
use helpers::geometry::Point2d;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::Path;

// ---------------------------------------------------------------------------------------------
// RAW PAYLOAD SCHEMAS -------------------------------------------------------------------------
// ---------------------------------------------------------------------------------------------
// The two JSON payloads are produced by the telemetry backend. Numeric fields can be null (the
// backend scrubs NaN/Inf to null), therefore every float is deserialized as an Option.

#[derive(Debug, Deserialize)]
struct RawWeather {
    air_temp: Option<f64>,
    track_temp: Option<f64>,
    humidity: Option<f64>,
    rainfall: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawSession {
    name: String,
    circuit: String,
    total_laps: u32,
    #[serde(default)]
    weather: Option<RawWeather>,
}

#[derive(Debug, Deserialize)]
struct RawDriver {
    number: String,
    abbr: String,
    name: String,
    team: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawPath {
    x: Vec<Option<f64>>,
    y: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawLap {
    driver: String,
    lap: Option<u32>,
    lap_time: Option<f64>,
    compound: Option<String>,
    tyre_life: Option<u32>,
    pit_in: Option<f64>,
    pit_out: Option<f64>,
    lap_start: Option<f64>,
    position: Option<u32>,
    track_status: Option<String>,
    stint: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawInsight {
    #[serde(rename = "type")]
    kind: String,
    icon: String,
    title: String,
    detail: String,
    driver: Option<String>,
    color: Option<String>,
    priority: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    session: RawSession,
    drivers: HashMap<String, RawDriver>,
    track: RawPath,
    laps: Vec<RawLap>,
    #[serde(default)]
    insights: HashMap<String, Vec<RawInsight>>,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    t: Vec<Option<f64>>,
    x: Vec<Option<f64>>,
    y: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------------------------
// RESOLVED DATA -------------------------------------------------------------------------------
// ---------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Weather {
    pub air_temp: Option<f64>,
    pub track_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: bool,
}

#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub name: String,
    pub circuit: String,
    pub total_laps: u32,
    pub weather: Weather,
}

#[derive(Debug, Clone)]
pub struct DriverInfo {
    pub number: String,
    pub abbr: String,
    pub name: String,
    pub team: String,
    pub color: RgbColor,
}

/// InsightKind is the closed set of narrative event types delivered with the session payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    SafetyCar,
    Vsc,
    Yellow,
    FastestLap,
    PersonalBest,
    PitStop,
    PositionChange,
    BestSector,
    Unknown,
}

impl InsightKind {
    fn from_field(field: &str) -> InsightKind {
        match field {
            "safety_car" => InsightKind::SafetyCar,
            "vsc" => InsightKind::Vsc,
            "yellow" => InsightKind::Yellow,
            "fastest_lap" => InsightKind::FastestLap,
            "personal_best" => InsightKind::PersonalBest,
            "pit_stop" => InsightKind::PitStop,
            "position_change" => InsightKind::PositionChange,
            "best_sector" => InsightKind::BestSector,
            _ => InsightKind::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsightEvent {
    pub kind: InsightKind,
    pub icon: String,
    pub title: String,
    pub detail: String,
    pub driver: Option<String>,
    pub color: Option<RgbColor>,
    pub priority: u32,
}

/// RaceData is the fully resolved session payload: enums and colors are parsed once at ingestion
/// instead of being re-interpreted per frame.
#[derive(Debug)]
pub struct RaceData {
    pub session: SessionInfo,
    pub drivers: HashMap<String, DriverInfo>,
    pub track_outline: Vec<Point2d>,
    pub laps: Vec<LapRecord>,
    pub insights: HashMap<u32, Vec<InsightEvent>>,
}

/// CircuitPars holds the circuit-specific presentation parameters. The alignment rotation and the
/// pit lane overlay differ per circuit and therefore come from a parameter file instead of being
/// baked into the engine; the grace windows are heuristics exposed the same way.
///
/// * `rotation_deg` - (deg) Fixed rotation aligning the main straight with the rendering frame
/// * `pit_lane` - Optional pit lane overlay polyline (raw coordinates, used for bounds/overlay
/// only, not for car motion)
/// * `offtrack_grace` - (s) Window outside a driver's own sample range in which the position still
/// clamps to the nearest sample instead of disappearing
/// * `retire_grace` - (s) How long a retired car stays visible after the lap following its
/// retirement
/// * `heading_noise_threshold` - Minimum frame-to-frame displacement (raw coordinate units) for a
/// heading update
/// * `heading_gain` - Gain of the exponential heading low-pass filter, within (0.0, 1.0]
/// * `trail_length` - Number of projected points kept for the fading motion trail
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CircuitPars {
    pub rotation_deg: f64,
    pub pit_lane: Option<PitLanePath>,
    pub offtrack_grace: f64,
    pub retire_grace: f64,
    pub heading_noise_threshold: f64,
    pub heading_gain: f64,
    pub trail_length: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PitLanePath {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Default for CircuitPars {
    fn default() -> Self {
        CircuitPars {
            rotation_deg: 0.0,
            pit_lane: None,
            offtrack_grace: 3.0,
            retire_grace: 5.0,
            heading_noise_threshold: 2.0,
            heading_gain: 0.25,
            trail_length: 40,
        }
    }
}

impl CircuitPars {
    pub fn pit_lane_points(&self) -> Vec<Point2d> {
        match self.pit_lane.as_ref() {
            Some(path) => path
                .x
                .iter()
                .zip(path.y.iter())
                .map(|(&x, &y)| Point2d { x, y })
                .collect(),
            None => vec![],
        }
    }
}

// ---------------------------------------------------------------------------------------------
// READERS -------------------------------------------------------------------------------------
// ---------------------------------------------------------------------------------------------

fn parse_color(field: &str) -> anyhow::Result<RgbColor> {
    let color = field
        .parse::<css_color_parser::Color>()
        .context(format!("Could not parse hex color {}!", field))?;

    Ok(RgbColor {
        r: color.r,
        g: color.g,
        b: color.b,
    })
}

/// zip_path drops samples with scrubbed (null) coordinates and collects the rest into a polyline.
fn zip_path(path: &RawPath) -> Vec<Point2d> {
    path.x
        .iter()
        .zip(path.y.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(Point2d { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}

/// read_race_data reads the session payload and resolves it into engine types.
pub fn read_race_data(filepath: &Path) -> anyhow::Result<RaceData> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open data payload {}!",
            filepath.display()
        ))?;

    // read and parse payload content
    let raw: RawData = serde_json::from_reader(&fh).context(format!(
        "Failed to parse data payload {}!",
        filepath.display()
    ))?;

    // resolve drivers (colors are parsed once here)
    let mut drivers = HashMap::with_capacity(raw.drivers.len());

    for (driver_id, raw_driver) in raw.drivers.into_iter() {
        drivers.insert(
            driver_id,
            DriverInfo {
                number: raw_driver.number,
                abbr: raw_driver.abbr,
                name: raw_driver.name,
                team: raw_driver.team,
                color: parse_color(&raw_driver.color)?,
            },
        );
    }

    // resolve lap records (rows without a lap number carry no usable information)
    let mut laps = Vec::with_capacity(raw.laps.len());

    for raw_lap in raw.laps.into_iter() {
        let lap = match raw_lap.lap {
            Some(lap) => lap,
            None => continue,
        };

        laps.push(LapRecord {
            driver: raw_lap.driver,
            lap,
            lap_time: raw_lap.lap_time,
            compound: Compound::from_field(raw_lap.compound.as_deref().unwrap_or("")),
            tyre_life: raw_lap.tyre_life,
            pit_in: raw_lap.pit_in,
            pit_out: raw_lap.pit_out,
            lap_start: raw_lap.lap_start,
            position: raw_lap.position,
            track_statuses: TrackStatus::from_field(raw_lap.track_status.as_deref().unwrap_or("")),
            stint: raw_lap.stint,
        });
    }

    // resolve insights (keyed by lap number as string in the payload)
    let mut insights: HashMap<u32, Vec<InsightEvent>> = HashMap::with_capacity(raw.insights.len());

    for (lap_key, raw_events) in raw.insights.into_iter() {
        let lap: u32 = match lap_key.parse() {
            Ok(lap) => lap,
            Err(_) => continue,
        };

        let mut events = Vec::with_capacity(raw_events.len());

        for raw_event in raw_events.into_iter() {
            let color = match raw_event.color.as_deref() {
                Some(field) => parse_color(field).ok(),
                None => None,
            };

            events.push(InsightEvent {
                kind: InsightKind::from_field(&raw_event.kind),
                icon: raw_event.icon,
                title: raw_event.title,
                detail: raw_event.detail,
                driver: raw_event.driver,
                color,
                priority: raw_event.priority.unwrap_or(0),
            });
        }

        // most important events first within a lap
        events.sort_by(|a, b| b.priority.cmp(&a.priority));

        insights.insert(lap, events);
    }

    let weather = match raw.session.weather {
        Some(raw_weather) => Weather {
            air_temp: raw_weather.air_temp,
            track_temp: raw_weather.track_temp,
            humidity: raw_weather.humidity,
            rainfall: raw_weather.rainfall.unwrap_or(false),
        },
        None => Weather::default(),
    };

    Ok(RaceData {
        session: SessionInfo {
            name: raw.session.name,
            circuit: raw.session.circuit,
            total_laps: raw.session.total_laps,
            weather,
        },
        drivers,
        track_outline: zip_path(&raw.track),
        laps,
        insights,
    })
}

/// read_positions reads the per-driver position payload. Samples with scrubbed coordinates are
/// dropped; a driver whose series ends up empty is dropped entirely (the interpolator reports
/// "no data" for unknown drivers anyway).
pub fn read_positions(filepath: &Path) -> anyhow::Result<HashMap<String, PositionSeries>> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open position payload {}!",
            filepath.display()
        ))?;

    // read and parse payload content
    let raw: HashMap<String, RawSeries> = serde_json::from_reader(&fh).context(format!(
        "Failed to parse position payload {}!",
        filepath.display()
    ))?;

    let mut positions = HashMap::with_capacity(raw.len());

    for (driver_id, raw_series) in raw.into_iter() {
        let mut t = Vec::with_capacity(raw_series.t.len());
        let mut x = Vec::with_capacity(raw_series.x.len());
        let mut y = Vec::with_capacity(raw_series.y.len());

        for ((ti, xi), yi) in raw_series
            .t
            .iter()
            .zip(raw_series.x.iter())
            .zip(raw_series.y.iter())
        {
            if let (Some(ti), Some(xi), Some(yi)) = (ti, xi, yi) {
                t.push(*ti);
                x.push(*xi);
                y.push(*yi);
            }
        }

        if t.is_empty() {
            continue;
        }

        let series = PositionSeries::new(t, x, y)
            .context(format!("Invalid position series for driver {}!", driver_id))?;
        positions.insert(driver_id, series);
    }

    Ok(positions)
}

/// read_circuit_pars reads the optional circuit parameter file, falling back to the defaults if no
/// file was inserted.
pub fn read_circuit_pars(filepath: Option<&Path>) -> anyhow::Result<CircuitPars> {
    let filepath = match filepath {
        Some(filepath) => filepath,
        None => return Ok(CircuitPars::default()),
    };

    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open circuit parameter file {}!",
            filepath.display()
        ))?;

    // read and parse parameter file content
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse circuit parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

/// load_payloads performs the complete startup load (both payloads plus the circuit parameters).
pub fn load_payloads(opts: &ReplayOpts) -> anyhow::Result<LoadedData> {
    let race_data = read_race_data(opts.data_path.as_path())?;
    let positions = read_positions(opts.positions_path.as_path())?;
    let circuit_pars = read_circuit_pars(opts.circuit_path.as_deref())?;

    Ok(LoadedData {
        race_data,
        positions,
        circuit_pars,
    })
}

/// load_payloads_for_gui runs the startup load on a background thread and reports progress and the
/// final outcome over the inserted channel (the GUI polls the receiving end each frame).
pub fn load_payloads_for_gui(opts: &ReplayOpts, tx: &Sender<LoadMessage>) {
    let _ = tx.send(LoadMessage::Progress(String::from(
        "Reading session payload…",
    )));

    let race_data = match read_race_data(opts.data_path.as_path()) {
        Ok(race_data) => race_data,
        Err(e) => {
            let _ = tx.send(LoadMessage::Failed(format!("{:#}", e)));
            return;
        }
    };

    let _ = tx.send(LoadMessage::Progress(String::from(
        "Reading position payload…",
    )));

    let positions = match read_positions(opts.positions_path.as_path()) {
        Ok(positions) => positions,
        Err(e) => {
            let _ = tx.send(LoadMessage::Failed(format!("{:#}", e)));
            return;
        }
    };

    let circuit_pars = match read_circuit_pars(opts.circuit_path.as_deref()) {
        Ok(circuit_pars) => circuit_pars,
        Err(e) => {
            let _ = tx.send(LoadMessage::Failed(format!("{:#}", e)));
            return;
        }
    };

    let _ = tx.send(LoadMessage::Ready(Box::new(LoadedData {
        race_data,
        positions,
        circuit_pars,
    })));
}
