use std::collections::{BTreeMap, HashMap};

/// TrackStatus describes the race-control state during a lap. The variants are ordered by badge
/// precedence: if multiple statuses co-occur on one lap (status can change mid-lap), the highest
/// one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrackStatus {
    Unknown,
    Green,
    Yellow,
    Vsc,
    Sc,
}

impl TrackStatus {
    /// from_code converts a single race-control code digit. The codes follow the timing feed of
    /// the recorded session ('1' green, '2'/'3' yellow, '4' safety car, '5' virtual safety car).
    pub fn from_code(code: char) -> TrackStatus {
        match code {
            '1' => TrackStatus::Green,
            '2' | '3' => TrackStatus::Yellow,
            '4' => TrackStatus::Sc,
            '5' => TrackStatus::Vsc,
            _ => TrackStatus::Unknown,
        }
    }

    /// from_field resolves a raw status field (possibly several concatenated code digits) into the
    /// set of statuses seen during the lap.
    pub fn from_field(field: &str) -> Vec<TrackStatus> {
        field.chars().map(TrackStatus::from_code).collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackStatus::Green => "Green",
            TrackStatus::Yellow => "Yellow",
            TrackStatus::Vsc => "VSC",
            TrackStatus::Sc => "SC",
            TrackStatus::Unknown => "—",
        }
    }
}

/// Compound is the tire compound of a stint, resolved once at ingestion instead of re-parsed per
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    pub fn from_field(field: &str) -> Compound {
        match field {
            "SOFT" => Compound::Soft,
            "MEDIUM" => Compound::Medium,
            "HARD" => Compound::Hard,
            "INTERMEDIATE" => Compound::Intermediate,
            "WET" => Compound::Wet,
            _ => Compound::Unknown,
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Compound::Soft => "S",
            Compound::Medium => "M",
            Compound::Hard => "H",
            Compound::Intermediate => "I",
            Compound::Wet => "W",
            Compound::Unknown => "?",
        }
    }
}

/// LapRecord is one row of the lap table, i.e. one (driver, lap) combination. The table is loaded
/// once and never mutated by the engine.
#[derive(Debug, Clone)]
pub struct LapRecord {
    pub driver: String,
    pub lap: u32,
    pub lap_time: Option<f64>,
    pub compound: Compound,
    pub tyre_life: Option<u32>,
    pub pit_in: Option<f64>,
    pub pit_out: Option<f64>,
    pub lap_start: Option<f64>,
    pub position: Option<u32>,
    pub track_statuses: Vec<TrackStatus>,
    pub stint: Option<u32>,
}

/// LapIndex maps each lap number to the earliest lap start time observed across all drivers. Built
/// once from the lap table; the minimum-based construction yields a non-decreasing map even if
/// single rows carry inconsistent start times.
#[derive(Debug, Default)]
pub struct LapIndex {
    starts: BTreeMap<u32, f64>,
}

impl LapIndex {
    pub fn from_records(records: &[LapRecord]) -> LapIndex {
        let mut starts: BTreeMap<u32, f64> = BTreeMap::new();

        for record in records.iter() {
            if let Some(lap_start) = record.lap_start {
                let entry = starts.entry(record.lap).or_insert(f64::INFINITY);
                if lap_start < *entry {
                    *entry = lap_start
                }
            }
        }

        LapIndex { starts }
    }

    /// lap_at returns the greatest lap number whose start time is at or before t (lap 1 if t
    /// precedes all recorded starts). Non-decreasing in t.
    pub fn lap_at(&self, t: f64) -> u32 {
        let mut cur_lap = 1;

        for (&lap, &start) in self.starts.iter() {
            if start <= t {
                cur_lap = lap
            } else {
                break;
            }
        }

        cur_lap
    }

    pub fn start_of(&self, lap: u32) -> Option<f64> {
        self.starts.get(&lap).copied()
    }

    pub fn last_lap(&self) -> Option<u32> {
        self.starts.keys().next_back().copied()
    }
}

/// track_status_for_lap aggregates the distinct status codes of all lap records of the inserted
/// lap and resolves them to a single badge state via the precedence ordering of TrackStatus.
pub fn track_status_for_lap(records: &[LapRecord], lap: u32) -> TrackStatus {
    records
        .iter()
        .filter(|record| record.lap == lap)
        .flat_map(|record| record.track_statuses.iter().copied())
        .fold(TrackStatus::Green, |acc, status| acc.max(status))
}

/// positions_at_lap returns the latest known running position per driver up to and including the
/// inserted lap (a driver without a row for the current lap keeps the previous lap's position).
pub fn positions_at_lap(records: &[LapRecord], lap: u32) -> HashMap<String, u32> {
    let mut latest_lap: HashMap<String, u32> = HashMap::new();
    let mut positions: HashMap<String, u32> = HashMap::new();

    for record in records.iter() {
        if record.lap > lap {
            continue;
        }

        if let Some(position) = record.position {
            let seen = latest_lap.entry(record.driver.to_owned()).or_insert(0);
            if record.lap >= *seen {
                *seen = record.lap;
                positions.insert(record.driver.to_owned(), position);
            }
        }
    }

    positions
}
