use crate::core::laps::LapRecord;
use std::collections::HashMap;

/// DriverState is the static per-driver classification derived once from the lap table after
/// loading. It is never re-evaluated during playback; only the visibility of a retired car depends
/// on the current race time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Racing,
    DidNotStart,
    Retired,
}

impl DriverState {
    pub fn label(&self) -> &'static str {
        match self {
            DriverState::Racing => "Racing",
            DriverState::DidNotStart => "DNS",
            DriverState::Retired => "Retired",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriverStatus {
    pub state: DriverState,
    pub retired_lap: Option<u32>,
    pub pit_lane_start: bool,
    pub laps_completed: u32,
}

/// classify_drivers performs one pass over the lap table, grouped by driver. A driver with zero
/// lap rows did not start; a driver whose maximum lap stays below the total race laps retired on
/// that lap. A lap-1 row showing a pit exit without a matching pit entry is the signature of a
/// pit-lane start.
pub fn classify_drivers(
    records: &[LapRecord],
    total_laps: u32,
    driver_ids: &[String],
) -> HashMap<String, DriverStatus> {
    let mut max_laps: HashMap<&str, u32> = HashMap::new();
    let mut pit_lane_starts: HashMap<&str, bool> = HashMap::new();

    for record in records.iter() {
        let max_lap = max_laps.entry(record.driver.as_str()).or_insert(0);
        if record.lap > *max_lap {
            *max_lap = record.lap
        }

        if record.lap == 1 && record.pit_out.is_some() && record.pit_in.is_none() {
            pit_lane_starts.insert(record.driver.as_str(), true);
        }
    }

    let mut statuses = HashMap::with_capacity(driver_ids.len());

    for driver_id in driver_ids.iter() {
        let laps_completed = max_laps.get(driver_id.as_str()).copied().unwrap_or(0);
        let pit_lane_start = pit_lane_starts
            .get(driver_id.as_str())
            .copied()
            .unwrap_or(false);

        let status = if laps_completed == 0 {
            DriverStatus {
                state: DriverState::DidNotStart,
                retired_lap: None,
                pit_lane_start: false,
                laps_completed,
            }
        } else if laps_completed < total_laps {
            DriverStatus {
                state: DriverState::Retired,
                retired_lap: Some(laps_completed),
                pit_lane_start,
                laps_completed,
            }
        } else {
            DriverStatus {
                state: DriverState::Racing,
                retired_lap: None,
                pit_lane_start,
                laps_completed,
            }
        };

        statuses.insert(driver_id.to_owned(), status);
    }

    statuses
}
