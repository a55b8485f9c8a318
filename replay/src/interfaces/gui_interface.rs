use crate::core::series::PositionSeries;
use crate::pre::read_race_data::{CircuitPars, RaceData};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// LoadedData bundles everything the loader thread produces before the replay loop starts.
#[derive(Debug)]
pub struct LoadedData {
    pub race_data: RaceData,
    pub positions: HashMap<String, PositionSeries>,
    pub circuit_pars: CircuitPars,
}

/// LoadMessage is sent from the payload-loader thread to the GUI. Loading happens once at startup;
/// the GUI shows the progress messages until the data arrives (or the load fails, which is
/// reported once and ends the startup).
#[derive(Debug)]
pub enum LoadMessage {
    Progress(String),
    Ready(Box<LoadedData>),
    Failed(String),
}
