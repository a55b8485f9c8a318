use crate::core::clock::{MAX_SPEED, MIN_SPEED};
use crate::pre::read_race_data::CircuitPars;
use crate::pre::replay_opts::ReplayOpts;
use anyhow::Context;
use helpers::general::InputValueError;

/// check_replay_opts assures that the inserted options and circuit parameters are within
/// reasonable limits and raises an error if not.
pub fn check_replay_opts(replay_opts: &ReplayOpts, circuit_pars: &CircuitPars) -> anyhow::Result<()> {
    // PART 1: REPLAY OPTIONS
    if !(0.001 <= replay_opts.timestep_size && replay_opts.timestep_size <= 10.0) {
        return Err(InputValueError).context(format!(
            "timestep_size is {:.3}s, which is not within the reasonable range of [0.001, 10.0]s!",
            replay_opts.timestep_size
        ));
    }

    if !(MIN_SPEED <= replay_opts.speed && replay_opts.speed <= MAX_SPEED) {
        return Err(InputValueError).context(format!(
            "speed is {:.3}, which is not within the reasonable range of [{:.1}, {:.1}]!",
            replay_opts.speed, MIN_SPEED, MAX_SPEED
        ));
    }

    if !replay_opts.start_time.is_finite() || replay_opts.start_time < 0.0 {
        return Err(InputValueError).context(format!(
            "start_time is {}, but must be a finite non-negative session time!",
            replay_opts.start_time
        ));
    }

    // PART 2: CIRCUIT PARAMETERS
    if !circuit_pars.rotation_deg.is_finite() {
        return Err(InputValueError).context("rotation_deg must be finite!");
    }

    if !(circuit_pars.offtrack_grace >= 0.0) || !(circuit_pars.retire_grace >= 0.0) {
        return Err(InputValueError)
            .context("offtrack_grace and retire_grace must be non-negative!");
    }

    if !(circuit_pars.heading_noise_threshold >= 0.0) {
        return Err(InputValueError).context("heading_noise_threshold must be non-negative!");
    }

    if !(0.0 < circuit_pars.heading_gain && circuit_pars.heading_gain <= 1.0) {
        return Err(InputValueError).context(format!(
            "heading_gain is {:.3}, which is not within the required range (0.0, 1.0]!",
            circuit_pars.heading_gain
        ));
    }

    if let Some(pit_lane) = circuit_pars.pit_lane.as_ref() {
        if pit_lane.x.len() != pit_lane.y.len() {
            return Err(InputValueError)
                .context("Pit lane overlay x and y must have the same length!");
        }
    }

    Ok(())
}
