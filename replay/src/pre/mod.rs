pub mod check_replay_opts;
pub mod read_race_data;
pub mod replay_opts;
