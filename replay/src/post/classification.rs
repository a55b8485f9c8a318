use std::fmt::Write;

/// ClassificationRow is the final state of one driver after the recording ends.
pub struct ClassificationRow {
    pub car_no: String,
    pub abbr: String,
    pub state: String,
    pub laps_completed: u32,
    pub pit_lane_start: bool,
}

/// ClassificationReport contains all session information that is required for post-processing the
/// replay in headless mode.
pub struct ClassificationReport {
    pub session_name: String,
    pub circuit: String,
    pub total_laps: u32,
    pub rows: Vec<ClassificationRow>,
}

impl ClassificationReport {
    /// print prints the final classification to the console output.
    pub fn print(&self) {
        // create string with the per-driver classification
        let mut tmp_string_rows = String::new();

        for row in self.rows.iter() {
            let note = if row.pit_lane_start {
                " (pit lane start)"
            } else {
                ""
            };

            writeln!(
                &mut tmp_string_rows,
                "{:>3} ({:>3}): {:>7}, {:3}/{} laps{}",
                row.car_no, row.abbr, row.state, row.laps_completed, self.total_laps, note
            )
            .unwrap();
        }

        // print everything to the console
        println!(
            "RESULT: Final classification of {} ({})",
            self.session_name, self.circuit
        );
        print!("{}", tmp_string_rows);
    }
}
