use clap::Parser;
use gui::core::gui::ReplayApp;
use replay::core::replay::Replay;
use replay::pre::check_replay_opts::check_replay_opts;
use replay::pre::read_race_data::{load_payloads, load_payloads_for_gui, read_circuit_pars};
use replay::pre::replay_opts::ReplayOpts;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get replay options from the command line arguments and read the circuit parameters
    let replay_opts: ReplayOpts = ReplayOpts::parse();
    let circuit_pars = read_circuit_pars(replay_opts.circuit_path.as_deref())?;

    // check replay options and circuit parameters
    check_replay_opts(&replay_opts, &circuit_pars)?;

    // EXECUTION -----------------------------------------------------------------------------------
    if !replay_opts.gui {
        // HEADLESS CASE ---------------------------------------------------------------------------
        // load both payloads on the main thread
        let data = load_payloads(&replay_opts)?;
        let mut replay = Replay::new(data)?;

        println!(
            "INFO: Replaying {} ({}) with a time step size of {:.3}s",
            replay.session().name,
            replay.session().circuit,
            replay_opts.timestep_size
        );

        let t_start = Instant::now();

        replay.set_speed(replay_opts.speed);
        replay.seek(replay_opts.start_time);
        replay.play();

        // drive the clock with fabricated timestamps so the headless run finishes as fast as
        // possible while passing through every lap transition
        let mut now = Instant::now();
        let mut prev_lap = replay.current_lap();
        replay.tick(now);

        while replay.is_playing() {
            now += Duration::from_secs_f64(replay_opts.timestep_size);
            replay.tick(now);

            if replay.current_lap() != prev_lap {
                prev_lap = replay.current_lap();
                println!(
                    "INFO: Lap {}/{} ({})",
                    prev_lap,
                    replay.total_laps(),
                    replay.current_lap_status().label()
                );
            }
        }

        println!(
            "INFO: Execution time (total): {}ms",
            t_start.elapsed().as_millis()
        );

        // POST-PROCESSING -------------------------------------------------------------------------
        // print the final classification
        replay.get_classification().print();
    } else {
        // GUI CASE --------------------------------------------------------------------------------
        // create channel for communication between the payload-loader thread and the GUI
        let (tx, rx) = flume::unbounded();

        // load the payloads on a separate thread so the GUI can open immediately -> replay_opts
        // gets moved and must therefore be copied to be still available afterwards
        let replay_opts_thread = replay_opts.clone();

        let _ = thread::spawn(move || {
            load_payloads_for_gui(&replay_opts_thread, &tx);
        });

        // start GUI (must be done in the main thread)
        let app = ReplayApp::new(rx, &replay_opts);
        let native_options = eframe::NativeOptions::default();
        eframe::run_native(Box::new(app), native_options);
    }

    Ok(())
}
