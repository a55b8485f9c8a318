use std::time::Instant;

// allowed playback speed range (mirrors the real-time factor limits of the CLI)
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 100.0;

/// ReplayClock owns the single shared race-time axis of the replay. It is advanced once per
/// scheduling tick by the elapsed wall-clock time multiplied with the speed factor, which makes
/// playback frame-rate independent (a 30 Hz and a 144 Hz display play back at the same rate).
#[derive(Debug)]
pub struct ReplayClock {
    cur_time: f64,
    max_time: f64,
    speed: f64,
    playing: bool,
    prev_tick: Option<Instant>,
}

impl ReplayClock {
    pub fn new(max_time: f64) -> ReplayClock {
        ReplayClock {
            cur_time: 0.0,
            max_time: if max_time.is_finite() && max_time > 0.0 {
                max_time
            } else {
                0.0
            },
            speed: 1.0,
            playing: false,
            prev_tick: None,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.cur_time
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// play starts the clock. If the current time is at or past the end of the recording, the
    /// clock rewinds to zero first.
    pub fn play(&mut self) {
        if self.cur_time >= self.max_time {
            self.cur_time = 0.0
        }

        self.playing = true;
        self.prev_tick = None;
    }

    /// pause stops the clock. The previous-tick timestamp is dropped so that no large time jump is
    /// applied across the pause when playback resumes.
    pub fn pause(&mut self) {
        self.playing = false;
        self.prev_tick = None;
    }

    /// seek jumps to the inserted race time, clamped to [0, max_time]. Non-finite values are
    /// ignored. The previous-tick timestamp is dropped so the next tick starts from a clean state.
    pub fn seek(&mut self, t: f64) {
        if !t.is_finite() {
            return;
        }

        self.cur_time = t.max(0.0).min(self.max_time);
        self.prev_tick = None;
    }

    /// set_speed sets the playback speed multiplier, clamped to [MIN_SPEED, MAX_SPEED]. Non-finite
    /// values are ignored. Takes effect on the next tick.
    pub fn set_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            return;
        }

        self.speed = speed.max(MIN_SPEED).min(MAX_SPEED);
    }

    /// tick advances the clock by the wall-clock time elapsed since the previous tick multiplied
    /// with the speed factor. Reaching the end of the recording clamps the time and pauses the
    /// clock. The method returns true if the current time changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.playing {
            return false;
        }

        let advanced = match self.prev_tick {
            Some(prev) => {
                let delta_t = now.duration_since(prev).as_secs_f64() * self.speed;
                self.cur_time += delta_t;
                delta_t > 0.0
            }
            // first tick after play/seek only establishes the reference timestamp
            None => false,
        };

        if self.cur_time >= self.max_time {
            self.cur_time = self.max_time;
            self.playing = false;
            self.prev_tick = None;
        } else {
            self.prev_tick = Some(now);
        }

        advanced
    }
}
