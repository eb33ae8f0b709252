/// Frame pacing for the scene
///
/// Rotation advances on a fixed timestep so spin speed does not depend on the
/// display refresh rate, while rendering happens once per redraw.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Target update rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame, so a stall does not snowball
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// What one frame should do
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTicks {
    /// Fixed updates to run before drawing
    pub ticks: u32,
    /// Wall time since the previous frame, in seconds; advances even while paused
    pub delta: f32,
}

/// Frame timing state
pub struct GameLoop {
    /// Time not yet consumed by fixed ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether rotation is paused
    paused: bool,

    /// Recent frame durations for FPS calculation
    frame_times: VecDeque<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Total ticks executed
    tick_count: u64,

    /// Current FPS (updated every 10 frames)
    current_fps: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_times: VecDeque::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            tick_count: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame measured against the wall clock
    pub fn begin_frame(&mut self) -> FrameTicks {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Begin a new frame that took `frame_time`
    pub fn advance(&mut self, frame_time: Duration) -> FrameTicks {
        self.frame_count += 1;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.pop_front();
        }
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        let delta = frame_time.as_secs_f32();
        if self.paused {
            return FrameTicks { ticks: 0, delta };
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Drop whatever the cap left behind instead of replaying it next frame
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        FrameTicks { ticks, delta }
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total number of frames begun
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of fixed ticks executed
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Rotation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a tick burst
            self.accumulator = Duration::ZERO;
            log::info!("Rotation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn update_fps(&mut self) {
        let total: Duration = self.frame_times.iter().sum();
        let avg = total.as_secs_f32() / self.frame_times.len().max(1) as f32;

        self.current_fps = if avg > 0.0 { 1.0 / avg } else { 0.0 };
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
