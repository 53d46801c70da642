//! Per-frame animation cycle.
//!
//! Every redraw the driver reads the clock, writes the absolute elapsed time
//! into the `time` uniform, lets the orbit controls ease the camera, and hands
//! the session to a frame target to draw. The host keeps requesting redraws
//! for as long as `tick` returns `FrameStatus::Continue`.

use std::time::Instant;

use crate::session::Session;

/// Monotonic seconds since the animation started
pub trait TimeSource {
    fn elapsed_secs(&self) -> f32;
}

/// Wall clock started when the scene is built; never reset
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

impl TimeSource for Clock {
    fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Something that can present the scene once per tick
pub trait FrameTarget {
    type Error;

    fn draw(&mut self, session: &Session) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Request another frame
    Continue,
    /// The driver was stopped; nothing was drawn
    Stopped,
}

/// Seconds of clock time averaged into one FPS reading
const FPS_WINDOW_SECS: f32 = 0.5;

/// Drives the redraw cycle until stopped
pub struct AnimationDriver<C = Clock> {
    clock: C,
    stopped: bool,
    frames: u64,
    window_start: f32,
    window_frames: u32,
    fps: f32,
}

impl AnimationDriver<Clock> {
    pub fn new() -> Self {
        Self::with_clock(Clock::start())
    }
}

impl Default for AnimationDriver<Clock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimeSource> AnimationDriver<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            stopped: false,
            frames: 0,
            window_start: 0.0,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Run one frame: time uniform, camera damping, then a single draw
    pub fn tick<T: FrameTarget>(
        &mut self,
        session: &mut Session,
        target: &mut T,
    ) -> Result<FrameStatus, T::Error> {
        if self.stopped {
            return Ok(FrameStatus::Stopped);
        }

        let elapsed = self.clock.elapsed_secs();
        session.set_time(elapsed);
        session.update_camera();

        target.draw(session)?;

        self.frames += 1;
        self.sample_fps(elapsed);
        Ok(FrameStatus::Continue)
    }

    /// Stop the cycle; later ticks do nothing
    pub fn stop(&mut self) {
        if !self.stopped {
            log::info!("Animation stopped after {} frames", self.frames);
            self.stopped = true;
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per second over the last complete sampling window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    fn sample_fps(&mut self, now: f32) {
        self.window_frames += 1;
        let span = now - self.window_start;
        if span >= FPS_WINDOW_SECS {
            self.fps = self.window_frames as f32 / span;
            self.window_start = now;
            self.window_frames = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::params::{names, Variant};
    use crate::session::SceneConfig;

    struct FakeClock {
        now: Cell<f32>,
    }

    impl FakeClock {
        fn at(secs: f32) -> Self {
            Self {
                now: Cell::new(secs),
            }
        }
    }

    impl TimeSource for &FakeClock {
        fn elapsed_secs(&self) -> f32 {
            self.now.get()
        }
    }

    /// Records what the session looked like at each draw
    #[derive(Default)]
    struct Recorder {
        times: Vec<f32>,
        camera_positions: Vec<glam::Vec3>,
    }

    impl FrameTarget for Recorder {
        type Error = String;

        fn draw(&mut self, session: &Session) -> Result<(), String> {
            self.times.push(session.time());
            self.camera_positions.push(session.camera.position);
            Ok(())
        }
    }

    struct Failing;

    impl FrameTarget for Failing {
        type Error = String;

        fn draw(&mut self, _session: &Session) -> Result<(), String> {
            Err("device lost".to_string())
        }
    }

    fn session() -> Session {
        Session::new(&SceneConfig::new(Variant::Raging)).unwrap()
    }

    #[test]
    fn test_draw_sees_clock_time() {
        let clock = FakeClock::at(12.5);
        let mut driver = AnimationDriver::with_clock(&clock);
        let mut session = session();
        let mut recorder = Recorder::default();

        let status = driver.tick(&mut session, &mut recorder).unwrap();

        assert_eq!(status, FrameStatus::Continue);
        assert_eq!(recorder.times, vec![12.5]);
        assert_eq!(
            session.material().uniforms.float(names::TIME),
            Some(12.5)
        );
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_time_is_absolute() {
        let clock = FakeClock::at(0.0);
        let mut driver = AnimationDriver::with_clock(&clock);
        let mut session = session();
        let mut recorder = Recorder::default();

        // A long stall between frames must not be accumulated anywhere
        for secs in [0.016, 0.032, 7.0, 7.016] {
            clock.now.set(secs);
            driver.tick(&mut session, &mut recorder).unwrap();
        }
        assert_eq!(recorder.times, vec![0.016, 0.032, 7.0, 7.016]);
    }

    #[test]
    fn test_stopped_driver_does_not_draw() {
        let clock = FakeClock::at(1.0);
        let mut driver = AnimationDriver::with_clock(&clock);
        let mut session = session();
        let mut recorder = Recorder::default();

        driver.tick(&mut session, &mut recorder).unwrap();
        driver.stop();
        assert!(!driver.is_running());

        clock.now.set(2.0);
        let status = driver.tick(&mut session, &mut recorder).unwrap();
        assert_eq!(status, FrameStatus::Stopped);
        assert_eq!(recorder.times.len(), 1);
        assert_eq!(session.time(), 1.0);
    }

    #[test]
    fn test_controls_step_before_draw() {
        let clock = FakeClock::at(0.0);
        let mut driver = AnimationDriver::with_clock(&clock);
        let mut session = session();
        let start = session.camera.position;
        let mut recorder = Recorder::default();

        session.controls.rotate(150.0, 0.0, 600.0);
        driver.tick(&mut session, &mut recorder).unwrap();

        assert_ne!(recorder.camera_positions[0], start);
    }

    #[test]
    fn test_draw_errors_propagate() {
        let clock = FakeClock::at(0.0);
        let mut driver = AnimationDriver::with_clock(&clock);
        let mut session = session();

        let err = driver.tick(&mut session, &mut Failing).unwrap_err();
        assert_eq!(err, "device lost");
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn test_fps_estimate() {
        let clock = FakeClock::at(0.0);
        let mut driver = AnimationDriver::with_clock(&clock);
        let mut session = session();
        let mut recorder = Recorder::default();

        for frame in 1..=30 {
            clock.now.set(frame as f32 / 60.0);
            driver.tick(&mut session, &mut recorder).unwrap();
        }
        assert!((driver.fps() - 60.0).abs() < 1.0, "fps {}", driver.fps());
    }
}
