/// Meteor3D Engine - singleton manager and application driver
///
/// This module provides the process-wide engine state (logger, exit flag)
/// and the cooperative frame loop. Applications implement the `App` trait
/// and hand themselves to `Engine::run`, which measures frame time and
/// calls `App::frame` until an exit is requested or a fatal error occurs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

use crate::error::Result;
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::utils::FrameTimer;

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Set when a normal termination was requested (close button, app request)
static EXIT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Application hooks driven by the engine's frame loop.
///
/// `setup` runs once before the first frame; errors there are fatal.
/// `frame` runs once per frame with the measured delta time in seconds;
/// errors there are fatal too (recoverable conditions are logged by the
/// subsystems themselves and never surface here). `shutdown` always runs
/// once the loop ends, even after an error.
pub trait App {
    /// One-time initialization: create context, scenes, load resources.
    fn setup(&mut self) -> Result<()>;

    /// Advance one frame. `dt` is the previous frame's duration in seconds.
    fn frame(&mut self, dt: f32) -> Result<()>;

    /// Teardown hook. Default does nothing.
    fn shutdown(&mut self) {}
}

/// Main engine singleton manager
///
/// Owns the process-wide logger and the exit flag, and drives the frame
/// loop. All engine subsystems log through this type.
pub struct Engine;

impl Engine {
    /// Initialize the engine singletons.
    ///
    /// Must be called once at application startup. Calling it again is a
    /// no-op.
    pub fn initialize() {
        LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        EXIT_REQUESTED.store(false, Ordering::Relaxed);
        crate::engine_info!("meteor3d::Engine", "Engine initialized");
    }

    /// Shut the engine down.
    ///
    /// Subsystems are owned by the application and drop with it; this only
    /// resets the process-wide state.
    pub fn shutdown() {
        EXIT_REQUESTED.store(false, Ordering::Relaxed);
        crate::engine_info!("meteor3d::Engine", "Engine shut down");
    }

    /// Request a normal termination of the frame loop.
    ///
    /// Called by the context when the window reports a close request, or by
    /// the application itself. The loop finishes the current frame first.
    pub fn request_exit() {
        EXIT_REQUESTED.store(true, Ordering::Relaxed);
    }

    /// Whether a normal termination has been requested
    pub fn exit_requested() -> bool {
        EXIT_REQUESTED.load(Ordering::Relaxed)
    }

    /// Run an application: setup, frame loop, shutdown.
    ///
    /// Returns the first fatal error, after logging it and running the
    /// application's `shutdown` hook. Callers map `Err` to a nonzero
    /// process exit code.
    pub fn run<A: App>(app: &mut A) -> Result<()> {
        Self::initialize();

        if let Err(error) = app.setup() {
            crate::engine_error!("meteor3d::Engine", "Setup failed: {}", error);
            app.shutdown();
            return Err(error);
        }

        let mut timer = FrameTimer::new();

        let result = loop {
            if Self::exit_requested() {
                crate::engine_info!("meteor3d::Engine", "Main loop has ended normally");
                break Ok(());
            }

            let dt = timer.tick();

            if let Err(error) = app.frame(dt) {
                crate::engine_error!("meteor3d::Engine", "Frame failed: {}", error);
                break Err(error);
            }
        };

        app.shutdown();
        Self::shutdown();

        result
    }

    // ===== LOGGING API =====

    /// Replace the default logger with a custom implementation
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to the colored console default
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method used by the `engine_*!` macros
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information, used by `engine_error!`
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
