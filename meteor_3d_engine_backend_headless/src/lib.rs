/*!
# Meteor 3D Engine - Headless Backend

In-memory implementation of the Meteor 3D engine's backend traits: a
graphics device that records uploads and draw calls, a window that
queues injected events, and an audio engine that tracks source and
listener state.

This backend needs no GPU, display or audio hardware. It drives the
demo binary on machines without a native backend and backs the
integration test suite, where tests inject window events and read the
device counters after a frame.
*/

// Internal modules
mod headless_audio;
mod headless_graphics_device;
mod headless_window;

pub use headless_audio::{AudioState, AudioStateHandle, HeadlessAudioBackend, SOUND_TOTAL_FRAMES};
pub use headless_graphics_device::HeadlessGraphicsDevice;
pub use headless_window::{EventQueue, HeadlessWindowBackend, MONITOR_SIZE};
