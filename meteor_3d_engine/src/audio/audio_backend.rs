/// AudioBackend trait - the spatial-audio engine contract.
///
/// The audio scene drives an external engine exclusively through this
/// surface: sound loading, 3D source positions, the listener pose, and
/// playback control. The headless reference backend records everything
/// in memory.

use std::path::Path;

use glam::Vec3;

use crate::error::Result;

/// Backend-scoped handle of one loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Spatial-audio engine trait
pub trait AudioBackend: Send {
    /// Load a sound file.
    ///
    /// # Errors
    ///
    /// `DependencyInit` when the engine cannot decode or open the file.
    fn load_sound(&mut self, path: &Path) -> Result<SoundId>;

    /// Release a loaded sound
    fn unload_sound(&mut self, sound: SoundId);

    /// Move a sound source in world space
    fn set_sound_position(&mut self, sound: SoundId, position: Vec3);

    /// Update the single listener's pose
    fn set_listener(&mut self, position: Vec3, forward: Vec3);

    fn play(&mut self, sound: SoundId);

    fn stop(&mut self, sound: SoundId);

    fn is_playing(&self, sound: SoundId) -> bool;

    fn set_looping(&mut self, sound: SoundId, looping: bool);

    fn is_looping(&self, sound: SoundId) -> bool;

    /// Total length of the sound in PCM frames
    fn total_frames(&self, sound: SoundId) -> u64;

    /// Seek to an absolute PCM frame
    fn seek_to_frame(&mut self, sound: SoundId, frame: u64);
}
