/// Headless audio engine: spatial state without an audio device.
///
/// Sounds "exist" as records of their path, position, playback and loop
/// state; every sound reports a fixed one-second length at 48 kHz.
/// Loading never touches the filesystem, so scenes can reference audio
/// files that only exist on target machines. State lives behind a
/// shared handle the creator keeps, because the audio scene takes
/// ownership of the backend itself.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use glam::Vec3;

use meteor_3d_engine::audio::{AudioBackend, SoundId};
use meteor_3d_engine::error::Result;

/// Fixed sound length reported by the headless engine
pub const SOUND_TOTAL_FRAMES: u64 = 48000;

#[derive(Debug, Clone)]
struct Sound {
    path: PathBuf,
    position: Vec3,
    playing: bool,
    looping: bool,
    frame: u64,
    loaded: bool,
}

/// Everything the headless engine tracks; inspect through
/// [`AudioStateHandle`]
#[derive(Debug, Default)]
pub struct AudioState {
    sounds: Vec<Sound>,
    listener_position: Vec3,
    listener_forward: Vec3,
}

/// Shared view of a running backend's state
pub type AudioStateHandle = Arc<Mutex<AudioState>>;

impl AudioState {
    pub fn listener_position(&self) -> Vec3 {
        self.listener_position
    }

    pub fn listener_forward(&self) -> Vec3 {
        self.listener_forward
    }

    pub fn sound_position(&self, sound: SoundId) -> Option<Vec3> {
        self.sound(sound).map(|sound| sound.position)
    }

    pub fn sound_path(&self, sound: SoundId) -> Option<&Path> {
        self.sound(sound).map(|sound| sound.path.as_path())
    }

    pub fn current_frame(&self, sound: SoundId) -> Option<u64> {
        self.sound(sound).map(|sound| sound.frame)
    }

    /// Number of sounds currently loaded
    pub fn loaded_count(&self) -> usize {
        self.sounds.iter().filter(|sound| sound.loaded).count()
    }

    fn sound(&self, sound: SoundId) -> Option<&Sound> {
        self.sounds.get(sound.0 as usize).filter(|sound| sound.loaded)
    }

    fn sound_mut(&mut self, sound: SoundId) -> Option<&mut Sound> {
        self.sounds
            .get_mut(sound.0 as usize)
            .filter(|sound| sound.loaded)
    }
}

pub struct HeadlessAudioBackend {
    state: AudioStateHandle,
}

impl HeadlessAudioBackend {
    /// Create a backend plus the handle used to inspect it
    pub fn new() -> (Self, AudioStateHandle) {
        let state: AudioStateHandle = Arc::new(Mutex::new(AudioState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

impl AudioBackend for HeadlessAudioBackend {
    fn load_sound(&mut self, path: &Path) -> Result<SoundId> {
        let mut state = self.state.lock().unwrap();

        state.sounds.push(Sound {
            path: path.to_path_buf(),
            position: Vec3::ZERO,
            playing: false,
            looping: false,
            frame: 0,
            loaded: true,
        });

        Ok(SoundId((state.sounds.len() - 1) as u32))
    }

    fn unload_sound(&mut self, sound: SoundId) {
        let mut state = self.state.lock().unwrap();
        if let Some(sound) = state.sounds.get_mut(sound.0 as usize) {
            sound.loaded = false;
            sound.playing = false;
        }
    }

    fn set_sound_position(&mut self, sound: SoundId, position: Vec3) {
        if let Some(sound) = self.state.lock().unwrap().sound_mut(sound) {
            sound.position = position;
        }
    }

    fn set_listener(&mut self, position: Vec3, forward: Vec3) {
        let mut state = self.state.lock().unwrap();
        state.listener_position = position;
        state.listener_forward = forward;
    }

    fn play(&mut self, sound: SoundId) {
        if let Some(sound) = self.state.lock().unwrap().sound_mut(sound) {
            sound.playing = true;
        }
    }

    fn stop(&mut self, sound: SoundId) {
        if let Some(sound) = self.state.lock().unwrap().sound_mut(sound) {
            sound.playing = false;
        }
    }

    fn is_playing(&self, sound: SoundId) -> bool {
        self.state
            .lock()
            .unwrap()
            .sound(sound)
            .map(|sound| sound.playing)
            .unwrap_or(false)
    }

    fn set_looping(&mut self, sound: SoundId, looping: bool) {
        if let Some(sound) = self.state.lock().unwrap().sound_mut(sound) {
            sound.looping = looping;
        }
    }

    fn is_looping(&self, sound: SoundId) -> bool {
        self.state
            .lock()
            .unwrap()
            .sound(sound)
            .map(|sound| sound.looping)
            .unwrap_or(false)
    }

    fn total_frames(&self, _sound: SoundId) -> u64 {
        SOUND_TOTAL_FRAMES
    }

    fn seek_to_frame(&mut self, sound: SoundId, frame: u64) {
        if let Some(sound) = self.state.lock().unwrap().sound_mut(sound) {
            sound.frame = frame.min(SOUND_TOTAL_FRAMES);
        }
    }
}
