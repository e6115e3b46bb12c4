use super::*;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use glam::Vec3;

use crate::error::Result;
use crate::scene::Transform;

/// Records every backend call for assertions
#[derive(Debug, Default)]
struct BackendState {
    loaded: Vec<PathBuf>,
    unloaded: Vec<SoundId>,
    positions: Vec<(SoundId, Vec3)>,
    listener: Option<(Vec3, Vec3)>,
    playing: Vec<SoundId>,
    looping: Vec<SoundId>,
    seeks: Vec<(SoundId, u64)>,
}

#[derive(Default)]
struct TestAudioBackend {
    state: Arc<Mutex<BackendState>>,
    next_id: u32,
}

impl TestAudioBackend {
    fn new() -> (Self, Arc<Mutex<BackendState>>) {
        let state = Arc::new(Mutex::new(BackendState::default()));
        (
            Self {
                state: Arc::clone(&state),
                next_id: 0,
            },
            state,
        )
    }
}

const TOTAL_FRAMES: u64 = 48000;

impl AudioBackend for TestAudioBackend {
    fn load_sound(&mut self, path: &Path) -> Result<SoundId> {
        let sound = SoundId(self.next_id);
        self.next_id += 1;
        self.state.lock().unwrap().loaded.push(path.to_path_buf());
        Ok(sound)
    }

    fn unload_sound(&mut self, sound: SoundId) {
        self.state.lock().unwrap().unloaded.push(sound);
    }

    fn set_sound_position(&mut self, sound: SoundId, position: Vec3) {
        self.state.lock().unwrap().positions.push((sound, position));
    }

    fn set_listener(&mut self, position: Vec3, forward: Vec3) {
        self.state.lock().unwrap().listener = Some((position, forward));
    }

    fn play(&mut self, sound: SoundId) {
        self.state.lock().unwrap().playing.push(sound);
    }

    fn stop(&mut self, sound: SoundId) {
        self.state.lock().unwrap().playing.retain(|&playing| playing != sound);
    }

    fn is_playing(&self, sound: SoundId) -> bool {
        self.state.lock().unwrap().playing.contains(&sound)
    }

    fn set_looping(&mut self, sound: SoundId, looping: bool) {
        let mut state = self.state.lock().unwrap();
        if looping {
            state.looping.push(sound);
        } else {
            state.looping.retain(|&loops| loops != sound);
        }
    }

    fn is_looping(&self, sound: SoundId) -> bool {
        self.state.lock().unwrap().looping.contains(&sound)
    }

    fn total_frames(&self, _sound: SoundId) -> u64 {
        TOTAL_FRAMES
    }

    fn seek_to_frame(&mut self, sound: SoundId, frame: u64) {
        self.state.lock().unwrap().seeks.push((sound, frame));
    }
}

fn audio_scene() -> (AudioScene, Arc<Mutex<BackendState>>) {
    let (backend, state) = TestAudioBackend::new();
    (AudioScene::new(Box::new(backend)), state)
}

// ============================================================================
// Update tests
// ============================================================================

#[test]
fn test_update_pushes_source_positions_and_listener_pose() {
    let (mut scene, state) = audio_scene();
    let mut transforms = TransformStore::new();

    // Listener at the origin facing -z; source at (1, 0, 0)
    let mut listener_transform = Transform::IDENTITY;
    listener_transform.rotation = Vec3::new(0.0, 0.0, -1.0);
    let listener = transforms.insert(listener_transform);
    scene.configure_listener(listener);

    let source_entity = transforms.insert(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
    scene.create_component(source_entity, "audio/shot.wav").unwrap();

    scene.update(&transforms);

    let state = state.lock().unwrap();
    assert_eq!(state.positions.len(), 1);
    assert_eq!(state.positions[0].1, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(state.listener, Some((Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))));
}

#[test]
fn test_inactive_components_are_not_uploaded() {
    let (mut scene, state) = audio_scene();
    let mut transforms = TransformStore::new();

    let listener = transforms.insert(Transform::IDENTITY);
    scene.configure_listener(listener);

    let entity = transforms.insert(Transform::from_position(Vec3::X));
    let component = scene.create_component(entity, "audio/loop.wav").unwrap();

    scene.set_active(component, false).unwrap();
    scene.update(&transforms);

    assert!(state.lock().unwrap().positions.is_empty());

    scene.set_active(component, true).unwrap();
    scene.update(&transforms);
    assert_eq!(state.lock().unwrap().positions.len(), 1);
}

#[test]
fn test_update_tracks_moving_entities() {
    let (mut scene, state) = audio_scene();
    let mut transforms = TransformStore::new();

    let listener = transforms.insert(Transform::IDENTITY);
    scene.configure_listener(listener);

    let entity = transforms.insert(Transform::from_position(Vec3::ZERO));
    scene.create_component(entity, "audio/engine.wav").unwrap();

    scene.update(&transforms);
    transforms.get_mut(entity).unwrap().position = Vec3::new(0.0, 0.0, -4.0);
    scene.update(&transforms);

    let state = state.lock().unwrap();
    assert_eq!(state.positions[1].1, Vec3::new(0.0, 0.0, -4.0));
}

// ============================================================================
// Playback control tests
// ============================================================================

#[test]
fn test_play_stop_and_looping_delegate_to_the_backend() {
    let (mut scene, _state) = audio_scene();
    let mut transforms = TransformStore::new();

    let entity = transforms.insert(Transform::IDENTITY);
    let component = scene.create_component(entity, "audio/music.ogg").unwrap();

    assert!(!scene.is_playing(component).unwrap());
    scene.set_playing(component, true).unwrap();
    assert!(scene.is_playing(component).unwrap());
    scene.set_playing(component, false).unwrap();
    assert!(!scene.is_playing(component).unwrap());

    assert!(!scene.is_looping(component).unwrap());
    scene.set_looping(component, true).unwrap();
    assert!(scene.is_looping(component).unwrap());
}

#[test]
fn test_rewind_scales_and_clamps_the_interval() {
    let (mut scene, state) = audio_scene();
    let mut transforms = TransformStore::new();

    let entity = transforms.insert(Transform::IDENTITY);
    let component = scene.create_component(entity, "audio/music.ogg").unwrap();

    scene.rewind(component, 0.5).unwrap();
    scene.rewind(component, -1.0).unwrap();
    scene.rewind(component, 2.0).unwrap();

    let state = state.lock().unwrap();
    let frames: Vec<u64> = state.seeks.iter().map(|&(_, frame)| frame).collect();
    assert_eq!(frames, vec![TOTAL_FRAMES / 2, 0, TOTAL_FRAMES]);
}

// ============================================================================
// Handle lifecycle tests
// ============================================================================

#[test]
fn test_destroy_unloads_and_recycles_the_slot() {
    let (mut scene, state) = audio_scene();
    let mut transforms = TransformStore::new();

    let entity = transforms.insert(Transform::IDENTITY);
    let component = scene.create_component(entity, "audio/a.wav").unwrap();
    assert_eq!(scene.len(), 1);

    scene.destroy_component(component).unwrap();
    assert_eq!(scene.len(), 0);
    assert_eq!(state.lock().unwrap().unloaded.len(), 1);
    assert!(matches!(
        scene.is_playing(component),
        Err(crate::error::Error::InvalidHandle(_))
    ));

    let recycled = scene.create_component(entity, "audio/b.wav").unwrap();
    assert_eq!(recycled, component);
    assert!(scene.is_active(recycled).unwrap());
}

#[test]
fn test_load_path_is_under_the_resource_root() {
    let (mut scene, state) = audio_scene();
    let mut transforms = TransformStore::new();

    let entity = transforms.insert(Transform::IDENTITY);
    scene.create_component(entity, "audio/shot.wav").unwrap();

    let state = state.lock().unwrap();
    assert!(state.loaded[0].ends_with("audio/shot.wav"));
    assert!(state.loaded[0].parent().unwrap().ends_with("audio"));
}
