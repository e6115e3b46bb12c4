/// Audio scene - listener plus spatialized sound components.
///
/// Components borrow their position from the caller's transform store,
/// like renderer components do. The listener is one entity whose
/// `position` gives the listener position and whose `rotation` vector is
/// taken verbatim as the forward direction. Each frame `update` pushes
/// every active source position into the backend, then the listener pose.

use bitflags::bitflags;

use crate::audio::{AudioBackend, SoundId};
use crate::error::{Error, Result};
use crate::resource::resource_root;
use crate::scene::{EntityKey, TransformStore};
use crate::utils::SlotAllocator;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct ComponentFlags: u8 {
        const ACTIVE = 1 << 0;
    }
}

/// Handle of one audio component; recycled after destroy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioComponent(u32);

/// Sound components driven by one audio backend
pub struct AudioScene {
    backend: Box<dyn AudioBackend>,
    slots: SlotAllocator,
    entities: Vec<EntityKey>,
    sounds: Vec<SoundId>,
    flags: Vec<ComponentFlags>,
    listener: Option<EntityKey>,
}

impl AudioScene {
    /// Wrap an initialized backend
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        crate::engine_info!("meteor3d::Audio", "Audio scene created");

        Self {
            backend,
            slots: SlotAllocator::new(),
            entities: Vec::new(),
            sounds: Vec::new(),
            flags: Vec::new(),
            listener: None,
        }
    }

    /// Set the listener entity: its position and its rotation vector
    /// (used directly as the forward direction)
    pub fn configure_listener(&mut self, entity: EntityKey) {
        self.listener = Some(entity);
    }

    pub fn listener(&self) -> Option<EntityKey> {
        self.listener
    }

    /// Load `<resource root>/<file>` and bind it to a recycled slot.
    ///
    /// The component starts active but not playing.
    ///
    /// # Errors
    ///
    /// `DependencyInit` when the backend cannot load the file.
    pub fn create_component(&mut self, entity: EntityKey, file: &str) -> Result<AudioComponent> {
        let path = resource_root().join(file);
        let sound = self.backend.load_sound(&path)?;

        let slot = self.slots.allocate() as usize;

        if slot == self.entities.len() {
            self.entities.push(entity);
            self.sounds.push(sound);
            self.flags.push(ComponentFlags::ACTIVE);
        } else {
            self.entities[slot] = entity;
            self.sounds[slot] = sound;
            self.flags[slot] = ComponentFlags::ACTIVE;
        }

        crate::engine_info!("meteor3d::Audio", "Sound '{}' loaded", file);

        Ok(AudioComponent(slot as u32))
    }

    /// Unload the sound and free the slot for recycling
    pub fn destroy_component(&mut self, component: AudioComponent) -> Result<()> {
        let slot = self.check(component)?;

        self.backend.unload_sound(self.sounds[slot]);
        self.flags[slot] = ComponentFlags::empty();
        self.slots.release(component.0);

        Ok(())
    }

    /// Number of live components
    pub fn len(&self) -> usize {
        self.slots.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Inactive components keep their state but are not uploaded
    pub fn set_active(&mut self, component: AudioComponent, active: bool) -> Result<()> {
        let slot = self.check(component)?;
        self.flags[slot].set(ComponentFlags::ACTIVE, active);
        Ok(())
    }

    pub fn is_active(&self, component: AudioComponent) -> Result<bool> {
        let slot = self.check(component)?;
        Ok(self.flags[slot].contains(ComponentFlags::ACTIVE))
    }

    pub fn set_playing(&mut self, component: AudioComponent, playing: bool) -> Result<()> {
        let slot = self.check(component)?;
        if playing {
            self.backend.play(self.sounds[slot]);
        } else {
            self.backend.stop(self.sounds[slot]);
        }
        Ok(())
    }

    pub fn is_playing(&self, component: AudioComponent) -> Result<bool> {
        let slot = self.check(component)?;
        Ok(self.backend.is_playing(self.sounds[slot]))
    }

    /// Seek to `interval` of the sound's length; `interval` clamps to
    /// `[0, 1]`.
    pub fn rewind(&mut self, component: AudioComponent, interval: f32) -> Result<()> {
        let slot = self.check(component)?;

        let sound = self.sounds[slot];
        let total_frames = self.backend.total_frames(sound);
        let target = (total_frames as f64 * interval.clamp(0.0, 1.0) as f64) as u64;

        self.backend.seek_to_frame(sound, target);
        Ok(())
    }

    pub fn set_looping(&mut self, component: AudioComponent, looping: bool) -> Result<()> {
        let slot = self.check(component)?;
        self.backend.set_looping(self.sounds[slot], looping);
        Ok(())
    }

    pub fn is_looping(&self, component: AudioComponent) -> Result<bool> {
        let slot = self.check(component)?;
        Ok(self.backend.is_looping(self.sounds[slot]))
    }

    /// Push every active source position, then the listener pose
    pub fn update(&mut self, transforms: &TransformStore) {
        for slot in 0..self.flags.len() {
            if !self.flags[slot].contains(ComponentFlags::ACTIVE) || !self.slots.is_live(slot as u32)
            {
                continue;
            }

            match transforms.get(self.entities[slot]) {
                Some(transform) => {
                    self.backend.set_sound_position(self.sounds[slot], transform.position);
                }
                None => {
                    crate::engine_warn!(
                        "meteor3d::Audio",
                        "Component entity is gone from the transform store"
                    );
                }
            }
        }

        if let Some(listener) = self.listener {
            match transforms.get(listener) {
                Some(transform) => {
                    self.backend.set_listener(transform.position, transform.rotation);
                }
                None => {
                    crate::engine_warn!(
                        "meteor3d::Audio",
                        "Listener entity is gone from the transform store"
                    );
                }
            }
        }
    }

    /// Direct access to the backend for application-level control
    pub fn backend(&self) -> &dyn AudioBackend {
        self.backend.as_ref()
    }

    fn check(&self, component: AudioComponent) -> Result<usize> {
        if !self.slots.is_live(component.0) {
            return Err(crate::engine_err!(
                "meteor3d::Audio",
                Error::InvalidHandle(format!(
                    "audio component {} is dead or out of range",
                    component.0
                ))
            ));
        }
        Ok(component.0 as usize)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "audio_scene_tests.rs"]
mod tests;
