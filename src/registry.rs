//! Registration Registry
//!
//! Ordered bookkeeping of active lights and media. The registry is owned by
//! the renderer and mutated only from the host's simulation step, never
//! concurrently with a render dispatch.
//!
//! Registration is idempotent by descriptor id: re-registering an id updates
//! its descriptor in place without changing its position, and unregistering
//! an unknown id is a no-op. Order matters — the material writer applies
//! media in registration order (last writer wins per cell), and the shadow
//! and scatter writers iterate lights the same way.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::light::{LightDescriptor, LightId};
use crate::media::{MediumDescriptor, MediumId};

static NEXT_DESCRIPTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Mints a unique id for a light or medium descriptor.
pub(crate) fn generate_descriptor_id() -> u64 {
    NEXT_DESCRIPTOR_ID.fetch_add(1, Ordering::Relaxed)
}

/// Active lights and media, in registration order.
#[derive(Debug, Default)]
pub struct FroxelRegistry {
    lights: Vec<(LightId, LightDescriptor)>,
    media: Vec<(MediumId, MediumDescriptor)>,
}

impl FroxelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a light, or updates it in place if the id is already
    /// present. Returns `true` when a new entry was inserted.
    pub fn register_light(&mut self, id: LightId, descriptor: LightDescriptor) -> bool {
        if let Some(entry) = self.lights.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            entry.1 = descriptor;
            false
        } else {
            self.lights.push((id, descriptor));
            true
        }
    }

    /// Removes a light. Unknown ids are a no-op; returns `true` on removal.
    pub fn unregister_light(&mut self, id: LightId) -> bool {
        let before = self.lights.len();
        self.lights.retain(|(entry_id, _)| *entry_id != id);
        self.lights.len() != before
    }

    /// Registers a medium, or updates it in place if the id is already
    /// present. Returns `true` when a new entry was inserted.
    pub fn register_medium(&mut self, id: MediumId, descriptor: MediumDescriptor) -> bool {
        if let Some(entry) = self.media.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            entry.1 = descriptor;
            false
        } else {
            self.media.push((id, descriptor));
            true
        }
    }

    /// Removes a medium. Unknown ids are a no-op; returns `true` on removal.
    pub fn unregister_medium(&mut self, id: MediumId) -> bool {
        let before = self.media.len();
        self.media.retain(|(entry_id, _)| *entry_id != id);
        self.media.len() != before
    }

    /// Lights in registration order.
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &LightDescriptor)> {
        self.lights.iter().map(|(id, desc)| (*id, desc))
    }

    /// Media in registration order.
    pub fn media(&self) -> impl Iterator<Item = (MediumId, &MediumDescriptor)> {
        self.media.iter().map(|(id, desc)| (*id, desc))
    }

    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    #[must_use]
    pub fn medium_count(&self) -> usize {
        self.media.len()
    }
}
