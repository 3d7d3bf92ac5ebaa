use crate::{Light, LightId};

/// Lights of the current frame.
///
/// The buffer can be larger than the number of lights (it's never empty, so
/// that it can be bound), hence the explicit count.
#[derive(Clone, Copy)]
pub struct LightsView<'a> {
    items: &'a [Light],
    len: u32,
}

impl<'a> LightsView<'a> {
    pub fn new(items: &'a [Light], len: u32) -> Self {
        let len = if (len as usize) < items.len() {
            len
        } else {
            items.len() as u32
        };

        Self { items, len }
    }

    pub fn get(&self, id: LightId) -> Light {
        self.items[id.get() as usize]
    }

    pub fn len(&self) -> u32 {
        self.len
    }
}
