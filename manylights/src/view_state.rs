use log::debug;

use crate::camera_controller::LightingTextures;
use crate::{Camera, Config, Device};

/// Whether a frame got rendered with or without temporal history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryState {
    #[default]
    Cold,
    Warm,
}

/// Lighting accumulated by the previous frame, together with the point of
/// view it was rendered from.
#[derive(Debug)]
pub struct TemporalHistory {
    pub lighting: LightingTextures,
    pub camera: Camera,
}

/// State that a camera carries from one frame to another.
#[derive(Debug, Default)]
pub struct ViewState {
    history: Option<TemporalHistory>,
    frame: u32,
    reset_requested: bool,
}

impl ViewState {
    /// Returns the number of frames rendered so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn history(&self) -> Option<&TemporalHistory> {
        self.history.as_ref()
    }

    /// Makes the next frame start from scratch.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Discards history that can't be used for the upcoming frame and returns
    /// whether the frame is going to be rendered with history.
    pub fn begin_frame(
        &mut self,
        config: &Config,
        camera: &Camera,
        camera_cut: bool,
    ) -> HistoryState {
        let reason = if self.history.is_none() {
            None
        } else if !config.temporal {
            Some("temporal accumulation is disabled")
        } else if self.reset_requested {
            Some("reset requested")
        } else if camera_cut {
            Some("camera cut")
        } else if config.reset_every_nth_frame.map_or(false, |n| {
            self.frame > 0 && self.frame % n == 0
        }) {
            Some("periodic reset")
        } else if self.history.as_ref().map_or(false, |history| {
            history.lighting.size() != camera.viewport_size
        }) {
            Some("viewport size changed")
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!("Invalidating temporal history: {reason}");

            self.history = None;
        }

        self.reset_requested = false;

        if self.history.is_some() {
            HistoryState::Warm
        } else {
            HistoryState::Cold
        }
    }

    /// Turns lighting produced by the current frame into history for the next
    /// one; `lighting` gets replaced with textures the next frame can write
    /// into.
    ///
    /// If there's not enough memory to keep the history, the next frame is
    /// simply rendered without it.
    pub fn end_frame(
        &mut self,
        device: &Device,
        config: &Config,
        camera: &Camera,
        lighting: &mut LightingTextures,
    ) {
        self.frame = self.frame.wrapping_add(1);

        if !config.temporal {
            self.history = None;
            return;
        }

        let textures = match self.history.take() {
            Some(history) => Ok(history.lighting),

            None => LightingTextures::new(
                device,
                "manylights_history",
                lighting.size(),
            ),
        };

        match textures {
            Ok(mut textures) => {
                textures.swap(lighting);

                self.history = Some(TemporalHistory {
                    lighting: textures,
                    camera: camera.clone(),
                });
            }

            Err(err) => {
                debug!("Couldn't allocate temporal history: {err}");
            }
        }
    }
}
