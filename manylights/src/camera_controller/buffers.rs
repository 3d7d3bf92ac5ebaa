use std::mem;

use glam::UVec2;
use log::debug;

use crate::{
    gpu, Camera, Config, Device, Error, RTexture, RgbaTexture, StorageBuffer,
    UniformBuffer,
};

#[derive(Debug)]
pub struct CameraBuffers {
    pub frame: UniformBuffer<gpu::FrameParams>,
    pub camera: UniformBuffer<gpu::Camera>,

    /// Lights of the current frame; grows as needed, never shrinks.
    pub lights: StorageBuffer<gpu::Light>,

    pub gbuffer_d0: RgbaTexture,
    pub gbuffer_d1: RgbaTexture,
    pub scene_color: RgbaTexture,

    pub tiles: TileBuffers,
    pub downsampled_tiles: TileBuffers,

    pub surface_map: RgbaTexture,
    pub light_samples: RgbaTexture,
    pub upsample_weights: RgbaTexture,
    pub resolved_diffuse: RgbaTexture,
    pub resolved_specular: RgbaTexture,

    /// Visibility queries, one per texel of `light_samples`.
    pub rays: StorageBuffer<gpu::RayQuery>,

    /// Answers to `rays`, as written by the visibility tracer.
    pub hits: StorageBuffer<f32>,

    /// Records printed by kernels in debug mode (see: [`gpu::DebugLog`]).
    pub debug: StorageBuffer<u32>,

    /// Output of the temporal accumulation; swapped with the history at the
    /// end of each frame.
    pub lighting: LightingTextures,
}

impl CameraBuffers {
    pub fn new(
        device: &Device,
        camera: &Camera,
        config: &Config,
    ) -> Result<Self, Error> {
        debug!("Initializing camera buffers");

        let size = camera.viewport_size;

        if size.x == 0 || size.y == 0 {
            return Err(Error::InvalidViewport { size });
        }

        let ds_size = camera.serialize(None).downsampled_size();
        let spp = config.samples_per_pixel_2d().max(UVec2::ONE);
        let light_samples_size = ds_size * spp;
        let light_samples_len =
            (light_samples_size.x as usize) * (light_samples_size.y as usize);

        Ok(Self {
            frame: UniformBuffer::new(device, "manylights_frame")?,
            camera: UniformBuffer::new(device, "manylights_camera")?,
            lights: StorageBuffer::new(device, "manylights_lights", 1)?,

            gbuffer_d0: RgbaTexture::new(device, "manylights_gbuffer_d0", size)?,
            gbuffer_d1: RgbaTexture::new(device, "manylights_gbuffer_d1", size)?,
            scene_color: RgbaTexture::new(
                device,
                "manylights_scene_color",
                size,
            )?,

            tiles: TileBuffers::new(device, "manylights_tiles", size)?,
            downsampled_tiles: TileBuffers::new(
                device,
                "manylights_downsampled_tiles",
                ds_size,
            )?,

            surface_map: RgbaTexture::new(
                device,
                "manylights_surface_map",
                ds_size,
            )?,
            light_samples: RgbaTexture::new(
                device,
                "manylights_light_samples",
                light_samples_size,
            )?,
            upsample_weights: RgbaTexture::new(
                device,
                "manylights_upsample_weights",
                size,
            )?,
            resolved_diffuse: RgbaTexture::new(
                device,
                "manylights_resolved_diffuse",
                ds_size,
            )?,
            resolved_specular: RgbaTexture::new(
                device,
                "manylights_resolved_specular",
                ds_size,
            )?,

            rays: StorageBuffer::new(
                device,
                "manylights_rays",
                light_samples_len,
            )?,
            hits: StorageBuffer::new(
                device,
                "manylights_hits",
                light_samples_len,
            )?,
            debug: StorageBuffer::new(
                device,
                "manylights_debug",
                gpu::DebugLog::SIZE,
            )?,

            lighting: LightingTextures::new(device, "manylights_lighting", size)?,
        })
    }

    /// Uploads lights, reallocating the buffer if they don't fit.
    pub fn upload_lights(
        &mut self,
        device: &Device,
        lights: &[gpu::Light],
    ) -> Result<(), Error> {
        if lights.len() > self.lights.len() {
            let len = lights.len().next_power_of_two();

            debug!("Growing lights buffer; len={len}");

            self.lights =
                StorageBuffer::new(device, "manylights_lights", len)?;
        }

        if !lights.is_empty() {
            self.lights.write(device, lights);
        }

        Ok(())
    }
}

/// Tiles of one of the grids (full-resolution or downsampled), split into
/// categories.
#[derive(Debug)]
pub struct TileBuffers {
    pub grid_size: UVec2,

    /// Number of tiles in each category.
    pub allocator: StorageBuffer<u32>,

    /// Tiles of each category, one list after another.
    pub data: StorageBuffer<u32>,

    /// Indirect dispatch arguments, one entry per category.
    pub args: StorageBuffer<u32>,
}

impl TileBuffers {
    fn new(device: &Device, label: &str, size: UVec2) -> Result<Self, Error> {
        let grid_size = gpu::tile_grid_size(size);
        let stride = gpu::tile_count(size) as usize;

        Ok(Self {
            grid_size,
            allocator: StorageBuffer::new(
                device,
                format!("{label}_allocator"),
                gpu::TileType::MAX,
            )?,
            data: StorageBuffer::new(
                device,
                format!("{label}_data"),
                gpu::TileType::MAX * stride,
            )?,
            args: StorageBuffer::new(
                device,
                format!("{label}_args"),
                gpu::TileType::MAX * gpu::DispatchIndirectArgs::SIZE,
            )?,
        })
    }

    /// Returns how many tiles got assigned to each category; waits for the
    /// frame to complete.
    pub fn counts(
        &self,
        device: &Device,
    ) -> Result<[u32; gpu::TileType::MAX], Error> {
        let mut counters = self.allocator.download(device)?;
        let allocator = gpu::TileAllocator::new(&mut counters);

        Ok(gpu::TileType::ALL.map(|tile_type| allocator.count(tile_type)))
    }
}

/// Accumulated lighting, either the one being produced or the one from the
/// previous frame.
#[derive(Debug)]
pub struct LightingTextures {
    pub diffuse: RgbaTexture,
    pub specular: RgbaTexture,
    pub frames: RTexture,
    pub depth: RTexture,
}

impl LightingTextures {
    pub fn new(
        device: &Device,
        label: &str,
        size: UVec2,
    ) -> Result<Self, Error> {
        Ok(Self {
            diffuse: RgbaTexture::new(
                device,
                format!("{label}_diffuse"),
                size,
            )?,
            specular: RgbaTexture::new(
                device,
                format!("{label}_specular"),
                size,
            )?,
            frames: RTexture::new(device, format!("{label}_frames"), size)?,
            depth: RTexture::new(device, format!("{label}_depth"), size)?,
        })
    }

    pub fn size(&self) -> UVec2 {
        self.diffuse.size()
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}
