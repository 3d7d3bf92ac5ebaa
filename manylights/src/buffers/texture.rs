use std::marker::PhantomData;
use std::{fmt, mem};

use bytemuck::Pod;
use glam::{UVec2, Vec4};
use log::debug;

use super::{padded_bytes_per_row, read_buffer, staging_buffer, Bindable};
use crate::device::Device;
use crate::memory::Allocation;
use crate::Error;

/// Value stored in a single texel.
pub trait TextureTexel: Pod {
    const FORMAT: wgpu::TextureFormat;
}

impl TextureTexel for Vec4 {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
}

impl TextureTexel for f32 {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;
}

/// Two-dimensional storage texture.
pub struct Texture<T> {
    label: String,
    size: UVec2,
    tex: wgpu::Texture,
    tex_view: wgpu::TextureView,
    _allocation: Allocation,
    _marker: PhantomData<T>,
}

pub type RgbaTexture = Texture<Vec4>;
pub type RTexture = Texture<f32>;

impl<T> Texture<T>
where
    T: TextureTexel,
{
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        size: UVec2,
    ) -> Result<Self, Error> {
        let label = label.as_ref();

        debug!("Allocating texture `{label}`; size={:?}", size);

        if size.x == 0 || size.y == 0 {
            return Err(Error::InvalidViewport { size });
        }

        let allocation = device.allocate(
            label,
            (size.x as usize) * (size.y as usize) * mem::size_of::<T>(),
        )?;

        let tex = device.raw().create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label}_tex")),
            size: Self::extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: T::FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let tex_view = tex.create_view(&Default::default());

        Ok(Self {
            label: label.to_owned(),
            size,
            tex,
            tex_view,
            _allocation: allocation,
            _marker: PhantomData,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Copies texels row-by-row from given slice.
    pub fn upload(&self, device: &Device, texels: &[T]) {
        device.queue().write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(texels),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(self.bytes_per_row()),
                rows_per_image: Some(self.size.y),
            },
            Self::extent(self.size),
        );
    }

    /// Copies texels back to the CPU, row-by-row, waiting for all the work
    /// submitted so far.
    pub fn download(&self, device: &Device) -> Result<Vec<T>, Error> {
        let bytes_per_row = self.bytes_per_row() as usize;
        let padded_bytes_per_row = padded_bytes_per_row(self.bytes_per_row());

        let staging = staging_buffer(
            device,
            &self.label,
            (padded_bytes_per_row as u64) * (self.size.y as u64),
        );

        let mut encoder = device.create_command_encoder("manylights_readback");

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.size.y),
                },
            },
            Self::extent(self.size),
        );

        device.submit(encoder);

        let bytes = read_buffer(device, &self.label, &staging)?;

        Ok(bytes
            .chunks_exact(padded_bytes_per_row as usize)
            .flat_map(|row| row[..bytes_per_row].chunks_exact(mem::size_of::<T>()))
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }

    fn bytes_per_row(&self) -> u32 {
        self.size.x * (mem::size_of::<T>() as u32)
    }

    fn extent(size: UVec2) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        }
    }
}

impl<T> Bindable for Texture<T>
where
    T: TextureTexel,
{
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::ReadWrite,
                format: T::FORMAT,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            count: None,
        };

        let resource = wgpu::BindingResource::TextureView(&self.tex_view);

        vec![(layout, resource)]
    }
}

impl<T> fmt::Debug for Texture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.label)
            .field("size", &self.size)
            .finish()
    }
}
