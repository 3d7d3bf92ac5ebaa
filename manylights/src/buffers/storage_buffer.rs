use std::marker::PhantomData;
use std::{any, fmt, mem};

use bytemuck::Pod;
use log::debug;

use super::{read_buffer, staging_buffer, Bindable};
use crate::device::{CommandEncoder, Device};
use crate::memory::Allocation;
use crate::Error;

/// Storage buffer read and written by kernels; indirect dispatches read their
/// arguments from such buffers, too.
pub struct StorageBuffer<T> {
    label: String,
    len: usize,
    buffer: wgpu::Buffer,
    _allocation: Allocation,
    _marker: PhantomData<T>,
}

impl<T> StorageBuffer<T>
where
    T: Pod,
{
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        len: usize,
    ) -> Result<Self, Error> {
        let label = label.as_ref();
        let size = len * mem::size_of::<T>();

        debug!(
            "Allocating storage buffer `{label}`; ty={}, len={len}",
            any::type_name::<T>(),
        );

        let allocation = device.allocate(label, size)?;

        let buffer = device.raw().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::INDIRECT,
            size: size as _,
            mapped_at_creation: false,
        });

        Ok(Self {
            label: label.to_owned(),
            len,
            buffer,
            _allocation: allocation,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn write(&self, device: &Device, items: &[T]) {
        device
            .queue()
            .write_buffer(&self.buffer, 0, bytemuck::cast_slice(items));
    }

    /// Records zeroing of the entire buffer.
    pub fn clear(&self, encoder: &mut CommandEncoder) {
        encoder.clear_buffer(&self.buffer, 0, None);
    }

    /// Copies the buffer back to the CPU, waiting for all the work submitted
    /// so far.
    pub fn download(&self, device: &Device) -> Result<Vec<T>, Error> {
        let size = (self.len * mem::size_of::<T>()) as u64;
        let staging = staging_buffer(device, &self.label, size);
        let mut encoder = device.create_command_encoder("manylights_readback");

        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging, 0, size);
        device.submit(encoder);

        let bytes = read_buffer(device, &self.label, &staging)?;

        Ok(bytes
            .chunks_exact(mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }

    pub(crate) fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl<T> Bindable for StorageBuffer<T> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage {
                    // TODO should say `read_only: true` for buffers kernels
                    //      only read, but rust-gpu is not able to emit
                    //      appropriate attributes yet, causing naga to reject
                    //      the shader later
                    read_only: false,
                },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let resource = self.buffer.as_entire_binding();

        vec![(layout, resource)]
    }
}

impl<T> fmt::Debug for StorageBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageBuffer")
            .field("label", &self.label)
            .field("len", &self.len)
            .finish()
    }
}
