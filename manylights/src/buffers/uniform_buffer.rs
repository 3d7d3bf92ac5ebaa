use std::marker::PhantomData;
use std::{any, fmt, mem, slice};

use bytemuck::Pod;
use log::debug;

use super::Bindable;
use crate::device::Device;
use crate::memory::Allocation;
use crate::Error;

pub struct UniformBuffer<T> {
    label: String,
    buffer: wgpu::Buffer,
    _allocation: Allocation,
    _marker: PhantomData<T>,
}

impl<T> UniformBuffer<T>
where
    T: Pod,
{
    pub fn new(device: &Device, label: impl AsRef<str>) -> Result<Self, Error> {
        let label = label.as_ref();
        let size = mem::size_of::<T>();
        let size = (size + 31) & !31;

        debug!(
            "Allocating uniform buffer `{label}`; ty={}, size={size} (padded from {})",
            any::type_name::<T>(),
            mem::size_of::<T>(),
        );

        let allocation = device.allocate(label, size)?;

        let buffer = device.raw().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
            size: size as _,
            mapped_at_creation: false,
        });

        Ok(Self {
            label: label.to_owned(),
            buffer,
            _allocation: allocation,
            _marker: PhantomData,
        })
    }

    pub fn write(&self, device: &Device, data: &T) {
        device.queue().write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(slice::from_ref(data)),
        );
    }
}

impl<T> Bindable for UniformBuffer<T> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let resource = self.buffer.as_entire_binding();

        vec![(layout, resource)]
    }
}

impl<T> fmt::Debug for UniformBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformBuffer")
            .field("label", &self.label)
            .finish()
    }
}
