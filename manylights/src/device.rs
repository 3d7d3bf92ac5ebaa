use std::sync::Arc;

use log::{debug, info};

use crate::memory::{Allocation, MemoryBudget};
use crate::Error;

pub type CommandEncoder = wgpu::CommandEncoder;

/// GPU on which all buffers live and all kernels run.
#[derive(Debug)]
pub struct Device {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    memory: MemoryBudget,
}

impl Device {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
    ) -> Result<Self, Error> {
        let missing = Self::required_features() - device.features();

        if !missing.is_empty() {
            return Err(Error::UnsupportedDevice {
                reason: format!("missing features: {missing:?}"),
            });
        }

        let limits = device.limits();
        let required = Self::required_limits();

        if limits.max_storage_textures_per_shader_stage
            < required.max_storage_textures_per_shader_stage
            || limits.max_push_constant_size < required.max_push_constant_size
        {
            return Err(Error::UnsupportedDevice {
                reason: format!(
                    "insufficient limits: {} storage textures per stage, \
                     {} bytes of push constants",
                    limits.max_storage_textures_per_shader_stage,
                    limits.max_push_constant_size,
                ),
            });
        }

        info!("Device ready; features={:?}", device.features());

        Ok(Self {
            device,
            queue,
            memory: Default::default(),
        })
    }

    /// Features the device has to be requested with.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::PUSH_CONSTANTS
            | wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES
    }

    /// Limits the device has to be requested with.
    pub fn required_limits() -> wgpu::Limits {
        wgpu::Limits {
            max_storage_textures_per_shader_stage: 16,
            max_push_constant_size: 128,
            ..Default::default()
        }
    }

    pub(crate) fn with_memory_budget(self, budget: Option<usize>) -> Self {
        debug!("Using memory budget: {budget:?}");

        Self {
            memory: MemoryBudget::new(budget),
            ..self
        }
    }

    /// Returns the number of bytes currently allocated.
    pub fn allocated(&self) -> usize {
        self.memory.allocated()
    }

    pub fn budget(&self) -> Option<usize> {
        self.memory.limit()
    }

    pub(crate) fn allocate(
        &self,
        label: &str,
        size: usize,
    ) -> Result<Allocation, Error> {
        self.memory.allocate(label, size)
    }

    pub(crate) fn raw(&self) -> &wgpu::Device {
        &self.device
    }

    pub(crate) fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub(crate) fn create_command_encoder(&self, label: &str) -> CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(label),
            })
    }

    pub(crate) fn submit(&self, encoder: CommandEncoder) {
        self.queue.submit(Some(encoder.finish()));
    }
}
