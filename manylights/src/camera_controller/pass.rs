use std::cell::OnceCell;
use std::marker::PhantomData;
use std::mem;
use std::ops::Range;

use bytemuck::Pod;
use glam::{UVec2, UVec3};
use log::{debug, trace};

use crate::{gpu, Bindable, CommandEncoder, Device, Kernel, StorageBuffer};

/// A single compute stage of the camera's pipeline.
///
/// Bindings are provided anew on each run (history textures get swapped
/// between frames), the pipeline gets built once, on the first run.
#[derive(Debug)]
pub struct CameraComputePass<P = ()> {
    label: &'static str,
    kernel: Kernel,
    pipeline: OnceCell<(wgpu::BindGroupLayout, wgpu::ComputePipeline)>,
    _params: PhantomData<P>,
}

enum Dispatch<'a> {
    Direct(UVec3),
    Indirect(&'a wgpu::Buffer, u64),
}

impl<P> CameraComputePass<P>
where
    P: Pod,
{
    pub fn new(label: &'static str, kernel: &Kernel) -> Self {
        debug!("Initializing pass `{label}`");

        Self {
            label,
            kernel: kernel.clone(),
            pipeline: OnceCell::new(),
            _params: PhantomData,
        }
    }

    /// Dispatches one thread per element of a two-dimensional grid of given
    /// size, in workgroups of 8x8 threads.
    pub fn run(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        size: UVec2,
        params: P,
    ) {
        let workgroups =
            ((size + gpu::TILE_SIZE - 1) / gpu::TILE_SIZE).extend(1);

        self.dispatch(
            device,
            encoder,
            bindings,
            Dispatch::Direct(workgroups),
            params,
        );
    }

    /// Dispatches a single workgroup.
    pub fn run_once(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        params: P,
    ) {
        self.dispatch(
            device,
            encoder,
            bindings,
            Dispatch::Direct(UVec3::ONE),
            params,
        );
    }

    /// Dispatches one workgroup per tile of given type; the number of tiles
    /// is read from `args` by the GPU, so that it can be produced by earlier
    /// passes of the same frame.
    pub fn run_tiles(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        args: &StorageBuffer<u32>,
        tile_type: gpu::TileType,
        params: P,
    ) {
        let offset = gpu::DispatchIndirectArgs::offset(tile_type)
            * mem::size_of::<u32>();

        self.dispatch(
            device,
            encoder,
            bindings,
            Dispatch::Indirect(args.raw(), offset as u64),
            params,
        );
    }

    fn dispatch(
        &self,
        device: &Device,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        dispatch: Dispatch<'_>,
        params: P,
    ) {
        let mut entries = Vec::new();

        for item in bindings {
            entries.extend(item.bind(entries.len() as u32));
        }

        let (bind_group_layout, pipeline) = self
            .pipeline
            .get_or_init(|| self.build(device, &entries));

        let bind_group_label = format!("manylights_{}_bind_group", self.label);

        let bind_group_entries: Vec<_> = entries
            .iter()
            .map(|(layout, resource)| wgpu::BindGroupEntry {
                binding: layout.binding,
                resource: resource.clone(),
            })
            .collect();

        let bind_group =
            device
                .raw()
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&bind_group_label),
                    layout: bind_group_layout,
                    entries: &bind_group_entries,
                });

        let label = format!("manylights_{}_pass", self.label);

        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&label),
                timestamp_writes: None,
            });

        pass.set_pipeline(pipeline);

        if mem::size_of::<P>() > 0 {
            pass.set_push_constants(0, bytemuck::bytes_of(&params));
        }

        pass.set_bind_group(0, &bind_group, &[]);

        match dispatch {
            Dispatch::Direct(workgroups) => {
                trace!(
                    "Recording pass `{}`; workgroups={workgroups}",
                    self.label
                );

                pass.dispatch_workgroups(
                    workgroups.x,
                    workgroups.y,
                    workgroups.z,
                );
            }

            Dispatch::Indirect(args, offset) => {
                trace!(
                    "Recording pass `{}`; indirect offset={offset}",
                    self.label
                );

                pass.dispatch_workgroups_indirect(args, offset);
            }
        }
    }

    fn build(
        &self,
        device: &Device,
        entries: &[(wgpu::BindGroupLayoutEntry, wgpu::BindingResource<'_>)],
    ) -> (wgpu::BindGroupLayout, wgpu::ComputePipeline) {
        debug!(
            "Building pipeline for pass `{}`: {}",
            self.label, self.kernel.entry_point
        );

        let device = device.raw();

        let bind_group_layout_label =
            format!("manylights_{}_bind_group_layout", self.label);

        let bind_group_layout_entries: Vec<_> =
            entries.iter().map(|(layout, _)| *layout).collect();

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&bind_group_layout_label),
                entries: &bind_group_layout_entries,
            });

        let push_constant_ranges = if mem::size_of::<P>() > 0 {
            vec![wgpu::PushConstantRange {
                stages: wgpu::ShaderStages::COMPUTE,
                range: Range {
                    start: 0,
                    end: mem::size_of::<P>() as u32,
                },
            }]
        } else {
            vec![]
        };

        let pipeline_layout_label =
            format!("manylights_{}_pipeline_layout", self.label);

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&pipeline_layout_label),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &push_constant_ranges,
            });

        let pipeline_label = format!("manylights_{}_pipeline", self.label);

        let pipeline =
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&pipeline_label),
                layout: Some(&pipeline_layout),
                module: &self.kernel.module,
                entry_point: self.kernel.entry_point,
            });

        (bind_group_layout, pipeline)
    }
}
