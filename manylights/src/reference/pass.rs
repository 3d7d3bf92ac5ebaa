use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use bytemuck::Pod;
use glam::{uvec3, UVec2, UVec3};
use log::debug;

use super::{
    Bindable, Bindings, CommandEncoder, Device, Invocation, Kernel,
    StorageBuffer,
};
use crate::gpu;

enum Workgroups {
    Direct(UVec3),

    /// Read from the buffer when the command gets executed, so that earlier
    /// commands of the same submission can produce it.
    Indirect {
        args: Rc<RefCell<Vec<u32>>>,
        offset: usize,
    },
}

impl Workgroups {
    fn get(&self) -> UVec3 {
        match self {
            Workgroups::Direct(workgroups) => *workgroups,

            Workgroups::Indirect { args, offset } => {
                let args =
                    gpu::DispatchIndirectArgs::read(&args.borrow(), *offset);

                uvec3(args.x, args.y, args.z)
            }
        }
    }
}

/// A single compute stage of the camera's pipeline.
#[derive(Debug)]
pub struct CameraComputePass<P = ()> {
    label: &'static str,
    kernel: Kernel,
    _params: PhantomData<P>,
}

impl<P> CameraComputePass<P>
where
    P: Pod,
{
    pub fn new(label: &'static str, kernel: &Kernel) -> Self {
        debug!("Initializing pass `{label}`");

        Self {
            label,
            kernel: *kernel,
            _params: PhantomData,
        }
    }

    pub fn run(
        &self,
        _: &Device,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        size: UVec2,
        params: P,
    ) {
        let workgroups =
            ((size + gpu::TILE_SIZE - 1) / gpu::TILE_SIZE).extend(1);

        self.dispatch(
            encoder,
            bindings,
            Workgroups::Direct(workgroups),
            params,
        );
    }

    pub fn run_once(
        &self,
        _: &Device,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        params: P,
    ) {
        self.dispatch(
            encoder,
            bindings,
            Workgroups::Direct(UVec3::ONE),
            params,
        );
    }

    pub fn run_tiles(
        &self,
        _: &Device,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        args: &StorageBuffer<u32>,
        tile_type: gpu::TileType,
        params: P,
    ) {
        self.dispatch(
            encoder,
            bindings,
            Workgroups::Indirect {
                args: Rc::clone(args.raw()),
                offset: gpu::DispatchIndirectArgs::offset(tile_type),
            },
            params,
        );
    }

    fn dispatch(
        &self,
        encoder: &mut CommandEncoder,
        bindings: &[&dyn Bindable],
        workgroups: Workgroups,
        params: P,
    ) {
        let bindings = Bindings::new(bindings, bytemuck::bytes_of(&params));
        let kernel = self.kernel;

        encoder.push(self.label, move || {
            execute(kernel, &bindings, workgroups.get());
        });
    }
}

fn execute(kernel: Kernel, bindings: &Bindings, workgroups: UVec3) {
    let workgroup_size = kernel.workgroup_size;

    for wz in 0..workgroups.z {
        for wy in 0..workgroups.y {
            for wx in 0..workgroups.x {
                let workgroup_id = uvec3(wx, wy, wz);

                for lz in 0..workgroup_size.z {
                    for ly in 0..workgroup_size.y {
                        for lx in 0..workgroup_size.x {
                            let local_id = uvec3(lx, ly, lz);

                            (kernel.run)(
                                Invocation {
                                    global_id: workgroup_id * workgroup_size
                                        + local_id,
                                    workgroup_id,
                                    local_id,
                                },
                                bindings,
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    fn count(invocation: Invocation, bindings: &Bindings) {
        let mut stats = bindings.buffer_mut::<u32>(0);

        assert_eq!(
            invocation.global_id,
            invocation.workgroup_id * uvec3(8, 8, 1) + invocation.local_id
        );

        stats[0] += 1;
        stats[1] = stats[1].max(invocation.global_id.x);
        stats[2] = stats[2].max(invocation.global_id.y);
    }

    fn count_params(_: Invocation, bindings: &Bindings) {
        bindings.buffer_mut::<u32>(0)[0] += bindings.params::<u32>();
    }

    fn produce_args(_: Invocation, bindings: &Bindings) {
        gpu::DispatchIndirectArgs::from_tile_count(5).write(
            &mut bindings.buffer_mut::<u32>(0),
            gpu::DispatchIndirectArgs::offset(gpu::TileType::ComplexShading),
        );
    }

    fn step(_: Invocation, bindings: &Bindings) {
        let mut log = bindings.buffer_mut::<u32>(0);
        let expected = bindings.params::<u32>();

        assert_eq!(expected, log[0]);

        log[0] = expected + 1;
    }

    fn kernel(workgroup_size: UVec3, run: fn(Invocation, &Bindings)) -> Kernel {
        Kernel {
            workgroup_size,
            run,
        }
    }

    #[test]
    fn direct() {
        let device = Device::default();
        let stats = StorageBuffer::<u32>::new(&device, "stats", 3).unwrap();
        let pass = CameraComputePass::new("test", &kernel(uvec3(8, 8, 1), count));
        let mut encoder = device.create_command_encoder("test");

        pass.run(&device, &mut encoder, &[&stats], uvec2(13, 24), ());

        assert_eq!(vec![0, 0, 0], stats.download(&device).unwrap());

        device.submit(encoder);

        assert_eq!(
            vec![2 * 3 * 64, 15, 23],
            stats.download(&device).unwrap()
        );
    }

    #[test]
    fn indirect_args_are_read_at_execution_time() {
        let device = Device::default();

        let args = StorageBuffer::<u32>::new(
            &device,
            "args",
            gpu::TileType::MAX * gpu::DispatchIndirectArgs::SIZE,
        )
        .unwrap();

        let stats = StorageBuffer::<u32>::new(&device, "stats", 1).unwrap();

        let producer = CameraComputePass::new(
            "producer",
            &kernel(UVec3::ONE, produce_args),
        );

        let consumer = CameraComputePass::<u32>::new(
            "consumer",
            &kernel(uvec3(2, 1, 1), count_params),
        );

        let mut encoder = device.create_command_encoder("test");

        producer.run_once(&device, &mut encoder, &[&args], ());

        for tile_type in gpu::TileType::ALL {
            consumer.run_tiles(
                &device,
                &mut encoder,
                &[&stats],
                &args,
                tile_type,
                1,
            );
        }

        assert_eq!(4, encoder.len());

        device.submit(encoder);

        assert_eq!(vec![10], stats.download(&device).unwrap());
    }

    #[test]
    fn commands_run_in_order() {
        let device = Device::default();
        let log = StorageBuffer::<u32>::new(&device, "log", 1).unwrap();

        let pass =
            CameraComputePass::<u32>::new("step", &kernel(UVec3::ONE, step));

        let mut encoder = device.create_command_encoder("test");

        for nth in 0..3 {
            pass.run_once(&device, &mut encoder, &[&log], nth);
        }

        device.submit(encoder);

        assert_eq!(vec![3], log.download(&device).unwrap());
    }
}
