//! CPU rendition of the compute backend, used to test the pipeline without a
//! GPU.
//!
//! Buffers and textures live in host memory, while kernels are the very same
//! functions the shader builder compiles to SPIR-V, called once per thread.
//! Commands still get recorded first and executed only once submitted, with
//! indirect dispatches reading their arguments at execution time.

mod buffers;
mod device;
mod encoder;
mod pass;
mod shaders;
mod tracer;

pub use self::buffers::*;
pub use self::device::*;
pub use self::encoder::*;
pub use self::pass::*;
pub use self::shaders::*;
pub use self::tracer::*;
