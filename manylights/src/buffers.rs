mod bindable;
mod readback;
mod storage_buffer;
mod texture;
mod uniform_buffer;

pub use self::bindable::*;
pub(crate) use self::readback::*;
pub use self::storage_buffer::*;
pub use self::texture::*;
pub use self::uniform_buffer::*;
