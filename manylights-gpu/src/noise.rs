mod blue;
mod white;

pub use self::blue::*;
pub use self::white::*;
