pub mod classical;
pub mod encoding;
pub mod hash;
pub mod stream;

pub use classical::*;
pub use encoding::*;
pub use hash::*;
pub use stream::*;
