//! Class metadata: descriptors, tags, and the accessor the modeller reads
//! them through.
mod accessor;
mod load;
mod types;

pub use accessor::*;
pub use load::*;
pub use types::*;
