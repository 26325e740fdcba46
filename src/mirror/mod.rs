mod builder;
#[allow(clippy::module_inception)]
mod mirror;

pub use builder::*;
pub use mirror::*;
