pub mod container_group;
pub mod execution;
pub mod framework_version;

pub use container_group::*;
pub use execution::*;
pub use framework_version::*;
