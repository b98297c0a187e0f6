/// Memory-link gallery: directory indexes, navigation and frame rendering
///
/// A memory folder holds one `memory_link_<n>` subfolder per reconnected
/// particle track; each subfolder holds `frame_<00000>.jpg` crops.

pub mod frame_index;
pub mod link_index;
pub mod navigator;
pub mod render;

pub use navigator::Navigator;
