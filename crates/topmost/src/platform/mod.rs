/*! Platform Abstraction Layer */

mod traits;
pub use traits::{Platform, ProcessEntry, ZOrder};

// Platform-specific implementations
#[cfg(target_os = "windows")]
mod win32;

#[cfg(target_os = "windows")]
pub use win32::WindowsPlatform;

/// The platform implementation for the compilation target.
#[cfg(target_os = "windows")]
pub type CurrentPlatform = WindowsPlatform;

#[cfg(test)]
pub(crate) mod fake;
