/*!
Platform abstraction traits.

These traits define the contract between core code and platform implementations.
Platform-specific code (e.g., Win32) implements these traits.
Core code only uses these traits - never platform-specific types directly.
*/

use crate::types::{ProcessId, TopmostResult, WindowHandle};
use std::collections::HashMap;

/// A running process as reported by the OS process listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
  /// OS process identifier.
  pub id: ProcessId,
  /// Executable name without its extension (e.g. `notepad`).
  pub name: String,
}

impl ProcessEntry {
  /// Build an entry from an executable file name, dropping a trailing `.exe`.
  pub fn from_executable(id: ProcessId, executable: &str) -> Self {
    let name = executable
      .len()
      .checked_sub(4)
      .and_then(|split| Some((executable.get(..split)?, executable.get(split..)?)))
      .filter(|(_, extension)| extension.eq_ignore_ascii_case(".exe"))
      .map_or(executable, |(stem, _)| stem);
    Self {
      id,
      name: name.to_owned(),
    }
  }
}

/// Z-order placement requested from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZOrder {
  /// Place the window above all non-topmost windows, and keep it there.
  Topmost,
  /// Restore normal z-order (directly behind the topmost band).
  NoTopmost,
}

/// Operating-system surface used by enumeration and toggling.
///
/// Calls are synchronous and fast; every method is invoked on the UI thread.
pub trait Platform {
  /// List all running processes.
  fn processes(&self) -> TopmostResult<Vec<ProcessEntry>>;

  /// Map every process that has a main window to that window, in one pass.
  ///
  /// Processes without a main window are absent from the map.
  fn main_windows(&self) -> TopmostResult<HashMap<ProcessId, WindowHandle>>;

  /// Fetch the title of a window. Empty if untitled.
  fn window_title(&self, window: WindowHandle) -> TopmostResult<String>;

  /// Check whether the OS reports the window as visible.
  fn is_window_visible(&self, window: WindowHandle) -> bool;

  /// Check whether a process has exited. Always asks the OS, never cached.
  fn has_exited(&self, pid: ProcessId) -> TopmostResult<bool>;

  /// Change a window's z-order without moving or resizing it.
  fn set_z_order(&self, window: WindowHandle, order: ZOrder) -> TopmostResult<()>;
}
