/*! Snapshot of a process and its main window. */

use super::{ProcessId, WindowHandle};

/// A process exposing a visible, titled main window.
///
/// Immutable snapshot taken at enumeration time. It goes stale when the
/// process exits or its main window changes; callers re-query the OS
/// (see [`Platform::has_exited`](crate::Platform::has_exited)) before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessWindow {
  pub process_id: ProcessId,
  pub process_name: String,
  pub window_title: String,
  pub window_handle: WindowHandle,
}

impl ProcessWindow {
  /// Text shown for this record in a process selector.
  pub fn label(&self) -> String {
    format!("{} - {}", self.process_name, self.window_title)
  }

  /// Selector text once the process is known to have exited.
  pub fn exited_label(&self) -> String {
    format!("{} (Exited)", self.process_name)
  }
}
