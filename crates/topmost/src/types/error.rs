/*! Error types for window tracking and toggling. */

use super::ProcessId;

/// Errors that can occur while enumerating or toggling windows.
///
/// None of these are fatal; they are surfaced to the user as a status line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopmostError {
  /// Inspecting a single process failed during enumeration; the process is skipped.
  #[error("Error processing {process}: {reason}")]
  EnumerationItem { process: String, reason: String },

  /// The process or window listing could not be taken. Carries the Win32 error code.
  #[error("Unable to list processes: Error {0}")]
  ProcessListing(u32),

  #[error("Process {0} has exited")]
  ProcessExited(ProcessId),

  #[error("No valid window handle found")]
  NoWindowHandle,

  /// An OS call reported failure. Carries the Win32 error code.
  #[error("Failed to modify window: Error {0}")]
  OsCallFailed(u32),

  /// Querying whether a process is still running failed.
  #[error("Unable to query process {process}: Error {code}")]
  ProcessQuery { process: ProcessId, code: u32 },

  #[error("Please select a process first")]
  NoSelection,
}

/// Result type for topmost operations.
pub type TopmostResult<T> = Result<T, TopmostError>;
