/*!
Process enumeration.

Builds the list of processes exposing a visible, titled main window.
A failure inspecting one process only skips that process. Main windows are
collected in a single pass per enumeration, not looked up per process.
*/

use crate::platform::{Platform, ProcessEntry};
use crate::types::{ProcessWindow, TopmostError, TopmostResult, WindowHandle};

/// Enumerate processes with a visible, titled main window, ordered by process name.
///
/// Every returned record has a non-null window handle and a non-empty title.
/// Never fails: when the process or window listing cannot be taken the failure
/// is logged and the result is empty.
pub fn enumerate<P: Platform>(platform: &P) -> Vec<ProcessWindow> {
  try_enumerate(platform).unwrap_or_else(|e| {
    log::warn!("Error loading processes: {e}");
    Vec::new()
  })
}

/// Like [`enumerate`], but reports a failed process or window listing.
pub(crate) fn try_enumerate<P: Platform>(platform: &P) -> TopmostResult<Vec<ProcessWindow>> {
  let entries = platform.processes()?;
  let windows = platform.main_windows()?;

  let mut records: Vec<ProcessWindow> = entries
    .into_iter()
    .filter_map(|entry| {
      let window = windows
        .get(&entry.id)
        .copied()
        .unwrap_or(WindowHandle::NULL);
      match inspect(platform, entry, window) {
        Ok(record) => record,
        Err(e) => {
          log::debug!("{e}");
          None
        }
      }
    })
    .collect();

  sort_by_name(&mut records);
  Ok(records)
}

/// Inspect one process and its main window. `Ok(None)` means it was filtered out.
fn inspect<P: Platform>(
  platform: &P,
  entry: ProcessEntry,
  window: WindowHandle,
) -> TopmostResult<Option<ProcessWindow>> {
  if window.is_null() || !platform.is_window_visible(window) {
    return Ok(None);
  }

  let title = platform
    .window_title(window)
    .map_err(|e| TopmostError::EnumerationItem {
      process: entry.name.clone(),
      reason: e.to_string(),
    })?;
  if title.is_empty() {
    return Ok(None);
  }

  Ok(Some(ProcessWindow {
    process_id: entry.id,
    process_name: entry.name,
    window_title: title,
    window_handle: window,
  }))
}

/// Sort case-insensitively, ordinal as tiebreak. Stable for identical names.
fn sort_by_name(records: &mut [ProcessWindow]) {
  records.sort_by_cached_key(|r| (r.process_name.to_lowercase(), r.process_name.clone()));
}
