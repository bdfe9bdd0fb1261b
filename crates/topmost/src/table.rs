/*!
Topmost state table.

Remembers which windows this program has made topmost. The OS is never asked:
a window toggled by some other tool still reads as not topmost here.
Entries are created on first toggle and live for the rest of the session.
*/

use crate::types::WindowHandle;
use std::collections::HashMap;

/// Per-window "always on top" flags set by this program.
#[derive(Debug, Clone, Default)]
pub struct TopmostTable {
  flags: HashMap<WindowHandle, bool>,
}

impl TopmostTable {
  /// Create an empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether `window` was last set topmost. False for windows never toggled.
  pub fn is_topmost(&self, window: WindowHandle) -> bool {
    self.flags.get(&window).copied().unwrap_or(false)
  }

  /// Record the flag for `window`, inserting or overwriting.
  pub fn set_topmost(&mut self, window: WindowHandle, topmost: bool) {
    log::trace!("topmost[{window}] = {topmost}");
    self.flags.insert(window, topmost);
  }

  /// Number of windows ever toggled.
  pub fn len(&self) -> usize {
    self.flags.len()
  }

  /// True when no window has been toggled yet.
  pub fn is_empty(&self) -> bool {
    self.flags.is_empty()
  }
}
