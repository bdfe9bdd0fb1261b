/*!
UI shell state machine.

Toolkit-independent: a host window translates its messages into [`Event`]s,
calls [`Shell::handle`], then draws [`Shell::view`].

# Module Structure

- `mod.rs` - Shell struct, events, transitions
- `config.rs` - `ShellBuilder` and refresh settings
- `view.rs` - `ShellView` and status types handed to the host

# Example

```ignore
let mut shell = Shell::new(CurrentPlatform::new());
shell.handle(Event::Started);
shell.handle(Event::SelectionChanged(Some(0)));
shell.handle(Event::ToggleClicked);
render(&shell.view());
```
*/

mod config;
mod view;

pub use config::{ShellBuilder, DEFAULT_REFRESH_INTERVAL_MS};
pub use view::{Severity, ShellView, Status, REMOVE_LABEL, SET_LABEL};

use crate::enumerate::try_enumerate;
use crate::platform::Platform;
use crate::table::TopmostTable;
use crate::toggle::toggle;
use crate::types::{ProcessId, ProcessWindow, TopmostError};
use config::ShellConfig;
use std::collections::HashSet;
use std::time::Duration;

/// Input to the shell, produced by the host from user actions and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  /// The window is up; do the first enumeration.
  Started,
  /// The user pressed Refresh.
  RefreshRequested,
  /// The periodic refresh timer fired.
  RefreshTimerFired,
  /// The selector changed. `None` when nothing is selected.
  SelectionChanged(Option<usize>),
  /// The user pressed the toggle button.
  ToggleClicked,
}

/// What the user has selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  /// Nothing selected; the toggle button is disabled.
  NoSelection,
  /// A live process, with its window's flag as last read from the table.
  Selected {
    /// The selected record from the current list.
    record: ProcessWindow,
    /// Table flag for `record.window_handle`.
    topmost: bool,
  },
}

/// Shell state: current records, selection, topmost table and status line.
#[derive(Debug)]
pub struct Shell<P> {
  platform: P,
  config: ShellConfig,
  records: Vec<ProcessWindow>,
  /// Listed processes seen to exit since the last enumeration.
  exited: HashSet<ProcessId>,
  selection: Selection,
  table: TopmostTable,
  status: Status,
  revision: u64,
}

impl<P: Platform> Shell<P> {
  /// Create a shell with default options.
  ///
  /// For custom configuration, use [`Shell::builder()`].
  pub fn new(platform: P) -> Self {
    Self::builder().build(platform)
  }

  /// Create a builder for configuring a new shell.
  pub fn builder() -> ShellBuilder {
    ShellBuilder::default()
  }

  fn create_with_config(platform: P, config: ShellConfig) -> Self {
    Self {
      platform,
      config,
      records: Vec::new(),
      exited: HashSet::new(),
      selection: Selection::NoSelection,
      table: TopmostTable::new(),
      status: Status::info("Ready"),
      revision: 0,
    }
  }

  /// Apply one event.
  pub fn handle(&mut self, event: Event) {
    log::debug!("Shell event: {event:?}");
    match event {
      Event::Started | Event::RefreshRequested | Event::RefreshTimerFired => self.refresh(),
      Event::SelectionChanged(index) => self.select(index),
      Event::ToggleClicked => self.toggle_selected(),
    }
  }

  /// Snapshot of what the host should display.
  pub fn view(&self) -> ShellView {
    let (selected, button_label, button_enabled) = match &self.selection {
      Selection::NoSelection => (None, SET_LABEL, false),
      Selection::Selected { record, topmost } => (
        self.position_of(record),
        ShellView::label_for(*topmost),
        true,
      ),
    };

    ShellView {
      items: self
        .records
        .iter()
        .map(|r| {
          if self.exited.contains(&r.process_id) {
            r.exited_label()
          } else {
            r.label()
          }
        })
        .collect(),
      selected,
      button_label,
      button_enabled,
      status: self.status.clone(),
      revision: self.revision,
    }
  }

  /// Records from the last enumeration, in display order.
  pub fn records(&self) -> &[ProcessWindow] {
    &self.records
  }

  /// Current selection.
  pub const fn selection(&self) -> &Selection {
    &self.selection
  }

  /// Flags set by this shell's toggles.
  pub const fn table(&self) -> &TopmostTable {
    &self.table
  }

  /// Current status line.
  pub const fn status(&self) -> &Status {
    &self.status
  }

  #[cfg(test)]
  pub(crate) const fn platform(&self) -> &P {
    &self.platform
  }

  /// Period for the host's refresh timer, `None` when auto refresh is off.
  pub const fn refresh_interval(&self) -> Option<Duration> {
    self.config.refresh_interval()
  }

  fn position_of(&self, record: &ProcessWindow) -> Option<usize> {
    self
      .records
      .iter()
      .position(|r| r.process_id == record.process_id)
  }

  /// Re-enumerate, keeping the selection if its process is still listed.
  fn refresh(&mut self) {
    self.revision += 1;
    self.exited.clear();
    match try_enumerate(&self.platform) {
      Ok(records) => self.records = records,
      Err(e) => {
        log::warn!("Error loading processes: {e}");
        self.records.clear();
        self.selection = Selection::NoSelection;
        self.status = Status::error(format!("Error loading processes: {e}"));
        return;
      }
    }

    let previous = std::mem::replace(&mut self.selection, Selection::NoSelection);
    if let Selection::Selected { record, .. } = previous {
      if let Some(current) = self
        .records
        .iter()
        .find(|r| r.process_id == record.process_id)
      {
        self.selection = Selection::Selected {
          record: current.clone(),
          topmost: self.table.is_topmost(current.window_handle),
        };
      }
    }

    self.status = Status::info(format!("Found {} visible windows", self.records.len()));
  }

  fn select(&mut self, index: Option<usize>) {
    let Some(record) = index.and_then(|i| self.records.get(i)).cloned() else {
      self.selection = Selection::NoSelection;
      self.status = Status::info("No process selected");
      return;
    };

    match self.platform.has_exited(record.process_id) {
      Ok(false) => {
        self.status = Status::info(format!("Selected: {}", record.process_name));
        self.selection = Selection::Selected {
          topmost: self.table.is_topmost(record.window_handle),
          record,
        };
      }
      Ok(true) => {
        log::debug!("Selected process {} has exited", record.process_id);
        self.exited.insert(record.process_id);
        self.selection = Selection::NoSelection;
        self.status = Status::error("Selected process has exited");
      }
      Err(e) => {
        log::warn!("Error accessing process {}: {e}", record.process_id);
        self.selection = Selection::NoSelection;
        self.status = Status::error(format!("Error accessing process: {e}"));
      }
    }
  }

  fn toggle_selected(&mut self) {
    let Selection::Selected { record, .. } = &self.selection else {
      self.status = Status::error(TopmostError::NoSelection.to_string());
      return;
    };
    let record = record.clone();

    match toggle(&self.platform, &mut self.table, &record) {
      Ok(topmost) => {
        let verb = if topmost { "Set" } else { "Removed" };
        self.status = Status::info(format!("{verb} always on top for {}", record.process_name));
        self.selection = Selection::Selected { record, topmost };
      }
      Err(TopmostError::ProcessExited(_)) => {
        self.selection = Selection::NoSelection;
        self.refresh();
        self.status = Status::error("Selected process has exited");
      }
      Err(e @ (TopmostError::NoWindowHandle | TopmostError::OsCallFailed(_))) => {
        log::warn!("Toggle failed for {}: {e}", record.process_name);
        self.status = Status::error(e.to_string());
      }
      Err(e) => {
        log::warn!("Toggle failed for {}: {e}", record.process_name);
        self.status = Status::error(format!("Error: {e}"));
      }
    }
  }
}
