/*! View model rendered by the host window. */

/// Button label while the selected window is not topmost.
pub const SET_LABEL: &str = "Set Always On Top";
/// Button label while the selected window is topmost.
pub const REMOVE_LABEL: &str = "Remove Always On Top";

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
  /// Normal progress, shown in dark green.
  #[default]
  Info,
  /// Something failed, shown in red.
  Error,
}

/// The status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
  /// Text shown in the status line.
  pub message: String,
  /// Picks the status text colour.
  pub severity: Severity,
}

impl Status {
  /// Informational status.
  pub fn info(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      severity: Severity::Info,
    }
  }

  /// Error status.
  pub fn error(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      severity: Severity::Error,
    }
  }
}

/// Everything the host needs to draw the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
  /// Selector entries, one per record, in list order. A process found to have
  /// exited since the last enumeration reads `"{name} (Exited)"`.
  pub items: Vec<String>,
  /// Index into `items`, if anything is selected.
  pub selected: Option<usize>,
  /// Toggle button text, [`SET_LABEL`] or [`REMOVE_LABEL`].
  pub button_label: &'static str,
  /// False while nothing is selected.
  pub button_enabled: bool,
  /// Last status message.
  pub status: Status,
  /// Bumped on every enumeration. Hosts rebuild the selector only when it changes.
  pub revision: u64,
}

impl ShellView {
  /// Label for the toggle button given the selected window's flag.
  pub const fn label_for(topmost: bool) -> &'static str {
    if topmost {
      REMOVE_LABEL
    } else {
      SET_LABEL
    }
  }
}
