/*! Shell configuration and builder. */

use super::Shell;
use crate::platform::Platform;
use std::time::Duration;

/// Default period between automatic re-enumerations.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ShellConfig {
  pub(crate) auto_refresh: bool,
  pub(crate) refresh_interval_ms: u64,
}

impl Default for ShellConfig {
  fn default() -> Self {
    Self {
      auto_refresh: true,
      refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
    }
  }
}

impl ShellConfig {
  /// Timer period for the host, `None` when refreshing only on demand.
  pub(crate) const fn refresh_interval(&self) -> Option<Duration> {
    if self.auto_refresh {
      Some(Duration::from_millis(self.refresh_interval_ms))
    } else {
      None
    }
  }
}

/// Builder for configuring a [`Shell`].
///
/// # Example
///
/// ```ignore
/// let shell = Shell::<CurrentPlatform>::builder()
///     .auto_refresh(true)
///     .refresh_interval_ms(10_000)
///     .build(CurrentPlatform::new());
/// ```
#[derive(Debug, Default, Clone, Copy)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct ShellBuilder {
  config: ShellConfig,
}

impl ShellBuilder {
  /// Re-enumerate periodically in addition to on demand. Default: true.
  pub const fn auto_refresh(mut self, enabled: bool) -> Self {
    self.config.auto_refresh = enabled;
    self
  }

  /// Set the automatic refresh period in milliseconds. Default: 5000ms.
  ///
  /// Ignored when `auto_refresh` is false.
  pub const fn refresh_interval_ms(mut self, ms: u64) -> Self {
    self.config.refresh_interval_ms = ms;
    self
  }

  /// Build the shell over `platform`.
  ///
  /// The shell starts with no records; the host dispatches
  /// [`Event::Started`](super::Event::Started) once its window exists.
  pub fn build<P: Platform>(self, platform: P) -> Shell<P> {
    Shell::create_with_config(platform, self.config)
  }
}
