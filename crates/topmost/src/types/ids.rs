/*! Branded ID types for type-safe OS references. */

use derive_more::{Display, From, Into};

/// Process ID - branded type to distinguish from other u32 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct ProcessId(pub u32);

/// Opaque OS window handle. On Windows this is the raw `HWND` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
  /// The null handle; no window.
  pub const NULL: Self = Self(0);

  /// True when this handle refers to no window.
  #[inline]
  pub const fn is_null(self) -> bool {
    self.0 == 0
  }
}
