/*! Core types for process and window tracking. */

#![allow(missing_docs)]

mod error;
mod ids;
mod record;

pub use error::{TopmostError, TopmostResult};
pub use ids::{ProcessId, WindowHandle};
pub use record::ProcessWindow;
