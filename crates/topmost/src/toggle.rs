/*!
Window toggle operator.

Flips a window between topmost and normal z-order, keeping the
[`TopmostTable`] in step with what was asked of the OS.
*/

use crate::platform::{Platform, ZOrder};
use crate::table::TopmostTable;
use crate::types::{ProcessWindow, TopmostError, TopmostResult};

/// Toggle "always on top" for the record's main window. Returns the new state.
///
/// The process is re-checked right before acting since the record may be stale.
/// On any error the table is left as it was.
pub fn toggle<P: Platform>(
  platform: &P,
  table: &mut TopmostTable,
  record: &ProcessWindow,
) -> TopmostResult<bool> {
  if platform.has_exited(record.process_id)? {
    return Err(TopmostError::ProcessExited(record.process_id));
  }

  let window = record.window_handle;
  if window.is_null() {
    return Err(TopmostError::NoWindowHandle);
  }

  let topmost = !table.is_topmost(window);
  let order = if topmost {
    ZOrder::Topmost
  } else {
    ZOrder::NoTopmost
  };
  platform.set_z_order(window, order)?;
  table.set_topmost(window, topmost);

  log::info!(
    "{} always on top for {} ({window})",
    if topmost { "Set" } else { "Removed" },
    record.process_name
  );
  Ok(topmost)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::fake::{Call, FakePlatform, FakeProcess};
  use crate::types::{ProcessId, WindowHandle};

  fn make_record(pid: u32, name: &str, window: isize) -> ProcessWindow {
    ProcessWindow {
      process_id: ProcessId(pid),
      process_name: name.into(),
      window_title: format!("{name} window"),
      window_handle: WindowHandle(window),
    }
  }

  fn make_platform() -> FakePlatform {
    FakePlatform::with_processes(vec![FakeProcess::new(20, "Calc", "Calculator", 0x200)])
  }

  mod success_tests {
    use super::*;

    #[test]
    fn first_toggle_sets_topmost() {
      let platform = make_platform();
      let mut table = TopmostTable::new();
      let record = make_record(20, "Calc", 0x200);

      assert_eq!(toggle(&platform, &mut table, &record), Ok(true));
      assert!(table.is_topmost(WindowHandle(0x200)));
    }

    #[test]
    fn double_toggle_restores_flag() {
      let platform = make_platform();
      let mut table = TopmostTable::new();
      let record = make_record(20, "Calc", 0x200);

      assert_eq!(toggle(&platform, &mut table, &record), Ok(true));
      assert_eq!(toggle(&platform, &mut table, &record), Ok(false));
      assert!(!table.is_topmost(WindowHandle(0x200)));
    }

    #[test]
    fn z_order_alternates() {
      let platform = make_platform();
      let mut table = TopmostTable::new();
      let record = make_record(20, "Calc", 0x200);

      assert!(toggle(&platform, &mut table, &record).is_ok());
      assert!(toggle(&platform, &mut table, &record).is_ok());

      assert_eq!(
        platform.z_order_calls(),
        vec![
          (WindowHandle(0x200), ZOrder::Topmost),
          (WindowHandle(0x200), ZOrder::NoTopmost),
        ]
      );
    }

    #[test]
    fn checks_process_before_z_order() {
      let platform = make_platform();
      let mut table = TopmostTable::new();
      assert!(toggle(&platform, &mut table, &make_record(20, "Calc", 0x200)).is_ok());

      assert_eq!(
        platform.calls(),
        vec![
          Call::HasExited(ProcessId(20)),
          Call::SetZOrder(WindowHandle(0x200), ZOrder::Topmost),
        ]
      );
    }
  }

  mod failure_tests {
    use super::*;

    #[test]
    fn exited_process_is_rejected() {
      let platform = make_platform();
      platform.exit(20);
      let mut table = TopmostTable::new();

      let result = toggle(&platform, &mut table, &make_record(20, "Calc", 0x200));

      assert_eq!(result, Err(TopmostError::ProcessExited(ProcessId(20))));
      assert!(platform.z_order_calls().is_empty());
      assert!(table.is_empty());
    }

    #[test]
    fn null_handle_is_rejected() {
      let platform = FakePlatform::with_processes(vec![FakeProcess::new(30, "svc", "", 0)]);
      let mut table = TopmostTable::new();

      let result = toggle(&platform, &mut table, &make_record(30, "svc", 0));

      assert_eq!(result, Err(TopmostError::NoWindowHandle));
      assert!(platform.z_order_calls().is_empty());
    }

    #[test]
    fn os_failure_leaves_table_unchanged() {
      let platform = make_platform();
      platform.fail_next_z_order(5);
      let mut table = TopmostTable::new();

      let result = toggle(&platform, &mut table, &make_record(20, "Calc", 0x200));

      assert_eq!(result, Err(TopmostError::OsCallFailed(5)));
      assert!(table.is_empty());
      assert_eq!(
        result.map_err(|e| e.to_string()),
        Err("Failed to modify window: Error 5".to_owned())
      );
    }

    #[test]
    fn os_failure_after_set_keeps_topmost() {
      let platform = make_platform();
      let mut table = TopmostTable::new();
      let record = make_record(20, "Calc", 0x200);

      assert_eq!(toggle(&platform, &mut table, &record), Ok(true));
      platform.fail_next_z_order(1400);
      assert_eq!(
        toggle(&platform, &mut table, &record),
        Err(TopmostError::OsCallFailed(1400))
      );
      assert!(table.is_topmost(WindowHandle(0x200)));
    }

    #[test]
    fn exit_query_failure_is_surfaced() {
      let platform = make_platform();
      let denied = TopmostError::ProcessQuery {
        process: ProcessId(20),
        code: 5,
      };
      platform.fail_exit_query(20, denied.clone());
      let mut table = TopmostTable::new();

      let result = toggle(&platform, &mut table, &make_record(20, "Calc", 0x200));

      assert_eq!(result, Err(denied));
      assert!(platform.z_order_calls().is_empty());
    }
  }
}
