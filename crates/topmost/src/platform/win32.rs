/*!
Win32 implementation of [`Platform`].

All unsafe Win32 calls for process and window queries are encapsulated here.
OS handles opened along the way are owned by [`OwnedHandle`] and closed on drop.
*/

#![allow(unsafe_code)]
#![allow(
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use super::{Platform, ProcessEntry, ZOrder};
use crate::types::{ProcessId, TopmostError, TopmostResult, WindowHandle};
use std::collections::HashMap;
use std::ffi::c_void;
use windows::core::BOOL;
use windows::Win32::Foundation::{CloseHandle, HANDLE, HWND, LPARAM, WAIT_OBJECT_0};
use windows::Win32::System::Diagnostics::ToolHelp::{
  CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
  GetExitCodeProcess, OpenProcess, WaitForSingleObject, PROCESS_QUERY_LIMITED_INFORMATION,
  PROCESS_SYNCHRONIZE,
};
use windows::Win32::UI::WindowsAndMessaging::{
  EnumWindows, GetWindow, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
  IsWindowVisible, SetWindowPos, GW_OWNER, HWND_NOTOPMOST, HWND_TOPMOST, SWP_NOMOVE, SWP_NOSIZE,
};

/// Exit code reported by `GetExitCodeProcess` while a process is running.
const STILL_ACTIVE: u32 = 259;
/// `OpenProcess` fails with this code when no process has the given id.
const ERROR_INVALID_PARAMETER: u32 = 87;

/// Win32 platform. Stateless: every call goes straight to the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsPlatform;

impl WindowsPlatform {
  /// Create the Win32 platform.
  pub const fn new() -> Self {
    Self
  }
}

/// Extract the Win32 error code from an `HRESULT_FROM_WIN32` error.
fn win32_code(error: &windows::core::Error) -> u32 {
  (error.code().0 as u32) & 0xFFFF
}

fn to_hwnd(window: WindowHandle) -> HWND {
  HWND(window.0 as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowHandle {
  WindowHandle(hwnd.0 as isize)
}

/// Kernel handle closed on drop.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
  fn drop(&mut self) {
    // SAFETY: the handle came from a successful Open*/Create* call and is closed exactly once.
    drop(unsafe { CloseHandle(self.0) });
  }
}

/// Decode a NUL-terminated UTF-16 buffer.
fn wide_to_string(buffer: &[u16]) -> String {
  let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
  String::from_utf16_lossy(buffer.get(..len).unwrap_or_default())
}

/// A top-level window with no owner that is visible counts as a process's main window.
fn is_main_window(hwnd: HWND) -> bool {
  // SAFETY: both calls only read window state; a stale HWND yields an error / FALSE.
  unsafe {
    let unowned = GetWindow(hwnd, GW_OWNER).map_or(true, |owner| owner.is_invalid());
    unowned && IsWindowVisible(hwnd).as_bool()
  }
}

/// `EnumWindows` callback. Keeps the first main window seen for each process.
unsafe extern "system" fn collect_main_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
  // SAFETY: lparam points at the map owned by `main_windows`, which outlives
  // the synchronous EnumWindows call.
  let found = unsafe { &mut *(lparam.0 as *mut HashMap<u32, HWND>) };

  if is_main_window(hwnd) {
    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&raw mut pid)) };
    if pid != 0 {
      found.entry(pid).or_insert(hwnd);
    }
  }
  BOOL(1)
}

impl Platform for WindowsPlatform {
  fn processes(&self) -> TopmostResult<Vec<ProcessEntry>> {
    // SAFETY: snapshot handle is owned and closed by OwnedHandle.
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
      .map(OwnedHandle)
      .map_err(|e| TopmostError::ProcessListing(win32_code(&e)))?;

    let mut entry = PROCESSENTRY32W {
      dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
      ..Default::default()
    };
    let mut processes = Vec::new();

    // SAFETY: entry.dwSize is initialized as the API requires.
    let mut next = unsafe { Process32FirstW(snapshot.0, &raw mut entry) };
    while next.is_ok() {
      processes.push(ProcessEntry::from_executable(
        ProcessId(entry.th32ProcessID),
        &wide_to_string(&entry.szExeFile),
      ));
      next = unsafe { Process32NextW(snapshot.0, &raw mut entry) };
    }

    log::debug!("Process snapshot returned {} processes", processes.len());
    Ok(processes)
  }

  fn main_windows(&self) -> TopmostResult<HashMap<ProcessId, WindowHandle>> {
    let mut found: HashMap<u32, HWND> = HashMap::new();
    // SAFETY: the callback only dereferences lparam as &mut HashMap<u32, HWND>.
    unsafe {
      EnumWindows(
        Some(collect_main_window),
        LPARAM(&raw mut found as isize),
      )
    }
    .map_err(|e| TopmostError::ProcessListing(win32_code(&e)))?;

    log::debug!("EnumWindows found {} main windows", found.len());
    Ok(
      found
        .into_iter()
        .map(|(pid, hwnd)| (ProcessId(pid), from_hwnd(hwnd)))
        .collect(),
    )
  }

  fn window_title(&self, window: WindowHandle) -> TopmostResult<String> {
    let hwnd = to_hwnd(window);
    // SAFETY: read-only queries; the buffer is sized from GetWindowTextLengthW.
    unsafe {
      let len = GetWindowTextLengthW(hwnd);
      if len <= 0 {
        return Ok(String::new());
      }
      let mut buffer = vec![0u16; len as usize + 1];
      let copied = GetWindowTextW(hwnd, &mut buffer);
      buffer.truncate(copied.max(0) as usize);
      Ok(String::from_utf16_lossy(&buffer))
    }
  }

  fn is_window_visible(&self, window: WindowHandle) -> bool {
    // SAFETY: read-only query.
    unsafe { IsWindowVisible(to_hwnd(window)) }.as_bool()
  }

  fn has_exited(&self, pid: ProcessId) -> TopmostResult<bool> {
    let access = PROCESS_QUERY_LIMITED_INFORMATION | PROCESS_SYNCHRONIZE;
    // SAFETY: process handle is owned and closed by OwnedHandle.
    let process = match unsafe { OpenProcess(access, false, pid.0) } {
      Ok(handle) => OwnedHandle(handle),
      Err(e) if win32_code(&e) == ERROR_INVALID_PARAMETER => return Ok(true),
      Err(e) => {
        return Err(TopmostError::ProcessQuery {
          process: pid,
          code: win32_code(&e),
        })
      }
    };

    let mut exit_code = 0u32;
    // SAFETY: exit_code is a valid out pointer for the duration of the call.
    unsafe { GetExitCodeProcess(process.0, &raw mut exit_code) }.map_err(|e| {
      TopmostError::ProcessQuery {
        process: pid,
        code: win32_code(&e),
      }
    })?;

    if exit_code != STILL_ACTIVE {
      return Ok(true);
    }
    // A process may exit with code 259 itself; only a signalled handle is final.
    // SAFETY: the handle was opened with SYNCHRONIZE; a zero timeout never blocks.
    Ok(unsafe { WaitForSingleObject(process.0, 0) } == WAIT_OBJECT_0)
  }

  fn set_z_order(&self, window: WindowHandle, order: ZOrder) -> TopmostResult<()> {
    let insert_after = match order {
      ZOrder::Topmost => HWND_TOPMOST,
      ZOrder::NoTopmost => HWND_NOTOPMOST,
    };
    log::debug!("SetWindowPos({window}, {order:?})");

    // SAFETY: position and size arguments are ignored because of SWP_NOMOVE | SWP_NOSIZE.
    unsafe {
      SetWindowPos(
        to_hwnd(window),
        Some(insert_after),
        0,
        0,
        0,
        0,
        SWP_NOMOVE | SWP_NOSIZE,
      )
    }
    .map_err(|e| TopmostError::OsCallFailed(win32_code(&e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wide_to_string_stops_at_nul() {
    let mut buffer = [0u16; 16];
    for (slot, c) in buffer.iter_mut().zip("calc.exe".encode_utf16()) {
      *slot = c;
    }
    assert_eq!(wide_to_string(&buffer), "calc.exe");
  }

  #[test]
  fn hwnd_round_trips_through_window_handle() {
    let handle = WindowHandle(0x0002_04C8);
    assert_eq!(from_hwnd(to_hwnd(handle)), handle);
  }

  #[test]
  fn current_process_has_not_exited() {
    let platform = WindowsPlatform::new();
    let pid = ProcessId(std::process::id());
    assert_eq!(platform.has_exited(pid), Ok(false));
  }

  #[test]
  fn exit_code_259_counts_as_exited() -> std::io::Result<()> {
    let mut child = std::process::Command::new("cmd")
      .args(["/C", "exit 259"])
      .spawn()?;
    let status = child.wait()?;
    assert_eq!(status.code(), Some(259));

    // `child` still holds its handle, so the pid cannot be reused yet
    let platform = WindowsPlatform::new();
    assert_eq!(platform.has_exited(ProcessId(child.id())), Ok(true));
    Ok(())
  }

  #[test]
  fn current_process_is_listed() {
    let platform = WindowsPlatform::new();
    let pid = ProcessId(std::process::id());
    let processes = platform.processes().unwrap_or_default();
    assert!(processes.iter().any(|p| p.id == pid));
  }
}
