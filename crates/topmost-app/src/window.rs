/*!
Native Win32 host for the shell.

Owns the main window, its child controls, the message loop and the refresh
timer. Window messages become shell [`Event`]s; after each event the
shell's [`ShellView`] is pushed back into the controls.

The [`Host`] lives in the window's `GWLP_USERDATA` slot from just after the
controls are created until `WM_NCDESTROY`.
*/

#![allow(unsafe_code)]
#![allow(
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use crate::layout::{self, Rect, MIN_HEIGHT, MIN_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
use parking_lot::Mutex;
use std::cell::Cell;
use std::ffi::c_void;
use topmost::shell::SET_LABEL;
use topmost::{CurrentPlatform, Event, Severity, Shell, ShellView};
use windows::core::{w, Error, Result, HSTRING, PCWSTR};
use windows::Win32::Foundation::{
  GetLastError, COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM,
};
use windows::Win32::Graphics::Gdi::{
  GetStockObject, GetSysColorBrush, InvalidateRect, SetBkMode, SetTextColor, UpdateWindow,
  COLOR_WINDOW, DEFAULT_GUI_FONT, HDC, TRANSPARENT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::EnableWindow;
use windows::Win32::UI::WindowsAndMessaging::{
  CreateWindowExW, DefWindowProcW, DispatchMessageW, GetClientRect, GetMessageW,
  GetSystemMetrics, GetWindowLongPtrW, KillTimer, LoadCursorW, MoveWindow, PostQuitMessage,
  RegisterClassW, SendMessageW, SetTimer, SetWindowLongPtrW, SetWindowTextW, ShowWindow,
  TranslateMessage, BN_CLICKED, CBN_SELCHANGE, CB_ADDSTRING, CB_GETCURSEL, CB_RESETCONTENT,
  CB_SETCURSEL, CS_HREDRAW, CS_VREDRAW, GWLP_USERDATA, HMENU, IDC_ARROW, MINMAXINFO, MSG,
  SM_CXSCREEN, SM_CYSCREEN, SW_SHOW, WINDOW_EX_STYLE, WINDOW_STYLE, WM_COMMAND,
  WM_CTLCOLORSTATIC, WM_DESTROY, WM_GETMINMAXINFO, WM_NCDESTROY, WM_SETFONT, WM_SIZE, WM_TIMER,
  WNDCLASSW, WS_CHILD, WS_CLIPCHILDREN, WS_DISABLED, WS_OVERLAPPEDWINDOW, WS_TABSTOP,
  WS_VISIBLE, WS_VSCROLL,
};

const CLASS_NAME: PCWSTR = w!("TopmostManagerWindow");
const WINDOW_TITLE: PCWSTR = w!("Always on Top Manager");

// Control IDs
const ID_SELECTOR: usize = 101;
const ID_REFRESH: usize = 102;
const ID_TOGGLE: usize = 103;

const REFRESH_TIMER_ID: usize = 1;

// Control styles
const SS_LEFT: u32 = 0x0000;
const BS_PUSHBUTTON: u32 = 0x0000;
const CBS_DROPDOWNLIST: u32 = 0x0003;

/// Status text colours (0x00BBGGRR).
const DARK_GREEN: COLORREF = COLORREF(0x0000_6400);
const RED: COLORREF = COLORREF(0x0000_00FF);

#[inline]
const fn loword(value: usize) -> u32 {
  (value & 0xFFFF) as u32
}

#[inline]
const fn hiword(value: usize) -> u32 {
  ((value >> 16) & 0xFFFF) as u32
}

fn last_error() -> Error {
  // SAFETY: reads thread-local error state only.
  Error::from(unsafe { GetLastError() }.to_hresult())
}

struct Controls {
  caption: HWND,
  selector: HWND,
  refresh: HWND,
  toggle: HWND,
  status: HWND,
}

/// Per-window state reachable from the window procedure.
struct Host {
  shell: Mutex<Shell<CurrentPlatform>>,
  controls: Controls,
  /// List revision currently shown in the selector.
  rendered_revision: Cell<u64>,
  status_severity: Cell<Severity>,
}

impl Host {
  fn new(shell: Shell<CurrentPlatform>, controls: Controls) -> Self {
    Self {
      shell: Mutex::new(shell),
      controls,
      rendered_revision: Cell::new(0),
      status_severity: Cell::new(Severity::Info),
    }
  }

  /// Feed one event to the shell and redraw.
  fn dispatch(&self, event: Event) {
    // Lock released before rendering; control updates can send messages back to us
    let view = {
      let mut shell = self.shell.lock();
      shell.handle(event);
      shell.view()
    };
    self.render(&view);
  }

  fn render(&self, view: &ShellView) {
    let c = &self.controls;
    // SAFETY: all handles are child controls of the live main window.
    unsafe {
      if view.revision != self.rendered_revision.get() {
        SendMessageW(c.selector, CB_RESETCONTENT, None, None);
        for item in &view.items {
          let text = HSTRING::from(item.as_str());
          SendMessageW(
            c.selector,
            CB_ADDSTRING,
            None,
            Some(LPARAM(text.as_ptr() as isize)),
          );
        }
        self.rendered_revision.set(view.revision);
      }

      // usize::MAX is -1: clear the selection
      let index = view.selected.unwrap_or(usize::MAX);
      SendMessageW(c.selector, CB_SETCURSEL, Some(WPARAM(index)), None);

      drop(SetWindowTextW(c.toggle, &HSTRING::from(view.button_label)));
      drop(EnableWindow(c.toggle, view.button_enabled));

      self.status_severity.set(view.status.severity);
      drop(SetWindowTextW(
        c.status,
        &HSTRING::from(view.status.message.as_str()),
      ));
      drop(InvalidateRect(Some(c.status), None, true));
    }
  }

  fn layout(&self, width: i32) {
    let l = layout::compute(width);
    let c = &self.controls;
    for (hwnd, rect) in [
      (c.caption, l.caption),
      (c.selector, l.selector),
      (c.refresh, l.refresh),
      (c.toggle, l.toggle),
      (c.status, l.status),
    ] {
      place(hwnd, rect);
    }
  }

  fn selected_index(&self) -> Option<usize> {
    // SAFETY: the selector is a live child control.
    let result = unsafe { SendMessageW(self.controls.selector, CB_GETCURSEL, None, None) };
    // CB_ERR (-1) means no selection
    usize::try_from(result.0).ok()
  }

  fn on_command(&self, wparam: WPARAM) -> bool {
    let id = loword(wparam.0) as usize;
    let code = hiword(wparam.0);

    let event = if id == ID_REFRESH && code == BN_CLICKED {
      Event::RefreshRequested
    } else if id == ID_TOGGLE && code == BN_CLICKED {
      Event::ToggleClicked
    } else if id == ID_SELECTOR && code == CBN_SELCHANGE {
      Event::SelectionChanged(self.selected_index())
    } else {
      return false;
    };

    self.dispatch(event);
    true
  }

  fn status_color(&self, hdc: HDC) -> LRESULT {
    let color = match self.status_severity.get() {
      Severity::Info => DARK_GREEN,
      Severity::Error => RED,
    };
    // SAFETY: hdc is the device context handed to us by WM_CTLCOLORSTATIC.
    unsafe {
      SetTextColor(hdc, color);
      SetBkMode(hdc, TRANSPARENT);
      LRESULT(GetSysColorBrush(COLOR_WINDOW).0 as isize)
    }
  }

  /// Handle a message. `None` falls through to `DefWindowProcW`.
  fn handle_message(&self, hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
    match msg {
      WM_COMMAND => self.on_command(wparam).then_some(LRESULT(0)),
      WM_TIMER if wparam.0 == REFRESH_TIMER_ID => {
        self.dispatch(Event::RefreshTimerFired);
        Some(LRESULT(0))
      }
      WM_SIZE => {
        self.layout(loword(lparam.0 as usize) as i32);
        Some(LRESULT(0))
      }
      WM_CTLCOLORSTATIC if lparam.0 == self.controls.status.0 as isize => {
        Some(self.status_color(HDC(wparam.0 as *mut c_void)))
      }
      WM_DESTROY => {
        // SAFETY: hwnd is the window being destroyed; the timer may not exist.
        unsafe {
          drop(KillTimer(Some(hwnd), REFRESH_TIMER_ID));
          PostQuitMessage(0);
        }
        Some(LRESULT(0))
      }
      _ => None,
    }
  }
}

fn place(hwnd: HWND, rect: Rect) {
  // SAFETY: hwnd is a live child control.
  drop(unsafe { MoveWindow(hwnd, rect.x, rect.y, rect.width, rect.height, true) });
}

unsafe extern "system" fn window_proc(
  hwnd: HWND,
  msg: u32,
  wparam: WPARAM,
  lparam: LPARAM,
) -> LRESULT {
  if msg == WM_GETMINMAXINFO {
    let info = lparam.0 as *mut MINMAXINFO;
    if !info.is_null() {
      // SAFETY: lparam points at the MINMAXINFO for this message.
      unsafe {
        (*info).ptMinTrackSize.x = MIN_WIDTH;
        (*info).ptMinTrackSize.y = MIN_HEIGHT;
      }
    }
    return LRESULT(0);
  }

  // SAFETY: the slot holds either null or a pointer from Box::into_raw in `run`.
  let host = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut Host;
  if host.is_null() {
    return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
  }

  if msg == WM_NCDESTROY {
    // SAFETY: last message this window receives; the slot is cleared before freeing.
    unsafe {
      SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
      drop(Box::from_raw(host));
      return DefWindowProcW(hwnd, msg, wparam, lparam);
    }
  }

  // SAFETY: host stays alive until WM_NCDESTROY, handled above.
  let host = unsafe { &*host };
  host
    .handle_message(hwnd, msg, wparam, lparam)
    .unwrap_or_else(|| unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) })
}

fn register_class(instance: HINSTANCE) -> Result<()> {
  // SAFETY: the class struct only references static data.
  unsafe {
    let class = WNDCLASSW {
      style: CS_HREDRAW | CS_VREDRAW,
      lpfnWndProc: Some(window_proc),
      hInstance: instance,
      hCursor: LoadCursorW(None, IDC_ARROW)?,
      hbrBackground: GetSysColorBrush(COLOR_WINDOW),
      lpszClassName: CLASS_NAME,
      ..Default::default()
    };
    if RegisterClassW(&class) == 0 {
      return Err(last_error());
    }
  }
  Ok(())
}

fn create_main_window(instance: HINSTANCE) -> Result<HWND> {
  // SAFETY: plain system metric queries and window creation.
  unsafe {
    let (x, y) = layout::centered(
      GetSystemMetrics(SM_CXSCREEN),
      GetSystemMetrics(SM_CYSCREEN),
      WINDOW_WIDTH,
      WINDOW_HEIGHT,
    );
    CreateWindowExW(
      WINDOW_EX_STYLE(0),
      CLASS_NAME,
      WINDOW_TITLE,
      WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
      x,
      y,
      WINDOW_WIDTH,
      WINDOW_HEIGHT,
      None,
      None,
      Some(instance),
      None,
    )
  }
}

fn create_control(
  parent: HWND,
  instance: HINSTANCE,
  class: PCWSTR,
  text: &str,
  style: u32,
  id: usize,
) -> Result<HWND> {
  // SAFETY: parent is a live top-level window; the control is placed later by `layout`.
  unsafe {
    let hwnd = CreateWindowExW(
      WINDOW_EX_STYLE(0),
      class,
      &HSTRING::from(text),
      WINDOW_STYLE(WS_CHILD.0 | WS_VISIBLE.0 | style),
      0,
      0,
      0,
      0,
      Some(parent),
      Some(HMENU(id as *mut c_void)),
      Some(instance),
      None,
    )?;
    let font = GetStockObject(DEFAULT_GUI_FONT);
    SendMessageW(hwnd, WM_SETFONT, Some(WPARAM(font.0 as usize)), Some(LPARAM(1)));
    Ok(hwnd)
  }
}

fn create_controls(parent: HWND, instance: HINSTANCE) -> Result<Controls> {
  Ok(Controls {
    caption: create_control(parent, instance, w!("STATIC"), "Select Process:", SS_LEFT, 0)?,
    selector: create_control(
      parent,
      instance,
      w!("COMBOBOX"),
      "",
      CBS_DROPDOWNLIST | WS_VSCROLL.0 | WS_TABSTOP.0,
      ID_SELECTOR,
    )?,
    refresh: create_control(
      parent,
      instance,
      w!("BUTTON"),
      "Refresh",
      BS_PUSHBUTTON | WS_TABSTOP.0,
      ID_REFRESH,
    )?,
    toggle: create_control(
      parent,
      instance,
      w!("BUTTON"),
      SET_LABEL,
      BS_PUSHBUTTON | WS_TABSTOP.0 | WS_DISABLED.0,
      ID_TOGGLE,
    )?,
    status: create_control(parent, instance, w!("STATIC"), "", SS_LEFT, 0)?,
  })
}

/// Create the main window and run the message loop until it closes.
pub(crate) fn run() -> Result<()> {
  // SAFETY: module handle of the running executable.
  let instance: HINSTANCE = unsafe { GetModuleHandleW(None) }?.into();
  register_class(instance)?;
  let hwnd = create_main_window(instance)?;
  let controls = create_controls(hwnd, instance)?;

  let shell = Shell::new(CurrentPlatform::new());
  let refresh_interval = shell.refresh_interval();
  let host = Box::into_raw(Box::new(Host::new(shell, controls)));

  // SAFETY: ownership of the Box moves to the window; freed on WM_NCDESTROY.
  unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, host as isize) };
  // SAFETY: the window, and with it the host, is alive until the message loop ends.
  let host = unsafe { &*host };

  let mut client = RECT::default();
  // SAFETY: client is a valid out pointer.
  unsafe { GetClientRect(hwnd, &raw mut client) }?;
  host.layout(client.right - client.left);

  let initial = host.shell.lock().view();
  host.render(&initial);
  host.dispatch(Event::Started);

  if let Some(interval) = refresh_interval {
    let ms = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
    // SAFETY: hwnd is live; the timer is killed on WM_DESTROY.
    if unsafe { SetTimer(Some(hwnd), REFRESH_TIMER_ID, ms, None) } == 0 {
      log::warn!("Could not start refresh timer: {}", last_error());
    } else {
      log::debug!("Refreshing every {ms}ms");
    }
  }

  // SAFETY: standard show and message pump on the thread that owns hwnd.
  unsafe {
    drop(ShowWindow(hwnd, SW_SHOW));
    drop(UpdateWindow(hwnd));

    let mut message = MSG::default();
    loop {
      match GetMessageW(&raw mut message, None, 0, 0).0 {
        -1 => return Err(last_error()),
        0 => break,
        _ => {
          drop(TranslateMessage(&raw const message));
          DispatchMessageW(&raw const message);
        }
      }
    }
  }

  log::info!("Main window closed");
  Ok(())
}
