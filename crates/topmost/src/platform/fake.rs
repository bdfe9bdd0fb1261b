/*! Scripted in-memory platform for tests. Records every call it receives. */

use super::{Platform, ProcessEntry, ZOrder};
use crate::types::{ProcessId, TopmostError, TopmostResult, WindowHandle};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// A platform call, in the order received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
  Processes,
  MainWindows,
  WindowTitle(WindowHandle),
  IsWindowVisible(WindowHandle),
  HasExited(ProcessId),
  SetZOrder(WindowHandle, ZOrder),
}

#[derive(Debug, Clone)]
pub(crate) struct FakeProcess {
  pub id: ProcessId,
  pub name: String,
  pub window: WindowHandle,
  pub title: String,
  pub visible: bool,
  pub exited: bool,
  /// Returned from `window_title` instead of the title.
  pub inspect_error: Option<TopmostError>,
  /// Returned from `has_exited` instead of the exit state.
  pub query_error: Option<TopmostError>,
}

impl FakeProcess {
  /// A running process with a visible, titled main window.
  pub(crate) fn new(pid: u32, name: &str, title: &str, window: isize) -> Self {
    Self {
      id: ProcessId(pid),
      name: name.to_owned(),
      window: WindowHandle(window),
      title: title.to_owned(),
      visible: true,
      exited: false,
      inspect_error: None,
      query_error: None,
    }
  }

  pub(crate) fn hidden(mut self) -> Self {
    self.visible = false;
    self
  }

  pub(crate) fn failing_inspection(mut self, error: TopmostError) -> Self {
    self.inspect_error = Some(error);
    self
  }
}

#[derive(Debug, Default)]
pub(crate) struct FakePlatform {
  processes: RefCell<Vec<FakeProcess>>,
  listing_error: RefCell<Option<TopmostError>>,
  window_listing_error: RefCell<Option<TopmostError>>,
  z_order_failures: RefCell<VecDeque<u32>>,
  calls: RefCell<Vec<Call>>,
}

impl FakePlatform {
  pub(crate) fn with_processes(processes: Vec<FakeProcess>) -> Self {
    Self {
      processes: RefCell::new(processes),
      ..Self::default()
    }
  }

  pub(crate) fn add(&self, process: FakeProcess) {
    self.processes.borrow_mut().push(process);
  }

  /// Mark a process as exited. It disappears from later listings.
  pub(crate) fn exit(&self, pid: u32) {
    for process in self.processes.borrow_mut().iter_mut() {
      if process.id == ProcessId(pid) {
        process.exited = true;
      }
    }
  }

  /// Give a running process a new main window, as when it reopens its window.
  pub(crate) fn set_window(&self, pid: u32, window: isize) {
    for process in self.processes.borrow_mut().iter_mut() {
      if process.id == ProcessId(pid) {
        process.window = WindowHandle(window);
      }
    }
  }

  pub(crate) fn fail_exit_query(&self, pid: u32, error: TopmostError) {
    for process in self.processes.borrow_mut().iter_mut() {
      if process.id == ProcessId(pid) {
        process.query_error = Some(error.clone());
      }
    }
  }

  pub(crate) fn fail_listing(&self, error: TopmostError) {
    *self.listing_error.borrow_mut() = Some(error);
  }

  pub(crate) fn fail_window_listing(&self, error: TopmostError) {
    *self.window_listing_error.borrow_mut() = Some(error);
  }

  /// The next `set_z_order` call fails with this Win32 error code.
  pub(crate) fn fail_next_z_order(&self, code: u32) {
    self.z_order_failures.borrow_mut().push_back(code);
  }

  pub(crate) fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  pub(crate) fn z_order_calls(&self) -> Vec<(WindowHandle, ZOrder)> {
    self
      .calls
      .borrow()
      .iter()
      .filter_map(|call| match call {
        Call::SetZOrder(window, order) => Some((*window, *order)),
        _ => None,
      })
      .collect()
  }

  fn record(&self, call: Call) {
    self.calls.borrow_mut().push(call);
  }

  fn find<R>(&self, pid: ProcessId, f: impl FnOnce(&FakeProcess) -> R) -> Option<R> {
    self.processes.borrow().iter().find(|p| p.id == pid).map(f)
  }
}

impl Platform for FakePlatform {
  fn processes(&self) -> TopmostResult<Vec<ProcessEntry>> {
    self.record(Call::Processes);
    if let Some(error) = self.listing_error.borrow().clone() {
      return Err(error);
    }
    Ok(
      self
        .processes
        .borrow()
        .iter()
        .filter(|p| !p.exited)
        .map(|p| ProcessEntry {
          id: p.id,
          name: p.name.clone(),
        })
        .collect(),
    )
  }

  fn main_windows(&self) -> TopmostResult<HashMap<ProcessId, WindowHandle>> {
    self.record(Call::MainWindows);
    if let Some(error) = self.window_listing_error.borrow().clone() {
      return Err(error);
    }
    Ok(
      self
        .processes
        .borrow()
        .iter()
        .filter(|p| !p.exited && !p.window.is_null())
        .map(|p| (p.id, p.window))
        .collect(),
    )
  }

  fn window_title(&self, window: WindowHandle) -> TopmostResult<String> {
    self.record(Call::WindowTitle(window));
    match self
      .processes
      .borrow()
      .iter()
      .find(|p| p.window == window)
      .map(|p| (p.title.clone(), p.inspect_error.clone()))
    {
      Some((_, Some(error))) => Err(error),
      Some((title, None)) => Ok(title),
      None => Ok(String::new()),
    }
  }

  fn is_window_visible(&self, window: WindowHandle) -> bool {
    self.record(Call::IsWindowVisible(window));
    self
      .processes
      .borrow()
      .iter()
      .any(|p| p.window == window && p.visible && !p.exited)
  }

  fn has_exited(&self, pid: ProcessId) -> TopmostResult<bool> {
    self.record(Call::HasExited(pid));
    match self.find(pid, |p| (p.exited, p.query_error.clone())) {
      Some((_, Some(error))) => Err(error),
      Some((exited, None)) => Ok(exited),
      None => Ok(true),
    }
  }

  fn set_z_order(&self, window: WindowHandle, order: ZOrder) -> TopmostResult<()> {
    self.record(Call::SetZOrder(window, order));
    match self.z_order_failures.borrow_mut().pop_front() {
      Some(code) => Err(TopmostError::OsCallFailed(code)),
      None => Ok(()),
    }
  }
}
