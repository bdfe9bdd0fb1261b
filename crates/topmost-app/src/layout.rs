/*!
Control placement for the main window.

Three rows: a caption, the selector row (70/15/15 split between the
drop-down, Refresh and the toggle button), and the status line.
*/

#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

/// Initial outer window size.
pub(crate) const WINDOW_WIDTH: i32 = 450;
pub(crate) const WINDOW_HEIGHT: i32 = 250;
/// Smallest outer size the user can drag the window to.
pub(crate) const MIN_WIDTH: i32 = 400;
pub(crate) const MIN_HEIGHT: i32 = 200;

const PADDING: i32 = 10;
const GAP: i32 = 5;
const CAPTION_HEIGHT: i32 = 20;
const ROW_HEIGHT: i32 = 25;
/// Combo box height includes its drop-down list.
const DROPDOWN_HEIGHT: i32 = 200;
const STATUS_HEIGHT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Rect {
  pub(crate) x: i32,
  pub(crate) y: i32,
  pub(crate) width: i32,
  pub(crate) height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
  pub(crate) caption: Rect,
  pub(crate) selector: Rect,
  pub(crate) refresh: Rect,
  pub(crate) toggle: Rect,
  pub(crate) status: Rect,
}

/// Place every control for a client area `width` pixels wide. Rows keep fixed heights.
pub(crate) fn compute(width: i32) -> Layout {
  let inner = (width - 2 * PADDING).max(0);
  let columns = (inner - 2 * GAP).max(0);
  let selector_width = columns * 70 / 100;
  let refresh_width = columns * 15 / 100;
  let toggle_width = columns - selector_width - refresh_width;

  let caption_y = PADDING;
  let row_y = caption_y + CAPTION_HEIGHT + GAP;
  let status_y = row_y + ROW_HEIGHT + PADDING;

  let refresh_x = PADDING + selector_width + GAP;
  let toggle_x = refresh_x + refresh_width + GAP;

  Layout {
    caption: Rect {
      x: PADDING,
      y: caption_y,
      width: inner,
      height: CAPTION_HEIGHT,
    },
    selector: Rect {
      x: PADDING,
      y: row_y,
      width: selector_width,
      height: DROPDOWN_HEIGHT,
    },
    refresh: Rect {
      x: refresh_x,
      y: row_y,
      width: refresh_width,
      height: ROW_HEIGHT,
    },
    toggle: Rect {
      x: toggle_x,
      y: row_y,
      width: toggle_width,
      height: ROW_HEIGHT,
    },
    status: Rect {
      x: PADDING,
      y: status_y,
      width: inner,
      height: STATUS_HEIGHT,
    },
  }
}

/// Top-left corner that centers a window of the given size on the screen.
pub(crate) const fn centered(screen_width: i32, screen_height: i32, width: i32, height: i32) -> (i32, i32) {
  ((screen_width - width) / 2, (screen_height - height) / 2)
}
