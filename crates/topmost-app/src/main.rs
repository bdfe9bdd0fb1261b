/*!
Always on Top Manager.

Lists visible application windows and pins the selected one above all
others. Logging follows `RUST_LOG`, defaulting to `info`.
*/

// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod layout;
#[cfg(target_os = "windows")]
mod window;

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  #[cfg(target_os = "windows")]
  if let Err(e) = window::run() {
    log::error!("Always on Top Manager failed: {e}");
    std::process::exit(1);
  }

  #[cfg(not(target_os = "windows"))]
  {
    log::error!("Always on Top Manager requires Windows");
    std::process::exit(1);
  }
}
