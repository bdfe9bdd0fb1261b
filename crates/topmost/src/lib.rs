/*!
Topmost - keep any application window always on top

```ignore
use topmost::{CurrentPlatform, Event, Shell};

// Shell over the native platform, refreshing every 5s by default
let mut shell = Shell::new(CurrentPlatform::new());
shell.handle(Event::Started);

// Pick the first listed process and pin its main window
shell.handle(Event::SelectionChanged(Some(0)));
shell.handle(Event::ToggleClicked);

let view = shell.view();
println!("{}", view.status.message);
```

The pieces are usable on their own as well:

```ignore
let platform = CurrentPlatform::new();
let mut table = TopmostTable::new();
for record in topmost::enumerate(&platform) {
    println!("{}", record.label());
}
let pinned = topmost::toggle(&platform, &mut table, &record)?;
```
*/

mod enumerate;
mod platform;
mod table;
mod toggle;

pub mod shell;

mod types;
pub use types::*;

pub use crate::enumerate::enumerate;
pub use crate::platform::{Platform, ProcessEntry, ZOrder};
pub use crate::shell::{Event, Selection, Severity, Shell, ShellBuilder, ShellView, Status};
pub use crate::table::TopmostTable;
pub use crate::toggle::toggle;

#[cfg(target_os = "windows")]
pub use crate::platform::{CurrentPlatform, WindowsPlatform};
