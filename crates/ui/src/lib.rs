pub mod app;
pub mod bar;
pub mod error;
pub mod queue;
pub mod terminal;
pub mod theme;
pub mod view;

pub use app::{MeterApp, StopHandle};
pub use bar::{filler_length, Orientation};
pub use error::UiError;
pub use queue::{update_queue, UpdateReceiver, UpdateSender, DEFAULT_QUEUE_CAPACITY};
pub use theme::{DisplayConfig, MeterTheme};
pub use view::{LevelBar, MeterView};
