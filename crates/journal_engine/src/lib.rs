//! Journal engine: browser automation controller and effect execution.
mod batch;
mod browser;
mod navigate;
mod resolve;
mod session;
mod submit;
mod types;
mod wire;

pub use batch::{BatchDriver, BatchHandle, ChannelProgressSink, ProgressSink};
pub use browser::{with_frame, Browser, DriverError, ElementHandle};
pub use navigate::PageNavigator;
pub use resolve::Resolver;
pub use session::SessionController;
pub use submit::EntrySubmitter;
pub use types::{
    BatchEvent, BatchInputs, BatchProgress, BatchSettings, FaultKind, StepError,
};
pub use wire::{WebDriverBrowser, WebDriverSettings};
