mod commands;
mod configuration;
mod lifecycle;
mod notifications;

pub use commands::*;
pub use configuration::*;
pub use lifecycle::*;
pub use notifications::*;
