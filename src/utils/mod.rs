pub mod error;
pub mod logging;
pub mod text;

pub use error::*;
pub use text::{constant_time_eq, loggable_message, message_preview};
