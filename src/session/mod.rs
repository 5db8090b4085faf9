//! Interactive session driver.
//!
//! This module ties the timer engine to the outside world:
//! - `command`: parsing of interactive input into [`SessionCommand`]
//! - `runner`: the [`Session`] loop and the [`SessionEvent`] stream it emits

mod command;
mod runner;

pub use command::{SessionCommand, SettingChange, UnknownCommand};
pub use runner::{Session, SessionEvent};
