//! API request handlers

mod forms;
mod health;
mod public;

pub use forms::*;
pub use health::*;
pub use public::*;
