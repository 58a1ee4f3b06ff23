//! API request handlers

mod export;
mod health;
mod sessions;

pub use export::*;
pub use health::*;
pub use sessions::*;
