//! API module for realcheck-daemon

pub mod rest;

pub use rest::create_router;
