pub mod catalog;
pub mod config;
pub mod loader;
pub mod reconcile;
pub mod session;

pub mod error;
