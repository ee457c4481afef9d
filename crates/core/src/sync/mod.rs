//! Project-to-quote synchronization

pub mod ports;
pub mod service;

pub use service::SyncService;
