//! Persistence adapters for the hosted data store

pub mod postgrest;

pub use postgrest::PostgrestRepository;
