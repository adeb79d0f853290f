//! Storage layer for weightlog.
//!
//! A single flat text file holds every record; see [`store`].

pub mod store;

pub use store::RecordStore;
