//! Core library for the pantry recipe cache: the data model, the SQLite
//! store, the remote-source contract, and the incremental sync engine.

pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod service;
pub mod sync;
