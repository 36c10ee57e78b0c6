// Adapters layer: concrete implementations of the domain ports.
// The file-backed config store lives in config::store.

pub mod memory;
