// Adapters layer: concrete implementations for external systems (records, http, notifications, storage).

pub mod fixtures;
pub mod http;
pub mod notify;
pub mod store;
