// Adapters layer: concrete implementations for external systems.

pub mod fixture;
pub mod http;
pub mod storage;
