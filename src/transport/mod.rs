pub mod cached_transport;
pub mod error;
pub mod retry;
