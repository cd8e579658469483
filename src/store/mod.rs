// Durable storage module.
// Holds each user's last query on disk so it survives cache expiry and restarts.

pub mod paths;
pub mod queries;

pub use queries::QueryStore;
