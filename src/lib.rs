//! Server list ping client for Minecraft: Java Edition servers, plus a small
//! REST service exposing it.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod query;
pub mod status;
pub mod telemetry;

pub use error::{ErrorKind, QueryError, QueryPhase};
pub use query::{query_status, QueryOptions, ServerAddress, StatusClient};
pub use status::{Description, DescriptionExtra, PlayerSample, Players, ServerStatus, Version};
