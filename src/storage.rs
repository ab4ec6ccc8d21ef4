/// The gateway trait and an in-memory implementation.
pub mod gateway;
/// JSON file storage.
pub mod json;

pub use gateway::{Collection, Gateway, GatewayError, MemoryGateway, Snapshot};
pub use json::JsonDirectory;
