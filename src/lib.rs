pub mod naming;
pub mod server;
pub mod storage;

pub use server::{AppState, ServerConfig};
pub use storage::ImageStore;
