pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod service;
pub mod storage;

pub use server::Server;
pub use service::ResourceService;
