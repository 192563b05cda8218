pub mod portal;
pub mod config;
pub mod service_handle;
pub mod cli;

pub use portal::{BoundAddrs, Portal};
pub use config::{FileConfig, Overrides, PortalConfig};
pub use service_handle::ServiceHandle;
pub use cli::run_cli;
