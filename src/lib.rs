//! Shop Dashboard - Main Library
//!
//! Console front end for the shop synchronization core.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, console commands, runners)
//! - **shopsync**: Synchronization core (re-exported from workspace)
//! - **pushsocket**: Push channel WebSocket library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use shop_dashboard::bin_common::{load_config_from_env, ConfigType};
//! use shop_dashboard::shopsync::DashboardHost;
//! ```

// Re-export workspace libraries for convenience
pub use pushsocket;
pub use shopsync;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the presentation layer (binaries).

    pub mod cli;
    pub mod console;
    pub mod runner;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
    pub use console::{Command, CommandError};
    pub use runner::{BinaryRunner, RunConfig};
}
