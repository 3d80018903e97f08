pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::ReqwestProbe;
pub use crate::config::{Settings, TomlConfig};
pub use crate::core::checks::{test_error_server, test_html_server, test_rate_limit};
pub use crate::core::runner::{SuiteFailure, SuiteRunner};
pub use crate::utils::error::{CheckError, Result};
