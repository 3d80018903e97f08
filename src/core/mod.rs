pub mod checks;
pub mod runner;

pub use crate::domain::model::{BurstPlan, CheckKind, CheckReport, ProbeResponse, SuiteReport};
pub use crate::domain::ports::{ConfigProvider, HttpProbe};
pub use crate::utils::error::Result;
