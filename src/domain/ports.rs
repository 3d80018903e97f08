use crate::domain::model::{BurstPlan, ProbeResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Issues plain GET requests on behalf of a check.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    async fn get(&self, url: &str) -> Result<ProbeResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn content_port(&self) -> u16;
    fn error_port(&self) -> u16;
    fn startup_delay(&self) -> Duration;
    fn marker(&self) -> &str;
    fn burst_plan(&self) -> BurstPlan;
    fn request_timeout(&self) -> Option<Duration>;

    fn content_url(&self) -> String {
        target_url(self.host(), self.content_port())
    }

    fn error_url(&self) -> String {
        target_url(self.host(), self.error_port())
    }
}

pub fn target_url(host: &str, port: u16) -> String {
    format!("{}:{}", host.trim_end_matches('/'), port)
}
