use crate::domain::model::{ContaminantId, WaterFilter};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    fn table(&self) -> &str;
    fn column(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}

/// Anything that can answer "which rows of the filter table contain this id".
#[async_trait]
pub trait FilterSource: Send + Sync {
    async fn select_containing(&self, contaminant: ContaminantId) -> Result<Vec<WaterFilter>>;

    /// Short label used in logs and reports.
    fn describe(&self) -> String;
}
