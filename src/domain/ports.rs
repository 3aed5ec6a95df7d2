use crate::domain::model::{BatchReport, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ObjectStore: Send + Sync {
    fn fetch_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait SqlExecutor: Send + Sync {
    fn execute(
        &self,
        statement: &str,
        params: &[&str],
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}

#[async_trait]
pub trait ImportPipeline: Send + Sync {
    async fn fetch(&self) -> Result<String>;
    async fn decode(&self, content: String) -> Result<Vec<Record>>;
    async fn write(&self, records: Vec<Record>) -> Result<BatchReport>;
}
