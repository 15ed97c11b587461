//! Persistence gateway: the only state that outlives a single inspection.
//!
//! Reports are stored as their export JSON document under a single
//! well-known key, so writing a new report replaces the previous one.

pub mod store;

pub use store::{KeyValueStore, MemoryStore};

use anyhow::{Context, Result};
use log::{debug, warn};
use std::sync::Arc;

use crate::models::DamageReport;
use crate::report::export::{from_export_json, to_export_json};

/// Key under which the current report lives.
pub const REPORT_KEY: &str = "damageReport";

pub struct ReportGateway<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ReportGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> ReportGateway<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn put(&self, key: &str, report: &DamageReport) -> Result<()> {
        let document = to_export_json(report)?;
        self.store
            .put(key, document)
            .await
            .with_context(|| format!("failed to store report under '{key}'"))?;
        debug!("Stored damage report under '{key}'");
        Ok(())
    }

    /// Missing and unreadable entries both come back as `None`.
    pub async fn get(&self, key: &str) -> Result<Option<DamageReport>> {
        let Some(document) = self
            .store
            .get(key)
            .await
            .with_context(|| format!("failed to read report under '{key}'"))?
        else {
            debug!("No report stored under '{key}'");
            return Ok(None);
        };

        match from_export_json(&document) {
            Ok(report) => Ok(Some(report)),
            Err(err) => {
                warn!("Discarding malformed report stored under '{key}': {err:#}");
                Ok(None)
            }
        }
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store
            .delete(key)
            .await
            .with_context(|| format!("failed to delete report under '{key}'"))?;
        debug!("Deleted report under '{key}'");
        Ok(())
    }

    pub async fn save_current(&self, report: &DamageReport) -> Result<()> {
        self.put(REPORT_KEY, report).await
    }

    pub async fn load_current(&self) -> Result<Option<DamageReport>> {
        self.get(REPORT_KEY).await
    }

    pub async fn clear_current(&self) -> Result<()> {
        self.delete(REPORT_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationPoint, SelectedRegionSet, Severity};
    use crate::report::build;

    fn report(severity: Severity) -> DamageReport {
        let selected: SelectedRegionSet = ["tip"].into_iter().collect();
        let point = AnnotationPoint::new(0.5, 0.5, severity, "tip", &selected).unwrap();
        build(Vec::new(), selected, vec![point]).unwrap()
    }

    fn gateway() -> ReportGateway<MemoryStore> {
        ReportGateway::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn second_report_replaces_the_first() {
        let gateway = gateway();
        let first = report(Severity::Light);
        let second = report(Severity::Severe);

        gateway.save_current(&first).await.unwrap();
        gateway.save_current(&second).await.unwrap();

        assert_eq!(gateway.load_current().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn malformed_document_reads_as_absent() {
        let gateway = gateway();
        gateway
            .store()
            .put(REPORT_KEY, "{ not json".to_string())
            .await
            .unwrap();
        assert_eq!(gateway.load_current().await.unwrap(), None);

        gateway
            .store()
            .put(
                REPORT_KEY,
                r#"{"images":[],"selectedRegions":[],"annotations":[{"x":0.1,"y":0.1,"severity":"light","region":"tip"}],"timestamp":"2024-01-01T00:00:00Z"}"#
                    .to_string(),
            )
            .await
            .unwrap();
        assert_eq!(gateway.load_current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn incomplete_documents_read_as_absent() {
        let gateway = gateway();
        for document in [
            r#"{"timestamp":"2024-01-01T00:00:00.000Z"}"#,
            r#"{"images":[],"selectedRegions":[],"annotations":[],"timestamp":"2024-01-01T00:00:00Z"}"#,
            r#"{"images":[],"selectedRegions":["tip"],"timestamp":"2024-01-01T00:00:00Z"}"#,
        ] {
            gateway
                .store()
                .put(REPORT_KEY, document.to_string())
                .await
                .unwrap();
            assert_eq!(gateway.load_current().await.unwrap(), None, "{document}");
        }
    }

    #[tokio::test]
    async fn delete_clears_and_is_idempotent() {
        let gateway = gateway();
        gateway.save_current(&report(Severity::Moderate)).await.unwrap();
        gateway.clear_current().await.unwrap();
        gateway.clear_current().await.unwrap();
        assert_eq!(gateway.load_current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let gateway = ReportGateway::new(store);
        let stored = report(Severity::Light);
        gateway.put("other", &stored).await.unwrap();
        assert_eq!(gateway.get("other").await.unwrap(), Some(stored));
        assert_eq!(gateway.load_current().await.unwrap(), None);
    }
}
