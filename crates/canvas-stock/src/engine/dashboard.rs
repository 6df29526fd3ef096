//! Dashboard: reacts to stock selection by loading its analysis

use super::aggregator::{AnalysisAggregator, LoadHandle};
use super::view_model::DashboardState;
use crate::store::AppStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Binds an [`AppStore`] selection to an [`AnalysisAggregator`]
#[derive(Clone)]
pub struct Dashboard {
    store: AppStore,
    aggregator: AnalysisAggregator,
}

impl Dashboard {
    pub fn new(store: AppStore, aggregator: AnalysisAggregator) -> Self {
        Self { store, aggregator }
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn aggregator(&self) -> &AnalysisAggregator {
        &self.aggregator
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.aggregator.subscribe()
    }

    /// Start a task that loads every newly selected stock
    ///
    /// A selection present when the task starts is loaded immediately.
    /// Clearing the selection resets the dashboard. The task ends when the
    /// store is dropped.
    pub fn spawn_selection_listener(&self) -> JoinHandle<()> {
        let mut rx = self.store.subscribe_selection();
        let aggregator = self.aggregator.clone();

        tokio::spawn(async move {
            let initial = rx.borrow_and_update().clone();
            if let Some(selection) = initial {
                aggregator.load_analysis(selection.code);
            }

            while rx.changed().await.is_ok() {
                let selection = rx.borrow_and_update().clone();
                match selection {
                    Some(selection) => {
                        aggregator.load_analysis(selection.code);
                    }
                    None => aggregator.reset(),
                }
            }
            debug!("selection listener stopped");
        })
    }

    /// Select a stock and open the canvas
    ///
    /// The load itself is started by the selection listener.
    pub fn select(&self, code: impl Into<String>, name: Option<String>) -> bool {
        let changed = self.store.select_stock(code, name);
        self.store.open_canvas();
        changed
    }

    pub fn refresh(&self) -> Option<LoadHandle> {
        self.aggregator.refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockAnalysisBackend;
    use crate::engine::view_model::LoadPhase;
    use crate::model::{AnalysisPayload, CompanyInfo};
    use std::sync::Arc;

    fn backend() -> MockAnalysisBackend {
        let mut mock = MockAnalysisBackend::new();
        mock.expect_fetch_section().returning(|code, _| {
            Ok(AnalysisPayload {
                company_info: Some(CompanyInfo {
                    company_name: format!("company-{code}"),
                    ..Default::default()
                }),
                ..Default::default()
            })
        });
        mock
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            AppStore::new(),
            AnalysisAggregator::new(Arc::new(backend())),
        )
    }

    #[tokio::test]
    async fn test_selection_triggers_load() {
        let dashboard = dashboard();
        let listener = dashboard.spawn_selection_listener();
        let mut rx = dashboard.subscribe();

        assert!(dashboard.select("005930", Some("삼성전자".to_string())));
        assert!(dashboard.store().layout().canvas_open);

        let state = rx
            .wait_for(|s| s.stock_code() == "005930" && s.phase != LoadPhase::Loading)
            .await
            .unwrap()
            .clone();
        assert_eq!(state.view_model.display_name(), "company-005930");

        dashboard.select("000660", None);
        rx.wait_for(|s| s.stock_code() == "000660" && s.phase == LoadPhase::Complete)
            .await
            .unwrap();

        dashboard.store().clear_selection();
        rx.wait_for(|s| s.phase == LoadPhase::Idle).await.unwrap();

        listener.abort();
    }

    #[tokio::test]
    async fn test_naming_the_loaded_stock_keeps_the_dashboard() {
        let dashboard = dashboard();
        let listener = dashboard.spawn_selection_listener();
        let mut rx = dashboard.subscribe();

        dashboard.select("005930", None);
        rx.wait_for(|s| s.stock_code() == "005930" && s.phase == LoadPhase::Complete)
            .await
            .unwrap();
        let generation = dashboard.aggregator().current_generation();

        assert!(!dashboard.select("005930", Some("삼성전자".to_string())));
        tokio::task::yield_now().await;

        let state = dashboard.aggregator().snapshot();
        assert_eq!(state.generation, generation);
        assert_eq!(state.phase, LoadPhase::Complete);
        assert!(!state.view_model.is_empty());
        assert_eq!(
            dashboard.store().selection().unwrap().name.as_deref(),
            Some("삼성전자")
        );

        listener.abort();
    }

    #[tokio::test]
    async fn test_existing_selection_loads_on_start() {
        let dashboard = dashboard();
        dashboard.store().select_stock("035720", None);

        let listener = dashboard.spawn_selection_listener();
        let mut rx = dashboard.subscribe();
        rx.wait_for(|s| s.stock_code() == "035720" && s.phase == LoadPhase::Complete)
            .await
            .unwrap();

        let refreshed = dashboard.refresh().unwrap();
        assert_eq!(refreshed.stock_code(), "035720");
        assert!(!refreshed.wait().await.unwrap().superseded);

        listener.abort();
    }
}
