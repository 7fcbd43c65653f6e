//! Page routing and catalog page state.
//!
//! Catalog pages have their own load/error lifecycle; a missing service id
//! is a page-level error with a back affordance and never touches the chat
//! transcript. Leaving a page aborts its in-flight fetch, so a stale reply
//! can never populate the page that replaced it.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{AbortHandle, Abortable};
use tokio::sync::mpsc;

use marg_gateway::{CatalogError, GuidanceCatalog};
use marg_types::{ServiceRecord, ServiceSummary, WizardSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Chat,
    Services,
    ServiceDetail,
}

/// Catalog listing page state.
#[derive(Debug, Default)]
pub enum ServicesPage {
    #[default]
    Idle,
    Loading {
        seq: u64,
        abort_handle: AbortHandle,
    },
    Ready {
        services: Vec<ServiceSummary>,
        selected: usize,
    },
    Failed(String),
}

/// A loaded service detail: record metadata plus the wizard instantiated
/// directly from it. Records without steps render metadata only.
#[derive(Debug)]
pub struct ServiceView {
    pub record: ServiceRecord,
    pub wizard: Option<WizardSession>,
}

impl ServiceView {
    fn new(record: ServiceRecord) -> Self {
        let wizard = record.wizard_spec().ok().map(WizardSession::new);
        Self { record, wizard }
    }
}

/// Catalog detail page state.
#[derive(Debug, Default)]
pub enum DetailPage {
    #[default]
    Idle,
    Loading {
        id: String,
        seq: u64,
        abort_handle: AbortHandle,
    },
    Ready(ServiceView),
    /// Absent id: page-level error with the service's message and a back
    /// affordance.
    NotFound(String),
    Failed(String),
}

enum CatalogEvent {
    ListSettled {
        seq: u64,
        result: Result<Vec<ServiceSummary>, CatalogError>,
    },
    DetailSettled {
        seq: u64,
        result: Result<ServiceRecord, CatalogError>,
    },
}

/// Routing plus the catalog fetch driver.
pub struct Router {
    route: Route,
    services: ServicesPage,
    detail: DetailPage,
    catalog: Arc<dyn GuidanceCatalog>,
    request_timeout: Duration,
    next_seq: u64,
    event_tx: mpsc::UnboundedSender<CatalogEvent>,
    event_rx: mpsc::UnboundedReceiver<CatalogEvent>,
}

impl Router {
    #[must_use]
    pub fn new(catalog: Arc<dyn GuidanceCatalog>, request_timeout: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            route: Route::Chat,
            services: ServicesPage::Idle,
            detail: DetailPage::Idle,
            catalog,
            request_timeout,
            next_seq: 0,
            event_tx,
            event_rx,
        }
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    #[must_use]
    pub fn services_page(&self) -> &ServicesPage {
        &self.services
    }

    #[must_use]
    pub fn detail_page(&self) -> &DetailPage {
        &self.detail
    }

    #[must_use]
    pub fn detail_wizard_mut(&mut self) -> Option<&mut WizardSession> {
        match &mut self.detail {
            DetailPage::Ready(view) => view.wizard.as_mut(),
            _ => None,
        }
    }

    /// Open the services listing and start (or restart) its fetch.
    pub fn open_services(&mut self) {
        self.abort_services_fetch();
        self.route = Route::Services;

        self.next_seq += 1;
        let seq = self.next_seq;
        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        let catalog = Arc::clone(&self.catalog);
        let timeout = self.request_timeout;
        let tx = self.event_tx.clone();

        tokio::spawn(Abortable::new(
            async move {
                let result = match tokio::time::timeout(timeout, catalog.list_services()).await {
                    Ok(result) => result,
                    Err(_) => Err(CatalogError::Fetch("request timed out".to_string())),
                };
                let _ = tx.send(CatalogEvent::ListSettled { seq, result });
            },
            abort_registration,
        ));

        self.services = ServicesPage::Loading { seq, abort_handle };
    }

    /// Open one service's detail page and start its fetch.
    pub fn open_service(&mut self, id: &str) {
        self.abort_detail_fetch();
        self.route = Route::ServiceDetail;

        self.next_seq += 1;
        let seq = self.next_seq;
        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        let catalog = Arc::clone(&self.catalog);
        let timeout = self.request_timeout;
        let tx = self.event_tx.clone();
        let id_owned = id.to_string();

        tokio::spawn(Abortable::new(
            async move {
                let result =
                    match tokio::time::timeout(timeout, catalog.get_by_id(&id_owned)).await {
                        Ok(result) => result,
                        Err(_) => Err(CatalogError::Fetch("request timed out".to_string())),
                    };
                let _ = tx.send(CatalogEvent::DetailSettled { seq, result });
            },
            abort_registration,
        ));

        self.detail = DetailPage::Loading {
            id: id.to_string(),
            seq,
            abort_handle,
        };
    }

    /// One level up: detail -> services -> chat.
    pub fn back(&mut self) {
        match self.route {
            Route::ServiceDetail => {
                self.abort_detail_fetch();
                self.detail = DetailPage::Idle;
                self.route = Route::Services;
            }
            Route::Services => {
                self.abort_services_fetch();
                self.services = ServicesPage::Idle;
                self.route = Route::Chat;
            }
            Route::Chat => {}
        }
    }

    pub fn services_select_next(&mut self) {
        if let ServicesPage::Ready { services, selected } = &mut self.services
            && *selected + 1 < services.len()
        {
            *selected += 1;
        }
    }

    pub fn services_select_prev(&mut self) {
        if let ServicesPage::Ready { selected, .. } = &mut self.services {
            *selected = selected.saturating_sub(1);
        }
    }

    #[must_use]
    pub fn selected_service_id(&self) -> Option<&str> {
        match &self.services {
            ServicesPage::Ready { services, selected } => {
                services.get(*selected).map(|s| s.id.as_str())
            }
            _ => None,
        }
    }

    /// Drain settled catalog fetches into page state. Stale replies (from a
    /// fetch whose page was left) are dropped by sequence number.
    pub fn process_catalog_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                CatalogEvent::ListSettled { seq, result } => {
                    let ServicesPage::Loading { seq: current, .. } = &self.services else {
                        continue;
                    };
                    if seq != *current {
                        tracing::debug!(seq, "Dropping stale service listing");
                        continue;
                    }
                    self.services = match result {
                        Ok(services) => {
                            tracing::info!(count = services.len(), "Service listing loaded");
                            ServicesPage::Ready {
                                services,
                                selected: 0,
                            }
                        }
                        Err(e) => {
                            tracing::warn!(%e, "Service listing failed");
                            ServicesPage::Failed(e.to_string())
                        }
                    };
                }
                CatalogEvent::DetailSettled { seq, result } => {
                    let DetailPage::Loading { seq: current, id, .. } = &self.detail else {
                        continue;
                    };
                    if seq != *current {
                        tracing::debug!(seq, "Dropping stale service detail");
                        continue;
                    }
                    let id = id.clone();
                    self.detail = match result {
                        Ok(record) => {
                            tracing::info!(id, "Service detail loaded");
                            DetailPage::Ready(ServiceView::new(record))
                        }
                        Err(CatalogError::NotFound(message)) => {
                            tracing::debug!(id, "Service not found");
                            DetailPage::NotFound(message)
                        }
                        Err(e) => {
                            tracing::warn!(%e, id, "Service detail failed");
                            DetailPage::Failed(e.to_string())
                        }
                    };
                }
            }
        }
    }

    /// Abort any in-flight catalog fetch. Called on session teardown.
    pub fn abort_all(&mut self) {
        self.abort_services_fetch();
        self.abort_detail_fetch();
    }

    fn abort_services_fetch(&mut self) {
        if let ServicesPage::Loading { abort_handle, .. } = &self.services {
            abort_handle.abort();
            self.services = ServicesPage::Idle;
        }
    }

    fn abort_detail_fetch(&mut self) {
        if let DetailPage::Loading { abort_handle, .. } = &self.detail {
            abort_handle.abort();
            self.detail = DetailPage::Idle;
        }
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailPage, Route, Router, ServicesPage};
    use async_trait::async_trait;
    use marg_gateway::{CatalogError, GuidanceCatalog};
    use marg_types::{ServiceRecord, ServiceSummary, Step};
    use std::sync::Arc;
    use std::time::Duration;

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    fn record(id: &str, steps: usize) -> ServiceRecord {
        ServiceRecord {
            id: id.to_string(),
            name: "PAN Card".to_string(),
            description: "Apply for PAN".to_string(),
            version: "1.2".to_string(),
            last_updated: "2024-11-02".to_string(),
            official_link: "https://example.gov.in".to_string(),
            steps: (0..steps)
                .map(|i| Step {
                    id: i as i64 + 1,
                    title: format!("Step {}", i + 1),
                    description: String::new(),
                    action_label: None,
                    link: None,
                    details: None,
                })
                .collect(),
            checklist: vec!["Photo".to_string()],
            legal_disclaimer: "Guidance only.".to_string(),
        }
    }

    struct FakeCatalog {
        listing: Result<Vec<ServiceSummary>, CatalogError>,
        detail: Result<ServiceRecord, CatalogError>,
    }

    #[async_trait]
    impl GuidanceCatalog for FakeCatalog {
        async fn list_services(&self) -> Result<Vec<ServiceSummary>, CatalogError> {
            self.listing.clone()
        }

        async fn get_by_id(&self, _id: &str) -> Result<ServiceRecord, CatalogError> {
            self.detail.clone()
        }
    }

    fn fake(detail: Result<ServiceRecord, CatalogError>) -> Arc<FakeCatalog> {
        Arc::new(FakeCatalog {
            listing: Ok(vec![ServiceSummary {
                id: "pan".to_string(),
                name: "PAN Card".to_string(),
                description: "Apply for PAN".to_string(),
                version: "1.2".to_string(),
            }]),
            detail,
        })
    }

    async fn settle_services(router: &mut Router) {
        tokio::time::timeout(TEST_TIMEOUT, async {
            while matches!(router.services_page(), ServicesPage::Loading { .. }) {
                router.process_catalog_events();
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("listing settles");
    }

    async fn settle_detail(router: &mut Router) {
        tokio::time::timeout(TEST_TIMEOUT, async {
            while matches!(router.detail_page(), DetailPage::Loading { .. }) {
                router.process_catalog_events();
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("detail settles");
    }

    #[tokio::test]
    async fn services_listing_loads_and_selects_first() {
        let mut router = Router::new(fake(Ok(record("pan", 2))), TEST_TIMEOUT);
        router.open_services();
        assert_eq!(router.route(), Route::Services);
        settle_services(&mut router).await;

        assert!(matches!(router.services_page(), ServicesPage::Ready { .. }));
        assert_eq!(router.selected_service_id(), Some("pan"));
    }

    #[tokio::test]
    async fn detail_loads_a_wizard_from_the_record() {
        let mut router = Router::new(fake(Ok(record("pan", 2))), TEST_TIMEOUT);
        router.open_service("pan");
        settle_detail(&mut router).await;

        match router.detail_page() {
            DetailPage::Ready(view) => {
                assert_eq!(view.record.id, "pan");
                let wizard = view.wizard.as_ref().expect("record has steps");
                assert_eq!(wizard.step_count(), 2);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stepless_record_renders_metadata_only() {
        let mut router = Router::new(fake(Ok(record("pan", 0))), TEST_TIMEOUT);
        router.open_service("pan");
        settle_detail(&mut router).await;

        match router.detail_page() {
            DetailPage::Ready(view) => assert!(view.wizard.is_none()),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_id_is_a_page_error_with_the_service_message() {
        let catalog = fake(Err(CatalogError::NotFound("Service not found".to_string())));
        let mut router = Router::new(catalog, TEST_TIMEOUT);
        router.open_service("xyz");
        settle_detail(&mut router).await;

        match router.detail_page() {
            DetailPage::NotFound(message) => assert_eq!(message, "Service not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }

        // Back affordance: one level up, to the listing.
        router.back();
        assert_eq!(router.route(), Route::Services);
    }

    #[tokio::test]
    async fn leaving_a_loading_page_aborts_its_fetch() {
        let mut router = Router::new(fake(Ok(record("pan", 2))), TEST_TIMEOUT);
        router.open_service("pan");
        router.back();
        assert!(matches!(router.detail_page(), DetailPage::Idle));

        tokio::time::sleep(Duration::from_millis(20)).await;
        router.process_catalog_events();
        assert!(matches!(router.detail_page(), DetailPage::Idle));
    }

    #[tokio::test]
    async fn selection_clamps_at_both_ends() {
        let mut router = Router::new(fake(Ok(record("pan", 2))), TEST_TIMEOUT);
        router.open_services();
        settle_services(&mut router).await;

        router.services_select_prev();
        assert_eq!(router.selected_service_id(), Some("pan"));
        router.services_select_next();
        assert_eq!(router.selected_service_id(), Some("pan"));
    }
}
