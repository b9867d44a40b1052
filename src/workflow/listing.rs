// Server-paginated document listings with filter gating.
//
// The search filter reuses the IC incremental validator, and a fetch that
// lands on a page emptied by a concurrent change falls back to the last
// valid page instead of presenting an empty result.

use crate::client::PortalClient;
use crate::types::{DocumentPage, DocumentRecord, DocumentType};
use crate::validate::ic::IcField;

use super::error::WorkflowError;

/// Fixed page size across every listing view
pub const ITEMS_PER_PAGE: u64 = 10;

/// Which listing a view reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    Active,
    SoftDeleted,
}

/// Last page (0-indexed) that still holds rows for `total` matches
pub fn last_valid_page(total: u64, per_page: u64) -> u64 {
    if total == 0 {
        0
    } else {
        (total + per_page - 1) / per_page - 1
    }
}

pub struct DocumentLister {
    client: PortalClient,
    scope: ListingScope,
    ic_filter: IcField,
    doc_type: Option<DocumentType>,
    documents: Vec<DocumentRecord>,
    total: u64,
    current_page: u64,
    in_flight: bool,
}

impl DocumentLister {
    pub fn new(client: PortalClient, scope: ListingScope) -> Self {
        Self {
            client,
            scope,
            ic_filter: IcField::new(),
            doc_type: None,
            documents: Vec::new(),
            total: 0,
            current_page: 0,
            in_flight: false,
        }
    }

    // ---- filter input ------------------------------------------------------

    pub fn input_owner_ic(&mut self, raw: &str) -> Option<&str> {
        self.ic_filter.input(raw);
        self.ic_filter.live_error()
    }

    pub fn blur_owner_ic(&mut self) -> Option<&str> {
        self.ic_filter.blur()
    }

    pub fn owner_ic(&self) -> &str {
        self.ic_filter.value()
    }

    pub fn set_doc_type(&mut self, doc_type: Option<DocumentType>) {
        self.doc_type = doc_type;
    }

    /// Search is gated on a complete canonical IC filter
    pub fn can_search(&self) -> bool {
        self.ic_filter.is_canonical()
    }

    // ---- results -----------------------------------------------------------

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_count(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            last_valid_page(self.total, ITEMS_PER_PAGE) + 1
        }
    }

    // ---- fetching ----------------------------------------------------------

    /// Fetch one page of results for the current filters. A non-zero page
    /// that comes back empty while `total` says rows exist is retried at
    /// the recomputed last valid page.
    pub async fn search(&mut self, page: u64) -> Result<&[DocumentRecord], WorkflowError> {
        if !self.can_search() {
            return Err(WorkflowError::IncompleteFilter);
        }
        if self.in_flight {
            return Err(WorkflowError::Busy);
        }

        self.in_flight = true;
        let result = self.fetch_page(page).await;
        self.in_flight = false;
        result?;
        Ok(&self.documents)
    }

    async fn fetch_page(&mut self, page: u64) -> Result<(), WorkflowError> {
        let fetched = self.request(page).await?;

        // The requested page can be emptied under us, e.g. by a recovery
        // finishing in another session
        if fetched.documents.is_empty() && fetched.total > 0 && page > 0 {
            let fallback_page = last_valid_page(fetched.total, ITEMS_PER_PAGE);
            tracing::debug!(page, fallback_page, total = fetched.total, "page emptied, refetching");
            let fallback = self.request(fallback_page).await?;
            self.documents = fallback.documents;
            self.total = fallback.total;
            self.current_page = fallback_page;
        } else {
            self.documents = fetched.documents;
            self.total = fetched.total;
            self.current_page = page;
        }

        Ok(())
    }

    async fn request(&self, page: u64) -> Result<DocumentPage, WorkflowError> {
        let owner_ic = self.ic_filter.value();
        let page_data = match self.scope {
            ListingScope::Active => {
                self.client
                    .get_documents(owner_ic, self.doc_type, page, ITEMS_PER_PAGE)
                    .await?
            }
            ListingScope::SoftDeleted => {
                self.client
                    .get_soft_deleted_documents(owner_ic, self.doc_type, page, ITEMS_PER_PAGE)
                    .await?
            }
        };
        Ok(page_data)
    }
}
