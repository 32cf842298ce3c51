//! Derived view queries over a document collection.
//!
//! Sorting and filtering never change the cached collection; they produce a
//! new ordered view for display.

use super::model::Document;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ordering by `updated_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Most recently updated first.
    #[default]
    Desc,
}

/// Search term plus sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionQuery {
    pub search: Option<String>,
    pub order: SortOrder,
}

impl CollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the case-insensitive search term. Blank terms match everything.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Returns true when the document's title or plain-text body contains
    /// the search term.
    pub fn matches(&self, document: &Document) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        document.title.to_lowercase().contains(&term)
            || document.plain_text().to_lowercase().contains(&term)
    }

    /// Applies the filter and sort to a collection.
    ///
    /// Documents without `updated_at` sort as the oldest. The sort is
    /// stable, so ties keep their collection order.
    pub fn apply(&self, documents: &[Document]) -> Vec<Document> {
        let mut view: Vec<Document> = documents
            .iter()
            .filter(|doc| self.matches(doc))
            .cloned()
            .collect();

        match self.order {
            SortOrder::Asc => view.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
            SortOrder::Desc => view.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        }
        view
    }
}
