//! Catalog collaborator
//!
//! In-memory product registry. The checkout workflow consults it
//! exactly once per cart line, at add time; the price captured there
//! is the one the order is settled against.

use dashmap::DashMap;
use shared::checkout::ProductEntry;
use shared::util::new_id;

/// In-memory catalog keyed by product entry id
#[derive(Debug, Default)]
pub struct CatalogService {
    products: DashMap<String, ProductEntry>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product, generating an id when the caller supplies
    /// none. Returns the stored entry.
    pub fn upsert(&self, mut entry: ProductEntry) -> ProductEntry {
        if entry.id.is_empty() {
            entry.id = new_id();
        }
        self.products.insert(entry.id.clone(), entry.clone());
        entry
    }

    /// Look up a product by id
    pub fn get(&self, product_entry_id: &str) -> Option<ProductEntry> {
        self.products
            .get(product_entry_id)
            .map(|entry| entry.clone())
    }

    /// All registered products, in unspecified order
    pub fn list(&self) -> Vec<ProductEntry> {
        self.products
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_get() {
        let catalog = CatalogService::new();
        let stored = catalog.upsert(ProductEntry {
            id: String::new(),
            name: "Espresso".to_string(),
            unit_price: 1.5,
        });
        assert!(!stored.id.is_empty());
        assert_eq!(catalog.get(&stored.id).map(|p| p.unit_price), Some(1.5));
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_upsert_overwrites() {
        let catalog = CatalogService::new();
        let stored = catalog.upsert(ProductEntry {
            id: "p1".to_string(),
            name: "Espresso".to_string(),
            unit_price: 1.5,
        });
        catalog.upsert(ProductEntry {
            unit_price: 1.8,
            ..stored
        });
        assert_eq!(catalog.get("p1").map(|p| p.unit_price), Some(1.8));
        assert_eq!(catalog.list().len(), 1);
    }
}
