use serde::Serialize;

use super::{paginate, Page};
use crate::models::{Product, ProductCategory};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total: usize,
    pub low_stock: usize,
    pub perishable: usize,
}

impl InventorySummary {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            total: products.len(),
            low_stock: products.iter().filter(|p| p.is_low_stock()).count(),
            perishable: products.iter().filter(|p| p.perishable).count(),
        }
    }
}

/// Search box plus category tab. `category: None` is the "All" tab.
#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    pub search: String,
    pub category: Option<ProductCategory>,
}

impl ProductFilter {
    pub fn new(search: impl Into<String>, category: Option<ProductCategory>) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    /// Case-insensitive substring match on name or sku.
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || product.name.to_lowercase().contains(&needle)
            || product.sku.to_lowercase().contains(&needle);
        let matches_tab = self.category.map_or(true, |c| product.category == c);
        matches_search && matches_tab
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    pub fn page(&self, products: &[Product], page: usize, rows_per_page: usize) -> Page<Product> {
        let rows: Vec<Product> = self.apply(products).into_iter().cloned().collect();
        paginate(&rows, page, rows_per_page)
    }
}
