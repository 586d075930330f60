//! Product Catalog Module
//!
//! The catalog is a read-only product list loaded once at startup from
//! `products.json`. It backs the shop page's search box and category chips
//! and is the source of cart line items.

pub mod handlers;
pub mod models;

pub use handlers::routes;
pub use models::{Product, ALL_CATEGORIES};

use models::CatalogFile;
use std::path::{Path, PathBuf};

/// File name of the catalog inside the data directory.
pub const CATALOG_FILE: &str = "products.json";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog lists product id {0} more than once")]
    DuplicateId(String),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<String>,
}

impl Catalog {
    /// Builds a catalog from products already in memory. Categories are taken
    /// in first-seen order, led by [`ALL_CATEGORIES`].
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for p in &products {
            if !categories.contains(&p.category) {
                categories.push(p.category.clone());
            }
        }
        Self::from_parts(products, categories)
    }

    fn from_parts(products: Vec<Product>, categories: Vec<String>) -> Result<Self, CatalogError> {
        for (i, p) in products.iter().enumerate() {
            if products[..i].iter().any(|q| q.id == p.id) {
                return Err(CatalogError::DuplicateId(p.id.clone()));
            }
        }
        Ok(Self {
            products,
            categories,
        })
    }

    /// Reads and parses a catalog document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if file.categories.is_empty() {
            Self::new(file.products)
        } else {
            Self::from_parts(file.products, file.categories)
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products whose name or description contains `query` (ignoring case)
    /// and that belong to `category`. An empty query or the "All" category
    /// does not filter.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| p.matches_query(&needle) && p.in_category(category))
            .collect()
    }
}

/// Attempts to locate the data directory holding `products.json`
pub fn locate_data_directory(current_dir: &Path) -> PathBuf {
    // Strategy:
    // 1. ./data
    // 2. ../data (if running from a subdir)
    // 3. Fallback to "data" relative path

    if current_dir.join("data").exists() {
        return current_dir.join("data");
    }

    if let Some(parent) = current_dir.parent() {
        if parent.join("data").exists() {
            return parent.join("data");
        }
    }

    PathBuf::from("data") // Fallback
}
