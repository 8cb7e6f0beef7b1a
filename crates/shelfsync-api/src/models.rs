use serde::{Deserialize, Serialize};

/// A catalog product exactly as the API returns it
///
/// Products are never patched in place. A refresh replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    /// Image URI
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// 0.0 - 5.0
    pub rate: f64,
    pub count: u64,
}
