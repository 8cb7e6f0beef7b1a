// Catalog view state and the reducer that drives it
use crate::models::{FetchOutcome, Product, SyncPhase};

/// Products revealed per page
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Everything that can happen to the catalog view
///
/// User intents and completed async work both come through here, one
/// variant at a time, so every change goes through `reduce`.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    SetSearchQuery(String),
    /// `None` (or an empty label) shows every category
    SetSelectedCategory(Option<String>),
    LoadMore,
    SetRefreshing(bool),
    SetOffline(bool),
    ClearError,
    CacheLoadStarted,
    CachedProductsLoaded(Vec<Product>),
    CachedCategoriesLoaded(Vec<String>),
    ProductsFetchStarted,
    ProductsFetched(FetchOutcome<Vec<Product>>),
    ProductsFetchFailed(String),
    CategoriesFetched(FetchOutcome<Vec<String>>),
}

/// In-memory catalog state as the presentation layer sees it
///
/// `filtered` and `has_more` are derived from `items`, `query` and
/// `category`. They're private and only `reduce` rewrites them.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogViewState {
    query: String,
    category: Option<String>,
    items: Vec<Product>,
    filtered: Vec<Product>,
    categories: Vec<String>,
    page: usize,
    page_size: usize,
    has_more: bool,
    loading_cache: bool,
    loading: bool,
    refreshing: bool,
    offline: bool,
    error: Option<String>,
}

impl CatalogViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            category: None,
            items: Vec::new(),
            filtered: Vec::new(),
            categories: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            has_more: false,
            loading_cache: false,
            loading: false,
            refreshing: false,
            offline: false,
            error: None,
        }
    }

    pub fn reduce(&mut self, action: CatalogAction) {
        match action {
            CatalogAction::SetSearchQuery(query) => {
                self.query = query;
                self.refilter();
            }
            CatalogAction::SetSelectedCategory(category) => {
                self.category = category.filter(|c| !c.is_empty());
                self.refilter();
            }
            CatalogAction::LoadMore => {
                if self.loading || self.refreshing || !self.has_more {
                    return;
                }
                self.page += 1;
                self.has_more = self.page * self.page_size < self.filtered.len();
            }
            CatalogAction::SetRefreshing(refreshing) => {
                self.refreshing = refreshing;
            }
            CatalogAction::SetOffline(offline) => {
                self.offline = offline;
            }
            CatalogAction::ClearError => {
                self.error = None;
            }
            CatalogAction::CacheLoadStarted => {
                self.loading_cache = true;
            }
            CatalogAction::CachedProductsLoaded(products) => {
                self.loading_cache = false;
                // A fetch that landed first wins over a slower cache read
                if self.items.is_empty() && !products.is_empty() {
                    self.items = products;
                    self.refilter();
                }
            }
            CatalogAction::CachedCategoriesLoaded(categories) => {
                if self.categories.is_empty() && !categories.is_empty() {
                    self.categories = categories;
                }
            }
            CatalogAction::ProductsFetchStarted => {
                if !self.refreshing {
                    self.loading = true;
                }
                self.error = None;
            }
            CatalogAction::ProductsFetched(outcome) => {
                self.loading = false;
                self.error = None;
                self.offline = outcome.is_fallback();
                self.items = outcome.into_inner();
                self.refilter();
            }
            CatalogAction::ProductsFetchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            CatalogAction::CategoriesFetched(outcome) => {
                self.categories = outcome.into_inner();
            }
        }
    }

    /// Recompute the filtered list and collapse the window to page one
    fn refilter(&mut self) {
        self.filtered = filter_products(&self.items, &self.query, self.category.as_deref());
        self.page = 1;
        self.has_more = self.page_size < self.filtered.len();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The full catalog, unfiltered
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn filtered_items(&self) -> &[Product] {
        &self.filtered
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `page * page_size`, capped at the filtered length
    pub fn visible_count(&self) -> usize {
        (self.page * self.page_size).min(self.filtered.len())
    }

    /// The slice of filtered products currently on screen
    pub fn visible_items(&self) -> &[Product] {
        &self.filtered[..self.visible_count()]
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> SyncPhase {
        if self.refreshing {
            SyncPhase::Refreshing
        } else if self.loading {
            SyncPhase::Fetching
        } else if self.loading_cache {
            SyncPhase::LoadingCache
        } else if self.error.is_some() {
            SyncPhase::Error
        } else if self.offline {
            SyncPhase::Offline
        } else {
            SyncPhase::Idle
        }
    }
}

impl Default for CatalogViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Case-insensitive title search, then exact category match, order kept
pub fn filter_products(items: &[Product], query: &str, category: Option<&str>) -> Vec<Product> {
    let needle = query.to_lowercase();

    items
        .iter()
        .filter(|item| needle.is_empty() || item.title.to_lowercase().contains(&needle))
        .filter(|item| category.map_or(true, |c| item.category == c))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    fn product(id: u64, title: &str, category: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            price: 10.0 + id as f64,
            description: String::new(),
            category: category.to_string(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    fn catalog(n: u64) -> Vec<Product> {
        (1..=n)
            .map(|id| product(id, &format!("Item {}", id), "electronics"))
            .collect()
    }

    fn loaded(items: Vec<Product>) -> CatalogViewState {
        let mut state = CatalogViewState::default();
        state.reduce(CatalogAction::ProductsFetched(FetchOutcome::Fetched(items)));
        state
    }

    /// Ten products, three of which are shirts in men's clothing
    fn mixed_catalog() -> Vec<Product> {
        vec![
            product(1, "Mens Casual Premium Slim Fit T-Shirts", "men's clothing"),
            product(2, "Mens Cotton Jacket", "men's clothing"),
            product(3, "Solid Gold Petite Micropave", "jewelery"),
            product(4, "Men's Flannel SHIRT", "men's clothing"),
            product(5, "Women's Short Sleeve Shirt", "women's clothing"),
            product(6, "WD 2TB Elements Portable Hard Drive", "electronics"),
            product(7, "Classic Oxford shirt", "men's clothing"),
            product(8, "Rain Jacket Women Windbreaker", "women's clothing"),
            product(9, "Samsung 49-Inch Monitor", "electronics"),
            product(10, "Pierced Owl Rose Gold Earrings", "jewelery"),
        ]
    }

    #[test]
    fn test_filter_matches_title_and_category() {
        let items = mixed_catalog();
        let filtered = filter_products(&items, "shirt", Some("men's clothing"));

        let ids: Vec<u64> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 4, 7]);
    }

    #[test]
    fn test_filter_is_exactly_the_matching_items() {
        let items = mixed_catalog();
        for query in ["", "shirt", "JACKET", "gold", "zzz"] {
            for category in [None, Some("men's clothing"), Some("jewelery")] {
                let filtered = filter_products(&items, query, category);
                let expected: Vec<u64> = items
                    .iter()
                    .filter(|p| p.title.to_lowercase().contains(&query.to_lowercase()))
                    .filter(|p| category.map_or(true, |c| p.category == c))
                    .map(|p| p.id)
                    .collect();
                let actual: Vec<u64> = filtered.iter().map(|p| p.id).collect();
                assert_eq!(actual, expected, "query={:?} category={:?}", query, category);
            }
        }
    }

    #[test]
    fn test_shirt_scenario() {
        let mut state = loaded(mixed_catalog());
        state.reduce(CatalogAction::SetSearchQuery("shirt".to_string()));
        state.reduce(CatalogAction::SetSelectedCategory(Some(
            "men's clothing".to_string(),
        )));

        assert_eq!(state.filtered_items().len(), 3);
        assert!(!state.has_more());
        assert_eq!(state.visible_items().len(), 3);
    }

    #[test]
    fn test_category_match_is_exact() {
        let items = mixed_catalog();
        assert!(filter_products(&items, "", Some("Men's Clothing")).is_empty());
        assert!(filter_products(&items, "", Some("clothing")).is_empty());
    }

    #[test]
    fn test_empty_category_means_all() {
        let mut state = loaded(mixed_catalog());
        state.reduce(CatalogAction::SetSelectedCategory(Some(String::new())));
        assert_eq!(state.category(), None);
        assert_eq!(state.filtered_items().len(), 10);
    }

    #[test]
    fn test_load_more_grows_until_exhausted() {
        let mut state = loaded(catalog(20));
        assert_eq!(state.visible_count(), 8);
        assert!(state.has_more());

        state.reduce(CatalogAction::LoadMore);
        assert_eq!(state.visible_count(), 16);
        assert!(state.has_more());

        state.reduce(CatalogAction::LoadMore);
        assert_eq!(state.visible_count(), 20);
        assert!(!state.has_more());

        // Exhausted: further calls change nothing
        state.reduce(CatalogAction::LoadMore);
        assert_eq!(state.page(), 3);
        assert_eq!(state.visible_count(), 20);
    }

    #[test]
    fn test_load_more_never_shrinks_or_overshoots() {
        let mut state = loaded(catalog(30));
        let mut previous = state.visible_count();
        for _ in 0..10 {
            state.reduce(CatalogAction::LoadMore);
            let current = state.visible_count();
            assert!(current >= previous);
            assert!(current <= state.filtered_items().len());
            previous = current;
        }
    }

    #[test]
    fn test_exact_page_boundary_has_no_more() {
        let state = loaded(catalog(8));
        assert!(!state.has_more());
        assert_eq!(state.visible_count(), 8);
    }

    #[test]
    fn test_filter_change_resets_window() {
        let mut state = loaded(catalog(30));
        state.reduce(CatalogAction::LoadMore);
        state.reduce(CatalogAction::LoadMore);
        assert_eq!(state.page(), 3);

        state.reduce(CatalogAction::SetSearchQuery("item 1".to_string()));
        assert_eq!(state.page(), 1);
        // "Item 1", "Item 10".."Item 19" = 11 items
        assert_eq!(state.filtered_items().len(), 11);
        assert!(state.has_more());
        assert_eq!(state.visible_count(), 8);

        state.reduce(CatalogAction::LoadMore);
        state.reduce(CatalogAction::SetSelectedCategory(Some("jewelery".to_string())));
        assert_eq!(state.page(), 1);
        assert!(state.filtered_items().is_empty());
        assert!(!state.has_more());
        assert!(state.visible_items().is_empty());
    }

    #[test]
    fn test_load_more_is_noop_while_fetching() {
        let mut state = loaded(catalog(20));
        state.reduce(CatalogAction::ProductsFetchStarted);
        state.reduce(CatalogAction::LoadMore);
        assert_eq!(state.page(), 1);
        assert_eq!(state.phase(), SyncPhase::Fetching);
    }

    #[test]
    fn test_cache_never_clobbers_loaded_items() {
        let mut state = loaded(catalog(3));
        state.reduce(CatalogAction::CachedProductsLoaded(catalog(12)));
        assert_eq!(state.items().len(), 3);

        let mut empty = CatalogViewState::default();
        empty.reduce(CatalogAction::CacheLoadStarted);
        assert_eq!(empty.phase(), SyncPhase::LoadingCache);
        empty.reduce(CatalogAction::CachedProductsLoaded(catalog(12)));
        assert_eq!(empty.items().len(), 12);
        assert!(empty.has_more());
        assert_eq!(empty.phase(), SyncPhase::Idle);
    }

    #[test]
    fn test_cached_categories_only_fill_empty_set() {
        let mut state = CatalogViewState::default();
        state.reduce(CatalogAction::CachedCategoriesLoaded(vec!["a".into()]));
        state.reduce(CatalogAction::CachedCategoriesLoaded(vec!["b".into()]));
        assert_eq!(state.categories(), ["a".to_string()]);

        state.reduce(CatalogAction::CategoriesFetched(FetchOutcome::Fetched(vec![
            "c".into(),
            "d".into(),
        ])));
        assert_eq!(state.categories(), ["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn test_failed_fetch_keeps_items_and_sets_error() {
        let mut state = loaded(catalog(5));
        state.reduce(CatalogAction::ProductsFetchStarted);
        state.reduce(CatalogAction::ProductsFetchFailed(
            "HTTP error! status: 500".to_string(),
        ));

        assert_eq!(state.items().len(), 5);
        assert_eq!(state.error(), Some("HTTP error! status: 500"));
        assert!(!state.is_loading());
        assert_eq!(state.phase(), SyncPhase::Error);

        state.reduce(CatalogAction::ClearError);
        assert_eq!(state.error(), None);
        assert_eq!(state.phase(), SyncPhase::Idle);
    }

    #[test]
    fn test_fallback_marks_offline_not_error() {
        let mut state = CatalogViewState::default();
        state.reduce(CatalogAction::ProductsFetchStarted);
        state.reduce(CatalogAction::ProductsFetched(FetchOutcome::FallbackToCache(
            catalog(4),
        )));

        assert!(state.is_offline());
        assert_eq!(state.error(), None);
        assert_eq!(state.phase(), SyncPhase::Offline);

        state.reduce(CatalogAction::ProductsFetched(FetchOutcome::Fetched(catalog(6))));
        assert!(!state.is_offline());
        assert_eq!(state.items().len(), 6);
    }

    #[test]
    fn test_refresh_does_not_show_loading_spinner() {
        let mut state = loaded(catalog(2));
        state.reduce(CatalogAction::SetRefreshing(true));
        state.reduce(CatalogAction::ProductsFetchStarted);
        assert!(!state.is_loading());
        assert_eq!(state.phase(), SyncPhase::Refreshing);
    }
}
