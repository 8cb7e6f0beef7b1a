// Plain-text rendering of catalog state
use shelfsync_core::{CatalogViewState, FavoritesRegister, LocalStore, Product};

pub fn catalog(state: &CatalogViewState, favorites: &FavoritesRegister) {
    if state.is_offline() {
        println!("[offline] showing cached products");
    }
    if let Some(error) = state.error() {
        println!("[error] {}", error);
    }

    let mut filters = Vec::new();
    if !state.query().is_empty() {
        filters.push(format!("query \"{}\"", state.query()));
    }
    if let Some(category) = state.category() {
        filters.push(format!("category \"{}\"", category));
    }
    if !filters.is_empty() {
        println!("Filtered by {}", filters.join(", "));
    }

    if state.filtered_items().is_empty() {
        println!("No products found");
        return;
    }

    for product in state.visible_items() {
        let marker = if favorites.is_favorite(product.id) { "*" } else { " " };
        println!("{} {}", marker, line(product));
    }

    println!(
        "Showing {} of {}{}",
        state.visible_count(),
        state.filtered_items().len(),
        if state.has_more() { " (more available)" } else { "" }
    );
}

pub fn categories(state: &CatalogViewState) {
    if state.categories().is_empty() {
        println!("No categories available");
        return;
    }
    for category in state.categories() {
        println!("{}", category);
    }
}

pub fn product(product: &Product, is_favorite: bool) {
    println!("{}", product.title);
    println!("  id:       {}", product.id);
    println!("  price:    ${:.2}", product.price);
    println!("  category: {}", product.category);
    println!(
        "  rating:   {:.1} ({} reviews)",
        product.rating.rate, product.rating.count
    );
    println!("  image:    {}", product.image);
    println!("  favorite: {}", if is_favorite { "yes" } else { "no" });
    println!();
    println!("{}", product.description);
}

pub fn favorites(favorites: &[Product]) {
    if favorites.is_empty() {
        println!("No favorites yet");
        return;
    }
    for product in favorites {
        println!("* {}", line(product));
    }
}

pub fn snapshot_age(storage: &LocalStore) {
    if let Some(age) = storage.load_catalog().and_then(|s| s.age()) {
        println!("Cache updated {}", humanize(age));
    }
}

fn line(product: &Product) -> String {
    format!(
        "#{:<4} {:<60} ${:>8.2}  {}",
        product.id,
        truncate(&product.title, 60),
        product.price,
        product.category
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}

fn humanize(age: chrono::Duration) -> String {
    if age.num_days() > 0 {
        format!("{} days ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{} hours ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{} minutes ago", age.num_minutes())
    } else {
        "just now".to_string()
    }
}
