//! Menu browsing.

use tracing::info;

use tiffin_storefront::view::{MenuItemView, menu_cards};
use tiffin_storefront::{CategoryFilter, Menu, MenuError};

/// List menu items, optionally narrowed by category and search text.
///
/// # Errors
///
/// Returns `MenuError::Catalog` if the bundled catalog cannot be parsed.
pub fn list(category: Option<&str>, search: Option<&str>) -> Result<(), MenuError> {
    let mut menu = Menu::default_catalog()?;

    if let Some(category) = category {
        let filter: CategoryFilter = category.parse().unwrap_or_default();
        menu.filter(filter);
    }

    let cards: Vec<MenuItemView> = match search {
        Some(query) => menu
            .search(query)
            .into_iter()
            .filter(|item| menu.current_category().matches(item))
            .map(MenuItemView::from)
            .collect(),
        None => menu_cards(&menu),
    };

    if cards.is_empty() {
        info!(category = %menu.current_category(), "No items found");
        return Ok(());
    }

    for card in &cards {
        info!(
            category = %card.category,
            "{} {} - {}",
            card.name,
            card.price,
            card.description
        );
    }
    info!(count = cards.len(), "Menu listed");
    Ok(())
}

/// Log item counts and the price range.
///
/// # Errors
///
/// Returns `MenuError::Catalog` if the bundled catalog cannot be parsed.
pub fn stats() -> Result<(), MenuError> {
    let stats = Menu::default_catalog()?.stats();

    info!(total = stats.total, "Menu items");
    for (category, count) in &stats.categories {
        info!(category = %category, count, "Category");
    }
    if let Some(range) = stats.price_range {
        info!(min = range.min, max = range.max, "Price range");
    }
    Ok(())
}
