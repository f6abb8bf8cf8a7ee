//! Menu catalog: category filtering, search and maintenance.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::cart::{Cart, Product};
use crate::timer::Debouncer;

/// Catalog bundled with the crate.
const DEFAULT_CATALOG: &str = include_str!("../content/menu.json");

/// Errors returned by menu operations.
#[derive(Debug, Error)]
pub enum MenuError {
    /// An item with this name is already on the menu.
    #[error("menu already has an item named {0:?}")]
    DuplicateName(String),

    /// No item with this name is on the menu.
    #[error("no menu item named {0:?}")]
    UnknownItem(String),

    /// The catalog JSON could not be parsed.
    #[error("invalid menu catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: String,
    pub category: String,
    /// Price in whole rupees.
    pub price: u64,
    /// Icon class shown on the item card.
    #[serde(default)]
    pub icon: String,
}

impl From<&MenuItem> for Product {
    fn from(item: &MenuItem) -> Self {
        Self::new(item.name.clone(), item.price)
    }
}

/// Partial update for a [`MenuItem`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub icon: Option<String>,
}

/// Which categories are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => item.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "all" {
            Self::All
        } else {
            Self::Only(s.to_string())
        })
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

/// Summary figures for the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuStats {
    pub total: usize,
    pub categories: BTreeMap<String, usize>,
    /// `None` for an empty menu.
    pub price_range: Option<PriceRange>,
}

/// The menu and its current category selection.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
    current_category: CategoryFilter,
}

impl Menu {
    /// A menu showing every category.
    #[must_use]
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items,
            current_category: CategoryFilter::All,
        }
    }

    /// Parse a menu from a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::Catalog` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::Catalog` if the bundled JSON is malformed.
    pub fn default_catalog() -> Result<Self, MenuError> {
        Self::from_json(DEFAULT_CATALOG)
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.name == name)
    }

    #[must_use]
    pub const fn current_category(&self) -> &CategoryFilter {
        &self.current_category
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    /// Select `category` and return the items it shows.
    #[instrument(skip_all, fields(category = %category))]
    pub fn filter(&mut self, category: CategoryFilter) -> Vec<&MenuItem> {
        self.current_category = category;
        self.visible()
    }

    /// Items shown under the current category.
    #[must_use]
    pub fn visible(&self) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| self.current_category.matches(item))
            .collect()
    }

    /// Items whose name or description contains `query`, ignoring case.
    ///
    /// Search ignores the current category. An empty query matches all.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Append a new item.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::DuplicateName` if the name is taken.
    pub fn add_menu_item(&mut self, item: MenuItem) -> Result<(), MenuError> {
        if self.item(&item.name).is_some() {
            return Err(MenuError::DuplicateName(item.name));
        }
        tracing::debug!(name = %item.name, "Menu item added");
        self.items.push(item);
        Ok(())
    }

    /// Remove the item named `name`. Returns whether anything was removed.
    pub fn remove_menu_item(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        before != self.items.len()
    }

    /// Apply `updates` to the item named `name`.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::UnknownItem` if no item matches, or
    /// `MenuError::DuplicateName` if the new name belongs to another item.
    pub fn update_menu_item(&mut self, name: &str, updates: MenuItemUpdate) -> Result<(), MenuError> {
        if let Some(new_name) = &updates.name {
            if new_name != name && self.item(new_name).is_some() {
                return Err(MenuError::DuplicateName(new_name.clone()));
            }
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.name == name)
            .ok_or_else(|| MenuError::UnknownItem(name.to_string()))?;

        if let Some(new_name) = updates.name {
            item.name = new_name;
        }
        if let Some(description) = updates.description {
            item.description = description;
        }
        if let Some(price) = updates.price {
            item.price = price;
        }
        if let Some(icon) = updates.icon {
            item.icon = icon;
        }
        Ok(())
    }

    /// Count, per-category counts and price range.
    #[must_use]
    pub fn stats(&self) -> MenuStats {
        let mut categories = BTreeMap::new();
        for item in &self.items {
            *categories.entry(item.category.clone()).or_insert(0) += 1;
        }

        let price_range = self
            .items
            .iter()
            .map(|item| item.price)
            .fold(None, |range: Option<PriceRange>, price| {
                Some(range.map_or(PriceRange { min: price, max: price }, |r| PriceRange {
                    min: r.min.min(price),
                    max: r.max.max(price),
                }))
            });

        MenuStats {
            total: self.items.len(),
            categories,
            price_range,
        }
    }

    /// Add one unit of the item named `name` to `cart`.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::UnknownItem` if the menu has no such item.
    pub fn add_to_cart(&self, name: &str, cart: &mut Cart) -> Result<(), MenuError> {
        let item = self
            .item(name)
            .ok_or_else(|| MenuError::UnknownItem(name.to_string()))?;
        cart.add_item(&Product::from(item));
        Ok(())
    }
}

/// Search input that runs [`Menu::search`] once typing pauses.
///
/// Results for the last query of a burst are handed to the callback along
/// with that query. Must be used from within a tokio runtime.
pub struct SearchBox {
    debouncer: Debouncer<String>,
}

impl std::fmt::Debug for SearchBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBox")
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

impl SearchBox {
    pub const DEFAULT_WAIT: Duration = Duration::from_millis(300);

    pub fn new<F>(menu: Arc<Menu>, wait: Duration, on_results: F) -> Self
    where
        F: Fn(&str, Vec<MenuItem>) + Send + Sync + 'static,
    {
        let debouncer = Debouncer::new(wait, move |query: String| {
            let results: Vec<MenuItem> = menu.search(&query).into_iter().cloned().collect();
            tracing::debug!(query = %query, matches = results.len(), "Menu searched");
            on_results(&query, results);
        });
        Self { debouncer }
    }

    /// Record the text now in the search input.
    pub fn input(&self, query: impl Into<String>) {
        self.debouncer.call(query.into());
    }

    /// Drop a search that has not run yet.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
