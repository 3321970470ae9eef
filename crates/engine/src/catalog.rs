//! Price catalog: the static item-name → unit-price mapping.
//!
//! The catalog is **injected** into the engine as an immutable value (never
//! a process-wide global), so tests can run against their own price lists
//! and prices can only ever be resolved server-side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, FieldErrors, Money, ResultEngine};

/// Product category a sale belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Water,
    Gas,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Water, Category::Gas];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Gas => "Gas",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(Self::Water),
            "gas" => Ok(Self::Gas),
            other => Err(EngineError::Validation(FieldErrors::single(
                "category",
                format!("unknown category: {other}"),
            ))),
        }
    }
}

/// Immutable item-name → unit-price mapping, one table per [`Category`].
///
/// Lookup is by **exact** item-name key; classification for reporting is a
/// separate concern (see the aggregation rules).
#[derive(Clone, Debug, Default)]
pub struct PriceCatalog {
    entries: BTreeMap<Category, BTreeMap<String, Money>>,
}

impl PriceCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one catalog entry (builder style).
    #[must_use]
    pub fn with_item(
        mut self,
        category: Category,
        item: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        self.entries
            .entry(category)
            .or_default()
            .insert(item.into(), unit_price);
        self
    }

    /// Unit price for an exact item-name key, if present.
    #[must_use]
    pub fn unit_price(&self, category: Category, item: &str) -> Option<Money> {
        self.entries
            .get(&category)
            .and_then(|items| items.get(item))
            .copied()
    }

    /// Iterates a category's items in name order.
    pub fn items(&self, category: Category) -> impl Iterator<Item = (&str, Money)> {
        self.entries
            .get(&category)
            .into_iter()
            .flat_map(|items| items.iter().map(|(name, price)| (name.as_str(), *price)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    /// The built-in price list the shop opens with when the configuration
    /// does not override it.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_item(Category::Water, "20L (Refill)", Money::from_major(250))
            .with_item(Category::Water, "10L (Refill)", Money::from_major(150))
            .with_item(Category::Water, "5L (Refill)", Money::from_major(100))
            .with_item(Category::Water, "20L (New Bottle)", Money::from_major(500))
            .with_item(Category::Gas, "6KG Gas (Refill)", Money::from_major(1200))
            .with_item(Category::Gas, "13KG Gas (Refill)", Money::from_major(2500))
            .with_item(
                Category::Gas,
                "6KG Gas (New Cylinder)",
                Money::from_major(3500),
            )
    }
}

/// Catalog section of `settings.toml`: item name → price string per
/// category table, e.g.
///
/// ```toml
/// [catalog.water]
/// "20L (Refill)" = "250"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub water: BTreeMap<String, String>,
    #[serde(default)]
    pub gas: BTreeMap<String, String>,
}

impl CatalogConfig {
    /// Parses the configured price strings into a [`PriceCatalog`].
    pub fn build(self) -> ResultEngine<PriceCatalog> {
        let mut catalog = PriceCatalog::new();
        for (category, items) in [(Category::Water, self.water), (Category::Gas, self.gas)] {
            for (item, price) in items {
                let unit_price: Money = price.parse().map_err(|_| {
                    EngineError::Config(format!("invalid price for {category} item {item}: {price}"))
                })?;
                if !unit_price.is_positive() {
                    return Err(EngineError::Config(format!(
                        "price for {category} item {item} must be > 0"
                    )));
                }
                catalog = catalog.with_item(category, item, unit_price);
            }
        }
        Ok(catalog)
    }
}
