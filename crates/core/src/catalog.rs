//! Catalog
//!
//! The static menu, wheel-offer and customization catalog. Entries are
//! loaded once from the YAML fixtures embedded in the crate and never
//! change for the lifetime of the process.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::money::{self, MoneyError};

const MENU_YAML: &str = include_str!("fixtures/menu.yml");
const OFFERS_YAML: &str = include_str!("fixtures/offers.yml");
const CUSTOMIZATIONS_YAML: &str = include_str!("fixtures/customizations.yml");

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error.
    #[error("failed to parse catalog fixture: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price in a fixture entry.
    #[error("invalid catalog price")]
    Money(#[from] MoneyError),

    /// Two entries of the same kind share an id.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
}

/// Menu section a pizza belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PizzaCategory {
    /// Tomato-base pizzas.
    Rosse,
    /// White-base pizzas.
    Bianche,
    /// House specials.
    Speciali,
}

/// A pizza on the regular menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pizza {
    /// Menu id; cart lines for plain additions carry it verbatim.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base price in minor units.
    pub price: u64,
    /// Ingredient summary.
    pub description: String,
    /// Menu section.
    pub category: PizzaCategory,
}

/// A promotional offer on the fortune wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    /// Offer id; membership of this id set is what makes a cart line a
    /// redemption at confirm time.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Discounted price in minor units.
    pub price: u64,
    /// Undiscounted reference price in minor units.
    pub original_price: Option<u64>,
    /// Ingredient summary.
    pub description: String,
    /// Display emoji.
    pub emoji: String,
    /// Advertised discount percentage.
    pub discount: Option<u8>,
    /// Marketing category.
    pub category: String,
}

/// An extra or substitution applied to a customized pizza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customization {
    /// Customization id; part of the synthesized cart-line id.
    pub id: String,
    /// Display name, embedded in the customized line name.
    pub name: String,
    /// Surcharge in minor units; zero for removals.
    pub surcharge: u64,
}

#[derive(Debug, Deserialize)]
struct MenuFixture {
    pizzas: Vec<PizzaFixture>,
}

#[derive(Debug, Deserialize)]
struct PizzaFixture {
    id: String,
    name: String,
    price: String,
    description: String,
    category: PizzaCategory,
}

#[derive(Debug, Deserialize)]
struct OffersFixture {
    offers: Vec<OfferFixture>,
}

#[derive(Debug, Deserialize)]
struct OfferFixture {
    id: String,
    name: String,
    price: String,
    original_price: Option<String>,
    description: String,
    #[serde(default)]
    emoji: String,
    discount: Option<u8>,
    category: String,
}

#[derive(Debug, Deserialize)]
struct CustomizationsFixture {
    customizations: Vec<CustomizationFixture>,
}

#[derive(Debug, Deserialize)]
struct CustomizationFixture {
    id: String,
    name: String,
    surcharge: String,
}

impl TryFrom<PizzaFixture> for Pizza {
    type Error = CatalogError;

    fn try_from(fixture: PizzaFixture) -> Result<Self, Self::Error> {
        Ok(Self {
            id: fixture.id,
            name: fixture.name,
            price: money::parse_price(&fixture.price)?,
            description: fixture.description,
            category: fixture.category,
        })
    }
}

impl TryFrom<OfferFixture> for Offer {
    type Error = CatalogError;

    fn try_from(fixture: OfferFixture) -> Result<Self, Self::Error> {
        let original_price = fixture
            .original_price
            .as_deref()
            .map(money::parse_price)
            .transpose()?;

        Ok(Self {
            id: fixture.id,
            name: fixture.name,
            price: money::parse_price(&fixture.price)?,
            original_price,
            description: fixture.description,
            emoji: fixture.emoji,
            discount: fixture.discount,
            category: fixture.category,
        })
    }
}

impl TryFrom<CustomizationFixture> for Customization {
    type Error = CatalogError;

    fn try_from(fixture: CustomizationFixture) -> Result<Self, Self::Error> {
        Ok(Self {
            id: fixture.id,
            name: fixture.name,
            surcharge: money::parse_price(&fixture.surcharge)?,
        })
    }
}

/// The full static catalog with id lookups.
#[derive(Debug, Clone)]
pub struct Catalog {
    pizzas: Vec<Pizza>,
    offers: Vec<Offer>,
    customizations: Vec<Customization>,
    pizza_index: FxHashMap<String, usize>,
    offer_index: FxHashMap<String, usize>,
    customization_index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error when a bundled fixture fails to parse; with intact
    /// fixtures this cannot happen.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(MENU_YAML, OFFERS_YAML, CUSTOMIZATIONS_YAML)
    }

    /// Build a catalog from YAML fixture documents.
    ///
    /// # Errors
    ///
    /// Returns an error when a document fails to parse, a price is
    /// malformed, or two entries of the same kind share an id.
    pub fn from_yaml(
        menu: &str,
        offers: &str,
        customizations: &str,
    ) -> Result<Self, CatalogError> {
        let menu: MenuFixture = serde_norway::from_str(menu)?;
        let offers: OffersFixture = serde_norway::from_str(offers)?;
        let customizations: CustomizationsFixture = serde_norway::from_str(customizations)?;

        let pizzas = menu
            .pizzas
            .into_iter()
            .map(Pizza::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let offers = offers
            .offers
            .into_iter()
            .map(Offer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let customizations = customizations
            .customizations
            .into_iter()
            .map(Customization::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            pizza_index: index_by_id(pizzas.iter().map(|pizza| pizza.id.as_str()))?,
            offer_index: index_by_id(offers.iter().map(|offer| offer.id.as_str()))?,
            customization_index: index_by_id(
                customizations.iter().map(|customization| customization.id.as_str()),
            )?,
            pizzas,
            offers,
            customizations,
        })
    }

    /// The menu, in menu order.
    pub fn pizzas(&self) -> &[Pizza] {
        &self.pizzas
    }

    /// Look up a pizza by menu id.
    pub fn pizza(&self, id: &str) -> Option<&Pizza> {
        self.pizza_index.get(id).and_then(|index| self.pizzas.get(*index))
    }

    /// The wheel offers, in wheel-slice order.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Look up an offer by id.
    pub fn offer(&self, id: &str) -> Option<&Offer> {
        self.offer_index.get(id).and_then(|index| self.offers.get(*index))
    }

    /// Whether `id` names a wheel offer.
    pub fn is_offer(&self, id: &str) -> bool {
        self.offer_index.contains_key(id)
    }

    /// Every customization option.
    pub fn customizations(&self) -> &[Customization] {
        &self.customizations
    }

    /// Look up a customization by id.
    pub fn customization(&self, id: &str) -> Option<&Customization> {
        self.customization_index
            .get(id)
            .and_then(|index| self.customizations.get(*index))
    }
}

fn index_by_id<'a>(
    ids: impl Iterator<Item = &'a str>,
) -> Result<FxHashMap<String, usize>, CatalogError> {
    let mut index = FxHashMap::default();

    for (position, id) in ids.enumerate() {
        if index.insert(id.to_string(), position).is_some() {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
    }

    Ok(index)
}
