//! Cart
//!
//! The in-progress order. Plain menu and offer additions merge by id;
//! customized additions always create a distinct line so two "identical"
//! custom pizzas with different notes stay separate.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Customization, Pizza};

/// Preparation status of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Not yet handled by the kitchen.
    Pending,
    /// Done.
    Completed,
}

/// One line of a cart or of a confirmed order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique within a cart; plain lines carry the catalog id, customized
    /// lines a synthesized one.
    pub id: String,
    /// Display name; customized lines embed the selection names.
    pub name: String,
    /// Unit price in minor units, customization surcharges included.
    pub price: u64,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
    /// Kitchen status.
    pub status: ItemStatus,
    /// Special instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set only when the line is copied into an order snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// A plain entry (menu pizza or wheel offer) to merge into a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price in minor units.
    pub price: u64,
    /// Units to add.
    pub quantity: u32,
}

/// The in-progress, unconfirmed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// The lines, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn units(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Cart total in minor units.
    pub fn total_minor(&self) -> u64 {
        self.items
            .iter()
            .map(|item| item.price * u64::from(item.quantity))
            .sum()
    }

    /// Whether any line carries a wheel-offer id.
    pub fn has_offer(&self, catalog: &Catalog) -> bool {
        self.items.iter().any(|item| catalog.is_offer(&item.id))
    }

    /// Add a plain entry. An existing line with the same id absorbs the
    /// quantity; otherwise a new pending line is appended.
    pub fn add(&mut self, item: NewItem) {
        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity += item.quantity;
            return;
        }

        self.items.push(LineItem {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            status: ItemStatus::Pending,
            notes: None,
            user_email: None,
        });
    }

    /// Add a customized pizza. Never merges: the line id embeds the
    /// selection ids, a note fragment and `at` in epoch milliseconds, so
    /// repeated additions stay distinct. Returns the new line id.
    pub fn add_customized(
        &mut self,
        pizza: &Pizza,
        selections: &[&Customization],
        quantity: u32,
        notes: &str,
        at: Timestamp,
    ) -> String {
        let surcharge: u64 = selections.iter().map(|selection| selection.surcharge).sum();
        let id = customized_id(&pizza.id, selections, notes, at);
        let notes = notes.trim();

        self.items.push(LineItem {
            id: id.clone(),
            name: customized_name(&pizza.name, selections),
            price: pizza.price + surcharge,
            quantity: quantity.max(1),
            status: ItemStatus::Pending,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            user_email: None,
        });

        id
    }

    /// Replace a line's quantity; zero or negative removes the line.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity) else {
            self.remove(id);
            return;
        };

        if quantity == 0 {
            self.remove(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|line| line.id == id) {
            item.quantity = quantity;
        }
    }

    /// Drop a line. Idempotent.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Deep copy of the lines stamped with the confirming email.
    pub fn snapshot(&self, email: &str) -> Vec<LineItem> {
        self.items
            .iter()
            .cloned()
            .map(|mut item| {
                item.user_email = Some(email.to_string());
                item
            })
            .collect()
    }
}

fn customized_name(pizza_name: &str, selections: &[&Customization]) -> String {
    if selections.is_empty() {
        return pizza_name.to_string();
    }

    let names: Vec<&str> = selections
        .iter()
        .map(|selection| selection.name.as_str())
        .collect();

    format!("{pizza_name} ({})", names.join(", "))
}

fn customized_id(
    pizza_id: &str,
    selections: &[&Customization],
    notes: &str,
    at: Timestamp,
) -> String {
    let selection_ids: Vec<&str> = selections
        .iter()
        .map(|selection| selection.id.as_str())
        .collect();
    let selection_ids = selection_ids.join(",");

    let notes = notes.trim();
    let notes_fragment = if notes.is_empty() {
        String::new()
    } else {
        let compact: Vec<&str> = notes.split_whitespace().collect();
        format!("_{}", compact.join("_"))
    };

    format!(
        "{pizza_id}_{selection_ids}{notes_fragment}_{}",
        at.as_millisecond()
    )
}
