//! Item Form Validation
//!
//! Turns raw form input into an [`ItemPayload`], or reports every failing
//! field with a user-facing message. Runs before any request is issued.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{Item, ItemPayload, ItemStatus};

pub const TITLE_MIN_CHARS: usize = 3;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const CATEGORY_MAX_CHARS: usize = 100;

/// Form fields that can carry an error message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Description,
    Category,
    Price,
    Quantity,
    Status,
    Tags,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::Category => "category",
            FormField::Price => "price",
            FormField::Quantity => "quantity",
            FormField::Status => "status",
            FormField::Tags => "tags",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw form state, exactly as typed
#[derive(Debug, Clone, PartialEq)]
pub struct ItemForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
    pub tags: String,
    pub status: String,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            price: "0".to_string(),
            quantity: "0".to_string(),
            tags: String::new(),
            status: ItemStatus::Active.as_str().to_string(),
        }
    }
}

impl ItemForm {
    /// Pre-fill the form for editing an existing item
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
            category: item.category.clone().unwrap_or_default(),
            price: item.price.to_string(),
            quantity: item.quantity.to_string(),
            tags: join_tags(&item.tags),
            status: item.status.as_str().to_string(),
        }
    }

    pub fn validate(&self) -> Result<ItemPayload, ValidationErrors> {
        validate_item(self)
    }
}

/// Split comma-separated tag input, trimming and dropping empty segments
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Validate every field and build the normalized payload
pub fn validate_item(form: &ItemForm) -> Result<ItemPayload, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = form.title.trim();
    if title.chars().count() < TITLE_MIN_CHARS {
        errors.insert(FormField::Title, "Title must be at least 3 characters");
    }

    let description = non_empty(&form.description);
    if description.is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS) {
        errors.insert(FormField::Description, "Description too long");
    }

    let category = non_empty(&form.category);
    if category.is_some_and(|c| c.chars().count() > CATEGORY_MAX_CHARS) {
        errors.insert(FormField::Category, "Category must be at most 100 characters");
    }

    let price = match parse_price(&form.price) {
        Ok(price) => Some(price),
        Err(msg) => {
            errors.insert(FormField::Price, msg);
            None
        }
    };

    let quantity = match parse_quantity(&form.quantity) {
        Ok(quantity) => Some(quantity),
        Err(msg) => {
            errors.insert(FormField::Quantity, msg);
            None
        }
    };

    let status = ItemStatus::parse(form.status.trim());
    if status.is_none() {
        errors.insert(FormField::Status, "Status must be active, inactive or archived");
    }

    match (price, quantity, status) {
        (Some(price), Some(quantity), Some(status)) if errors.is_empty() => Ok(ItemPayload {
            title: title.to_string(),
            description: description.map(str::to_string),
            category: category.map(str::to_string),
            price,
            quantity,
            tags: parse_tags(&form.tags),
            status,
        }),
        _ => Err(errors),
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_price(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Price is required");
    }
    let price: f64 = raw.parse().map_err(|_| "Price must be a number")?;
    if !price.is_finite() {
        return Err("Price must be a number");
    }
    if price < 0.0 {
        return Err("Price must be positive");
    }
    Ok(price)
}

fn parse_quantity(raw: &str) -> Result<u32, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Quantity is required");
    }
    let quantity: f64 = raw.parse().map_err(|_| "Quantity must be a number")?;
    if !quantity.is_finite() {
        return Err("Quantity must be a number");
    }
    if quantity.fract() != 0.0 {
        return Err("Quantity must be an integer");
    }
    if quantity < 0.0 {
        return Err("Quantity must be positive");
    }
    if quantity > u32::MAX as f64 {
        return Err("Quantity is too large");
    }
    Ok(quantity as u32)
}
