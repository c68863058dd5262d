//! Student storefronts and their products
//!
//! Revenue and sales counters are only ever incremented by a successful
//! purchase. Drafts and patches carry the descriptive fields a client may
//! set; counters, ids and creation time are never taken from a request.

use crate::errors::DomainError;
use crate::ids::{BusinessId, ProductId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product listed by a business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sales: u64,
    #[serde(default)]
    pub revenue: Decimal,
}

/// A student-run storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub owner_id: UserId,
    #[serde(default)]
    pub owner_name: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub revenue: Decimal,
    #[serde(default)]
    pub total_sales: u64,
    #[serde(with = "crate::timestamp")]
    pub created: DateTime<Utc>,
}

/// Fields accepted when opening a business
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessDraft {
    pub owner_id: Option<UserId>,
    pub owner_name: Option<String>,
    pub name: String,
    pub category: String,
    pub description: String,
    pub tagline: String,
    pub color: String,
}

/// Descriptive fields a business update may replace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessPatch {
    pub owner_id: Option<UserId>,
    pub owner_name: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    pub color: Option<String>,
}

/// Fields accepted when listing a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
}

/// Descriptive fields a product update may replace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

fn validate_price(price: Decimal) -> Result<Decimal, DomainError> {
    if price <= Decimal::ZERO {
        return Err(DomainError::InvalidPrice {
            price: price.to_string(),
        });
    }
    Ok(price)
}

impl Product {
    /// Create a product with zeroed counters
    pub fn from_draft(draft: ProductDraft) -> Result<Self, DomainError> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(Self {
            id: ProductId::new(),
            name: draft.name,
            description: draft.description,
            price: validate_price(draft.price)?,
            category: draft.category,
            sales: 0,
            revenue: Decimal::ZERO,
        })
    }

    /// Replace the descriptive fields present in `patch`
    pub fn apply_patch(&mut self, patch: ProductPatch) -> Result<(), DomainError> {
        // Validate before touching anything so a bad price leaves the product intact
        let price = patch.price.map(validate_price).transpose()?;
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        Ok(())
    }
}

impl Business {
    /// Open a business with no products and zeroed counters
    pub fn from_draft(
        draft: BusinessDraft,
        owner_name: String,
        created: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let owner_id = draft.owner_id.ok_or(DomainError::MissingField("ownerId"))?;
        if draft.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(Self {
            id: BusinessId::new(),
            owner_id,
            owner_name,
            name: draft.name,
            category: draft.category,
            description: draft.description,
            tagline: draft.tagline,
            color: draft.color,
            products: Vec::new(),
            revenue: Decimal::ZERO,
            total_sales: 0,
            created,
        })
    }

    /// Replace the descriptive fields present in `patch`
    pub fn apply_patch(&mut self, patch: BusinessPatch) {
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(owner_name) = patch.owner_name {
            self.owner_name = owner_name;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tagline) = patch.tagline {
            self.tagline = tagline;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }

    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == product_id)
    }

    pub fn product_mut(&mut self, product_id: &ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| &p.id == product_id)
    }

    /// Remove a product, returning it if it was listed
    pub fn remove_product(&mut self, product_id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == product_id)?;
        Some(self.products.remove(index))
    }

    /// Count a completed sale against the business and the product sold.
    ///
    /// Returns `Ok(false)` when the product is not listed. Nothing changes
    /// unless every counter can take the sale.
    pub fn record_sale(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        amount: Decimal,
    ) -> Result<bool, DomainError> {
        let units = u64::from(quantity);
        let revenue = self.revenue.checked_add(amount);
        let total_sales = self.total_sales.checked_add(units);
        let Some(product) = self.product_mut(product_id) else {
            return Ok(false);
        };
        let (Some(product_sales), Some(product_revenue), Some(revenue), Some(total_sales)) = (
            product.sales.checked_add(units),
            product.revenue.checked_add(amount),
            revenue,
            total_sales,
        ) else {
            return Err(DomainError::AmountOverflow);
        };
        product.sales = product_sales;
        product.revenue = product_revenue;
        self.revenue = revenue;
        self.total_sales = total_sales;
        Ok(true)
    }
}
