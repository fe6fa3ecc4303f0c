// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ecommerce line items (`ec_items`).

use serde::{Serialize, Serializer};

use crate::error::Result;

/// A purchased or carted item.
///
/// Serializes as the positional array `[sku, name, category, price, quantity]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EcommerceItem {
	pub sku: Option<String>,
	pub name: String,
	pub category: String,
	pub price: f64,
	pub quantity: u32,
}

impl EcommerceItem {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			sku: None,
			name: name.into(),
			category: String::new(),
			price: 0.0,
			quantity: 0,
		}
	}

	pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
		self.sku = Some(sku.into());
		self
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = category.into();
		self
	}

	pub fn with_price(mut self, price: f64) -> Self {
		self.price = price;
		self
	}

	pub fn with_quantity(mut self, quantity: u32) -> Self {
		self.quantity = quantity;
		self
	}
}

impl Serialize for EcommerceItem {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		(&self.sku, &self.name, &self.category, self.price, self.quantity).serialize(serializer)
	}
}

/// Ordered, immutable list of items. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EcommerceItems(Vec<EcommerceItem>);

impl EcommerceItems {
	pub fn builder() -> EcommerceItemsBuilder {
		EcommerceItemsBuilder::default()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, EcommerceItem> {
		self.0.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}

impl std::fmt::Display for EcommerceItems {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let json = self.to_json().map_err(|_| std::fmt::Error)?;
		f.write_str(&json)
	}
}

impl From<Vec<EcommerceItem>> for EcommerceItems {
	fn from(items: Vec<EcommerceItem>) -> Self {
		Self(items)
	}
}

impl FromIterator<EcommerceItem> for EcommerceItems {
	fn from_iter<I: IntoIterator<Item = EcommerceItem>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Mutable accumulator for [`EcommerceItems`].
#[derive(Debug, Clone, Default)]
pub struct EcommerceItemsBuilder {
	items: Vec<EcommerceItem>,
}

impl EcommerceItemsBuilder {
	pub fn add(&mut self, item: EcommerceItem) -> &mut Self {
		self.items.push(item);
		self
	}

	pub fn build(self) -> EcommerceItems {
		EcommerceItems(self.items)
	}
}
