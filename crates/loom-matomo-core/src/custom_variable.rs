// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Custom variables (`_cvar` and `cvar`).
//!
//! Custom variables live in numbered slots starting at 1. On the wire they are
//! a JSON object keyed by slot number whose values are `[key, value]` pairs:
//!
//! ```text
//! {"1":["plan","enterprise"],"3":["role","admin"]}
//! ```
//!
//! Slots keep insertion order and are never compacted. The same JSON shape is
//! used by the `_pk_cvar` cookie family, so [`CustomVariables::parse`] is
//! deliberately tolerant of malformed input.

use std::iter::Peekable;
use std::str::Chars;

use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};

use crate::error::{MatomoError, Result};

/// A single key/value annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomVariable {
	key: String,
	value: String,
}

impl CustomVariable {
	/// Creates a custom variable. Both key and value must be non-empty.
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
		let key = key.into();
		let value = value.into();
		if key.is_empty() {
			return Err(MatomoError::invalid_argument(
				"Custom variable key must not be empty",
			));
		}
		if value.is_empty() {
			return Err(MatomoError::invalid_argument(
				"Custom variable value must not be empty",
			));
		}
		Ok(Self { key, value })
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn value(&self) -> &str {
		&self.value
	}
}

impl Serialize for CustomVariable {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut pair = serializer.serialize_tuple(2)?;
		pair.serialize_element(&self.key)?;
		pair.serialize_element(&self.value)?;
		pair.end()
	}
}

/// Immutable slot → variable mapping, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomVariables {
	entries: Vec<(u32, CustomVariable)>,
}

impl CustomVariables {
	pub fn builder() -> CustomVariablesBuilder {
		CustomVariablesBuilder::default()
	}

	/// Returns a builder seeded with these variables.
	pub fn to_builder(&self) -> CustomVariablesBuilder {
		CustomVariablesBuilder {
			entries: self.entries.clone(),
		}
	}

	pub fn get(&self, slot: u32) -> Option<&CustomVariable> {
		self
			.entries
			.iter()
			.find(|(s, _)| *s == slot)
			.map(|(_, var)| var)
	}

	/// Returns the value of the first variable with `key`, in insertion order.
	pub fn get_value(&self, key: &str) -> Option<&str> {
		self
			.entries
			.iter()
			.find(|(_, var)| var.key == key)
			.map(|(_, var)| var.value.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (u32, &CustomVariable)> {
		self.entries.iter().map(|(slot, var)| (*slot, var))
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Renders the JSON object used as the query parameter value.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Parses the JSON object form on a best-effort basis.
	///
	/// Entries with a missing slot, a slot of 0, or fewer than two strings are
	/// skipped. An entry is committed whenever a comma separates it from the
	/// next one, and once more at end of input.
	pub fn parse(input: &str) -> Self {
		let mut builder = CustomVariablesBuilder::default();
		let mut slot: Option<u32> = None;
		let mut strings: Vec<String> = Vec::new();
		let mut in_pair = false;
		let mut chars = input.chars().peekable();

		while let Some(c) = chars.next() {
			match c {
				'"' => {
					let token = read_quoted(&mut chars);
					if in_pair {
						strings.push(token);
					} else {
						slot = token.trim().parse().ok();
					}
				}
				'0'..='9' if !in_pair => {
					let mut digits = String::from(c);
					while let Some(d) = chars.next_if(char::is_ascii_digit) {
						digits.push(d);
					}
					slot = digits.parse().ok();
				}
				'[' => in_pair = true,
				']' => in_pair = false,
				',' if !in_pair => flush_entry(&mut builder, &mut slot, &mut strings),
				'}' => flush_entry(&mut builder, &mut slot, &mut strings),
				_ => {}
			}
		}
		flush_entry(&mut builder, &mut slot, &mut strings);

		builder.build()
	}
}

impl Serialize for CustomVariables {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (slot, var) in &self.entries {
			map.serialize_entry(&slot.to_string(), var)?;
		}
		map.end()
	}
}

impl std::fmt::Display for CustomVariables {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let json = self.to_json().map_err(|_| std::fmt::Error)?;
		f.write_str(&json)
	}
}

/// Mutable accumulator for [`CustomVariables`].
#[derive(Debug, Clone, Default)]
pub struct CustomVariablesBuilder {
	entries: Vec<(u32, CustomVariable)>,
}

impl CustomVariablesBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a variable and returns its slot.
	///
	/// If a variable with the same key exists its value is replaced in place.
	/// Otherwise the lowest unused slot is taken.
	pub fn add(&mut self, variable: CustomVariable) -> u32 {
		if let Some((slot, existing)) = self
			.entries
			.iter_mut()
			.find(|(_, var)| var.key == variable.key)
		{
			existing.value = variable.value;
			return *slot;
		}

		let slot = (1..)
			.find(|candidate| !self.entries.iter().any(|(s, _)| s == candidate))
			.unwrap_or(1);
		self.entries.push((slot, variable));
		slot
	}

	/// Stores a variable at an explicit slot, replacing whatever was there.
	pub fn add_at(&mut self, variable: CustomVariable, slot: u32) -> Result<()> {
		if slot == 0 {
			return Err(MatomoError::invalid_argument(
				"Custom variable index must be greater than or equal to 1",
			));
		}
		match self.entries.iter_mut().find(|(s, _)| *s == slot) {
			Some((_, existing)) => *existing = variable,
			None => self.entries.push((slot, variable)),
		}
		Ok(())
	}

	pub fn remove(&mut self, slot: u32) -> Option<CustomVariable> {
		let position = self.entries.iter().position(|(s, _)| *s == slot)?;
		Some(self.entries.remove(position).1)
	}

	/// Removes every variable with `key`.
	pub fn remove_key(&mut self, key: &str) {
		self.entries.retain(|(_, var)| var.key != key);
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Freezes the accumulated variables.
	pub fn build(self) -> CustomVariables {
		CustomVariables {
			entries: self.entries,
		}
	}
}

fn flush_entry(builder: &mut CustomVariablesBuilder, slot: &mut Option<u32>, strings: &mut Vec<String>) {
	if let (Some(index), [key, value, ..]) = (slot.take(), strings.as_slice()) {
		if let Ok(variable) = CustomVariable::new(key.clone(), value.clone()) {
			// slot 0 is the only rejection and is simply dropped
			let _ = builder.add_at(variable, index);
		}
	}
	strings.clear();
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>) -> String {
	let mut out = String::new();
	while let Some(c) = chars.next() {
		match c {
			'"' => break,
			'\\' => match chars.next() {
				Some('n') => out.push('\n'),
				Some('t') => out.push('\t'),
				Some('r') => out.push('\r'),
				Some('b') => out.push('\u{8}'),
				Some('f') => out.push('\u{c}'),
				Some('u') => {
					let code: String = (0..4).filter_map(|_| chars.next()).collect();
					if let Some(decoded) = u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
						out.push(decoded);
					}
				}
				Some(other) => out.push(other),
				None => break,
			},
			other => out.push(other),
		}
	}
	out
}
