// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The tracking request: one analytics event destined for `matomo.php`.
//!
//! Every field is optional. Parameter names are noted on each field; see the
//! Matomo Tracking HTTP API reference for their meaning.

use chrono::{DateTime, Utc};

use crate::accept_language::AcceptLanguage;
use crate::country::Country;
use crate::custom_variable::{CustomVariable, CustomVariables, CustomVariablesBuilder};
use crate::device_resolution::DeviceResolution;
use crate::ecommerce::{EcommerceItem, EcommerceItems, EcommerceItemsBuilder};
use crate::error::{MatomoError, Result};
use crate::random_value::RandomValue;
use crate::unique_id::UniqueId;
use crate::visitor_id::VisitorId;

/// An immutable tracking request. Built through [`TrackingRequest::builder`];
/// use [`TrackingRequest::to_builder`] to derive a modified copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingRequest {
	// Identity
	/// `rec`
	pub(crate) required: Option<bool>,
	/// `idsite`
	pub(crate) site_id: Option<u32>,
	/// `token_auth`. Used as a candidate during token resolution, never emitted directly.
	pub(crate) auth_token: Option<String>,
	/// `apiv`
	pub(crate) api_version: Option<String>,

	// Action
	/// `action_name`
	pub(crate) action_name: Option<String>,
	/// `url`
	pub(crate) action_url: Option<String>,
	/// `urlref`
	pub(crate) referrer_url: Option<String>,

	// Visitor
	/// `_id`
	pub(crate) visitor_id: Option<VisitorId>,
	/// `_cvar`
	pub(crate) visit_custom_variables: Option<CustomVariables>,
	/// `_idvc`
	pub(crate) visitor_visit_count: Option<u32>,
	/// `_viewts`
	pub(crate) visitor_previous_visit_timestamp: Option<DateTime<Utc>>,
	/// `_idts`
	pub(crate) visitor_first_visit_timestamp: Option<DateTime<Utc>>,
	/// `_rcn`
	pub(crate) campaign_name: Option<String>,
	/// `_rck`
	pub(crate) campaign_keyword: Option<String>,

	// Device and environment
	pub(crate) device_resolution: Option<DeviceResolution>,
	pub(crate) current_hour: Option<u32>,
	pub(crate) current_minute: Option<u32>,
	pub(crate) current_second: Option<u32>,
	pub(crate) plugin_flash: Option<bool>,
	pub(crate) plugin_java: Option<bool>,
	pub(crate) plugin_quicktime: Option<bool>,
	pub(crate) plugin_real_player: Option<bool>,
	pub(crate) plugin_pdf: Option<bool>,
	pub(crate) plugin_windows_media: Option<bool>,
	pub(crate) plugin_silverlight: Option<bool>,
	pub(crate) supports_cookies: Option<bool>,
	/// `ua`
	pub(crate) header_user_agent: Option<String>,
	/// `uadata`, client hints as JSON
	pub(crate) client_hints: Option<String>,
	/// `lang`
	pub(crate) header_accept_language: Option<AcceptLanguage>,
	/// `uid`
	pub(crate) user_id: Option<String>,
	/// `cid`
	pub(crate) forced_visitor_id: Option<VisitorId>,
	pub(crate) new_visit: Option<bool>,

	// Page
	/// `cvar`
	pub(crate) page_custom_variables: Option<CustomVariables>,
	/// `link`
	pub(crate) outlink_url: Option<String>,
	/// `download`
	pub(crate) download_url: Option<String>,
	pub(crate) search_query: Option<String>,
	pub(crate) search_category: Option<String>,
	pub(crate) search_results_count: Option<i64>,
	/// `pv_id`
	pub(crate) page_view_id: Option<UniqueId>,
	/// `idgoal`
	pub(crate) goal_id: Option<u32>,
	/// `revenue`
	pub(crate) ecommerce_revenue: Option<f64>,
	/// `gt_ms`
	pub(crate) page_generation_time: Option<i64>,
	/// `ca`
	pub(crate) custom_action: Option<bool>,

	// Performance timings, in milliseconds
	pub(crate) network_time: Option<i64>,
	pub(crate) server_time: Option<i64>,
	pub(crate) transfer_time: Option<i64>,
	pub(crate) dom_processing_time: Option<i64>,
	pub(crate) dom_completion_time: Option<i64>,
	pub(crate) onload_time: Option<i64>,

	// Events
	pub(crate) event_category: Option<String>,
	pub(crate) event_action: Option<String>,
	pub(crate) event_name: Option<String>,
	pub(crate) event_value: Option<f64>,

	// Content
	pub(crate) content_name: Option<String>,
	pub(crate) content_piece: Option<String>,
	pub(crate) content_target: Option<String>,
	pub(crate) content_interaction: Option<String>,

	// Ecommerce
	pub(crate) ecommerce_id: Option<String>,
	pub(crate) ecommerce_items: Option<EcommerceItems>,
	pub(crate) ecommerce_subtotal: Option<f64>,
	pub(crate) ecommerce_tax: Option<f64>,
	pub(crate) ecommerce_shipping_cost: Option<f64>,
	pub(crate) ecommerce_discount: Option<f64>,
	/// `_ects`
	pub(crate) ecommerce_last_order_timestamp: Option<DateTime<Utc>>,

	// Privileged fields; these require an auth token
	/// `cip`
	pub(crate) visitor_ip: Option<String>,
	/// `cdt`
	pub(crate) request_timestamp: Option<DateTime<Utc>>,
	pub(crate) visitor_country: Option<Country>,
	pub(crate) visitor_region: Option<String>,
	pub(crate) visitor_city: Option<String>,
	pub(crate) visitor_latitude: Option<f64>,
	pub(crate) visitor_longitude: Option<f64>,

	// Flags
	pub(crate) ping: Option<bool>,
	/// `bots`
	pub(crate) track_bot_requests: Option<bool>,
	pub(crate) debug: Option<bool>,

	// Trailing
	/// `cs`
	pub(crate) character_set: Option<String>,
	/// Free-form parameters, in insertion order. A key may carry several values.
	pub(crate) additional_parameters: Vec<(String, Vec<String>)>,
	/// `dimension{index}` parameters, in insertion order.
	pub(crate) dimensions: Vec<(u32, String)>,
	/// `send_image`
	pub(crate) response_as_image: Option<bool>,
	/// `rand`
	pub(crate) random_value: Option<RandomValue>,
}

impl TrackingRequest {
	/// Starts a request with the protocol defaults applied.
	pub fn builder() -> TrackingRequestBuilder {
		TrackingRequestBuilder::new()
	}

	/// Returns a builder seeded with this request, for producing a modified copy.
	pub fn to_builder(&self) -> TrackingRequestBuilder {
		let mut request = self.clone();
		let visit_variables = request
			.visit_custom_variables
			.take()
			.map(|vars| vars.to_builder())
			.unwrap_or_default();
		let page_variables = request
			.page_custom_variables
			.take()
			.map(|vars| vars.to_builder())
			.unwrap_or_default();
		let ecommerce_items = request.ecommerce_items.take().map(|items| {
			let mut builder = EcommerceItems::builder();
			for item in items.iter() {
				builder.add(item.clone());
			}
			builder
		});
		TrackingRequestBuilder {
			request,
			visit_variables,
			page_variables,
			ecommerce_items: ecommerce_items.unwrap_or_default(),
		}
	}

	pub fn site_id(&self) -> Option<u32> {
		self.site_id
	}

	pub fn auth_token(&self) -> Option<&str> {
		self.auth_token.as_deref()
	}

	pub fn visitor_id(&self) -> Option<&VisitorId> {
		self.visitor_id.as_ref()
	}

	pub fn action_name(&self) -> Option<&str> {
		self.action_name.as_deref()
	}

	pub fn action_url(&self) -> Option<&str> {
		self.action_url.as_deref()
	}

	pub fn request_timestamp(&self) -> Option<DateTime<Utc>> {
		self.request_timestamp
	}

	/// Free-form parameters grouped by key, in insertion order.
	pub fn additional_parameters(&self) -> &[(String, Vec<String>)] {
		&self.additional_parameters
	}

	/// `(index, value)` pairs in insertion order.
	pub fn dimensions(&self) -> &[(u32, String)] {
		&self.dimensions
	}

	/// Any of the geolocation or IP override fields is set.
	pub fn has_visitor_location(&self) -> bool {
		self.visitor_longitude.is_some()
			|| self.visitor_latitude.is_some()
			|| self.visitor_region.is_some()
			|| self.visitor_city.is_some()
			|| self.visitor_country.is_some()
			|| self.visitor_ip.is_some()
	}
}

macro_rules! text_setters {
	($($field:ident),* $(,)?) => {
		$(
			pub fn $field(mut self, value: impl Into<String>) -> Self {
				self.request.$field = Some(value.into());
				self
			}
		)*
	};
}

macro_rules! value_setters {
	($($field:ident: $ty:ty),* $(,)?) => {
		$(
			pub fn $field(mut self, value: $ty) -> Self {
				self.request.$field = Some(value);
				self
			}
		)*
	};
}

/// Accumulates a [`TrackingRequest`]. Custom variables and ecommerce items are
/// collected here and frozen by [`TrackingRequestBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct TrackingRequestBuilder {
	request: TrackingRequest,
	visit_variables: CustomVariablesBuilder,
	page_variables: CustomVariablesBuilder,
	ecommerce_items: EcommerceItemsBuilder,
}

impl TrackingRequestBuilder {
	/// `rec=1`, `apiv=1`, `send_image=0`, a random visitor id and a random `rand`.
	pub fn new() -> Self {
		Self {
			request: TrackingRequest {
				required: Some(true),
				api_version: Some("1".to_string()),
				visitor_id: Some(VisitorId::random()),
				response_as_image: Some(false),
				random_value: Some(RandomValue::random()),
				..TrackingRequest::default()
			},
			..Self::default()
		}
	}

	text_setters!(
		auth_token,
		api_version,
		action_name,
		action_url,
		referrer_url,
		campaign_name,
		campaign_keyword,
		header_user_agent,
		client_hints,
		user_id,
		outlink_url,
		download_url,
		search_query,
		search_category,
		event_category,
		event_action,
		event_name,
		content_name,
		content_piece,
		content_target,
		content_interaction,
		ecommerce_id,
		visitor_ip,
		visitor_region,
		visitor_city,
		character_set,
	);

	value_setters!(
		required: bool,
		site_id: u32,
		visitor_id: VisitorId,
		visitor_visit_count: u32,
		visitor_previous_visit_timestamp: DateTime<Utc>,
		visitor_first_visit_timestamp: DateTime<Utc>,
		device_resolution: DeviceResolution,
		current_hour: u32,
		current_minute: u32,
		current_second: u32,
		plugin_flash: bool,
		plugin_java: bool,
		plugin_quicktime: bool,
		plugin_real_player: bool,
		plugin_pdf: bool,
		plugin_windows_media: bool,
		plugin_silverlight: bool,
		supports_cookies: bool,
		header_accept_language: AcceptLanguage,
		forced_visitor_id: VisitorId,
		new_visit: bool,
		search_results_count: i64,
		page_view_id: UniqueId,
		goal_id: u32,
		ecommerce_revenue: f64,
		page_generation_time: i64,
		custom_action: bool,
		network_time: i64,
		server_time: i64,
		transfer_time: i64,
		dom_processing_time: i64,
		dom_completion_time: i64,
		onload_time: i64,
		event_value: f64,
		ecommerce_subtotal: f64,
		ecommerce_tax: f64,
		ecommerce_shipping_cost: f64,
		ecommerce_discount: f64,
		ecommerce_last_order_timestamp: DateTime<Utc>,
		request_timestamp: DateTime<Utc>,
		visitor_country: Country,
		visitor_latitude: f64,
		visitor_longitude: f64,
		ping: bool,
		track_bot_requests: bool,
		debug: bool,
		response_as_image: bool,
		random_value: RandomValue,
	);

	/// Clears an optional field set by the defaults, e.g. the random visitor id.
	pub fn without_visitor_id(mut self) -> Self {
		self.request.visitor_id = None;
		self
	}

	pub fn without_random_value(mut self) -> Self {
		self.request.random_value = None;
		self
	}

	/// Adds a visit-scoped custom variable in the lowest free slot.
	pub fn visit_custom_variable(mut self, variable: CustomVariable) -> Self {
		self.visit_variables.add(variable);
		self
	}

	pub fn visit_custom_variable_at(mut self, variable: CustomVariable, slot: u32) -> Result<Self> {
		self.visit_variables.add_at(variable, slot)?;
		Ok(self)
	}

	/// Replaces all visit-scoped custom variables.
	pub fn visit_custom_variables(mut self, variables: CustomVariables) -> Self {
		self.visit_variables = variables.to_builder();
		self
	}

	/// Adds a page-scoped custom variable in the lowest free slot.
	pub fn page_custom_variable(mut self, variable: CustomVariable) -> Self {
		self.page_variables.add(variable);
		self
	}

	pub fn page_custom_variable_at(mut self, variable: CustomVariable, slot: u32) -> Result<Self> {
		self.page_variables.add_at(variable, slot)?;
		Ok(self)
	}

	/// Replaces all page-scoped custom variables.
	pub fn page_custom_variables(mut self, variables: CustomVariables) -> Self {
		self.page_variables = variables.to_builder();
		self
	}

	pub fn ecommerce_item(mut self, item: EcommerceItem) -> Self {
		self.ecommerce_items.add(item);
		self
	}

	/// Appends a value to a free-form parameter. Repeated calls with the same
	/// key produce a multi-valued parameter.
	pub fn additional_parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		let key = key.into();
		let value = value.to_string();
		match self
			.request
			.additional_parameters
			.iter_mut()
			.find(|(existing, _)| *existing == key)
		{
			Some((_, values)) => values.push(value),
			None => self.request.additional_parameters.push((key, vec![value])),
		}
		self
	}

	/// Sets `dimension{index}`, replacing an earlier value for the same index.
	/// Indexes start at 1.
	pub fn dimension(mut self, index: u32, value: impl ToString) -> Result<Self> {
		if index == 0 {
			return Err(MatomoError::invalid_argument(
				"Dimension index must be greater than or equal to 1",
			));
		}
		let value = value.to_string();
		match self
			.request
			.dimensions
			.iter_mut()
			.find(|(existing, _)| *existing == index)
		{
			Some((_, existing)) => *existing = value,
			None => self.request.dimensions.push((index, value)),
		}
		Ok(self)
	}

	/// Freezes the request.
	pub fn build(self) -> TrackingRequest {
		let mut request = self.request;
		if !self.visit_variables.is_empty() {
			request.visit_custom_variables = Some(self.visit_variables.build());
		}
		if !self.page_variables.is_empty() {
			request.page_custom_variables = Some(self.page_variables.build());
		}
		let items = self.ecommerce_items.build();
		if !items.is_empty() {
			request.ecommerce_items = Some(items);
		}
		request
	}
}
