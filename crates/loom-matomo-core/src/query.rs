// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query string assembly.
//!
//! A request becomes `key=value&...` in a fixed order:
//!
//! 1. `idsite` (request value, else the default site id)
//! 2. `token_auth` (the resolved token, if any)
//! 3. the leading parameter table
//! 4. additional parameters, in insertion order
//! 5. `dimension{n}` parameters, in insertion order
//! 6. `send_image`, `rand`
//!
//! In the wire style keys and values are form-encoded (space becomes `+`);
//! the readable style writes them verbatim. Every present value is checked
//! against its rule first; the first failure aborts assembly.

use tracing::trace;
use url::form_urlencoded::Serializer;

use crate::bulk::BulkRequest;
use crate::error::{MatomoError, Result};
use crate::parameters::{
	TrackingParameter, AUTH_TOKEN, AUTH_TOKEN_RULE, LEADING_PARAMETERS, SITE_ID, SITE_ID_RULE,
	TRAILING_PARAMETERS,
};
use crate::request::TrackingRequest;
use crate::validation::FieldRule;
use crate::value::ParamValue;

/// How multi-valued additional parameters are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryStyle {
	/// One `key=value` pair per value, as the tracking endpoint expects.
	#[default]
	Wire,
	/// Unencoded pairs with a single `key=[v1, v2]` per multi-valued key, for
	/// logs and debugging output. Not safe to send.
	Readable,
}

/// Builds query strings and bulk bodies for tracking requests.
#[derive(Debug, Clone, Default)]
pub struct QueryCreator {
	default_site_id: Option<u32>,
	style: QueryStyle,
}

impl QueryCreator {
	pub fn new(default_site_id: Option<u32>) -> Self {
		Self {
			default_site_id,
			style: QueryStyle::Wire,
		}
	}

	pub fn with_style(mut self, style: QueryStyle) -> Self {
		self.style = style;
		self
	}

	pub fn style(&self) -> QueryStyle {
		self.style
	}

	/// Encodes one request. `auth_token` is the already resolved token.
	pub fn create_query(&self, request: &TrackingRequest, auth_token: Option<&str>) -> Result<String> {
		let mut query = QueryBuilder::new(self.style);

		if let Some(site_id) = request.site_id.or(self.default_site_id) {
			query.append(SITE_ID, &SITE_ID_RULE, ParamValue::Integer(i64::from(site_id)))?;
		}
		if let Some(token) = auth_token {
			query.append(AUTH_TOKEN, &AUTH_TOKEN_RULE, ParamValue::Text(token.to_string()))?;
		}

		query.append_table(LEADING_PARAMETERS, request)?;

		for (key, values) in &request.additional_parameters {
			match (self.style, values.as_slice()) {
				(_, []) => {}
				(_, [single]) => query.append_raw(key, single),
				(QueryStyle::Wire, many) => {
					for value in many {
						query.append_raw(key, value);
					}
				}
				(QueryStyle::Readable, many) => query.append_raw(key, &format!("[{}]", many.join(", "))),
			}
		}

		for (index, value) in &request.dimensions {
			query.append_raw(&format!("dimension{index}"), value);
		}

		query.append_table(TRAILING_PARAMETERS, request)?;

		Ok(query.finish())
	}

	/// Encodes each request for the bulk path. The token travels in the
	/// envelope, so none of the individual queries carries one.
	pub fn create_queries<'a, I>(&self, requests: I) -> Result<Vec<String>>
	where
		I: IntoIterator<Item = &'a TrackingRequest>,
	{
		requests
			.into_iter()
			.map(|request| self.create_query(request, None))
			.collect()
	}

	/// Encodes requests into the bulk JSON body.
	pub fn create_bulk_body<'a, I>(&self, requests: I, auth_token: Option<&str>) -> Result<String>
	where
		I: IntoIterator<Item = &'a TrackingRequest>,
	{
		let queries = self.create_queries(requests)?;
		BulkRequest::new(queries, auth_token)?.to_json()
	}
}

enum QueryOutput {
	Encoded(Serializer<'static, String>),
	Verbatim(String),
}

struct QueryBuilder {
	output: QueryOutput,
	count: usize,
}

impl QueryBuilder {
	fn new(style: QueryStyle) -> Self {
		let output = match style {
			QueryStyle::Wire => QueryOutput::Encoded(Serializer::new(String::new())),
			QueryStyle::Readable => QueryOutput::Verbatim(String::new()),
		};
		Self { output, count: 0 }
	}

	fn append(&mut self, name: &str, rule: &FieldRule, value: ParamValue) -> Result<()> {
		rule
			.validate(name, &value)
			.map_err(|source| MatomoError::Encoding {
				parameter: name.to_string(),
				source,
			})?;
		self.append_raw(name, &value.render());
		Ok(())
	}

	fn append_raw(&mut self, name: &str, value: &str) {
		match &mut self.output {
			QueryOutput::Encoded(serializer) => {
				serializer.append_pair(name, value);
			}
			QueryOutput::Verbatim(query) => {
				if !query.is_empty() {
					query.push('&');
				}
				query.push_str(name);
				query.push('=');
				query.push_str(value);
			}
		}
		self.count += 1;
	}

	fn append_table(&mut self, table: &[TrackingParameter], request: &TrackingRequest) -> Result<()> {
		for parameter in table {
			if let Some(value) = (parameter.value)(request) {
				self.append(parameter.name, &parameter.rule, value)?;
			}
		}
		Ok(())
	}

	fn finish(mut self) -> String {
		trace!(parameters = self.count, "assembled tracking query");
		match &mut self.output {
			QueryOutput::Encoded(serializer) => serializer.finish(),
			QueryOutput::Verbatim(query) => std::mem::take(query),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::custom_variable::CustomVariable;
	use crate::random_value::RandomValue;
	use crate::visitor_id::VisitorId;

	fn minimal() -> crate::request::TrackingRequestBuilder {
		TrackingRequest::builder()
			.visitor_id(VisitorId::from_hash(1234567890123456789))
			.random_value(RandomValue::from_literal("random-value"))
	}

	#[test]
	fn default_site_id_and_token_lead() {
		let query = QueryCreator::new(Some(42))
			.create_query(&minimal().build(), Some("876de1876fb2cda2816c362a61bfc712"))
			.unwrap();
		assert_eq!(
			query,
			"idsite=42&token_auth=876de1876fb2cda2816c362a61bfc712&rec=1&apiv=1&_id=112210f47de98115&send_image=0&rand=random-value"
		);
	}

	#[test]
	fn request_site_id_wins_over_default() {
		let query = QueryCreator::new(Some(42))
			.create_query(&minimal().site_id(7).build(), None)
			.unwrap();
		assert!(query.starts_with("idsite=7&rec=1"));
	}

	#[test]
	fn no_site_id_at_all() {
		let query = QueryCreator::new(None).create_query(&minimal().build(), None).unwrap();
		assert!(query.starts_with("rec=1&"));
	}

	#[test]
	fn spaces_become_plus() {
		let query = QueryCreator::new(Some(1))
			.create_query(&minimal().action_name("Hello World & more").build(), None)
			.unwrap();
		assert!(query.contains("&action_name=Hello+World+%26+more&"));
	}

	#[test]
	fn empty_string_is_emitted() {
		let query = QueryCreator::new(Some(1))
			.create_query(&minimal().action_name("").build(), None)
			.unwrap();
		assert!(query.contains("&action_name=&"));
	}

	#[test]
	fn zero_is_emitted() {
		let query = QueryCreator::new(Some(1))
			.create_query(&minimal().current_hour(0).build(), None)
			.unwrap();
		assert!(query.contains("&h=0&"));
	}

	#[test]
	fn hour_out_of_range_aborts() {
		let err = QueryCreator::new(Some(1))
			.create_query(&minimal().current_hour(24).build(), None)
			.unwrap_err();
		assert_eq!(
			err.field_error().unwrap().to_string(),
			"Invalid value for h. Must be less or equal than 23"
		);
		assert!(err.to_string().starts_with("Could not append parameter h"));
	}

	#[test]
	fn zero_site_id_fails() {
		let err = QueryCreator::new(None)
			.create_query(&minimal().site_id(0).build(), None)
			.unwrap_err();
		assert_eq!(
			err.field_error().unwrap().to_string(),
			"Invalid value for idsite. Must be greater or equal than 1"
		);
	}

	#[test]
	fn malformed_token_fails() {
		let err = QueryCreator::new(Some(1))
			.create_query(&minimal().build(), Some("short"))
			.unwrap_err();
		assert_eq!(err.field_error().unwrap().field, "token_auth");
	}

	#[test]
	fn additional_parameters_wire_style_repeats_key() {
		let request = minimal()
			.additional_parameter("tag", "a b")
			.additional_parameter("tag", "c")
			.additional_parameter("single", 1)
			.build();
		let query = QueryCreator::new(Some(1)).create_query(&request, None).unwrap();
		assert!(query.contains("&tag=a+b&tag=c&single=1&send_image=0"));
	}

	#[test]
	fn additional_parameters_readable_style_brackets_values() {
		let request = minimal()
			.additional_parameter("tag", "a")
			.additional_parameter("tag", "b")
			.additional_parameter("single", 1)
			.build();
		let creator = QueryCreator::new(Some(1)).with_style(QueryStyle::Readable);
		let query = creator.create_query(&request, None).unwrap();
		assert!(query.contains("&tag=[a, b]&single=1&"), "query: {query}");
	}

	#[test]
	fn readable_style_is_not_percent_encoded() {
		let request = minimal()
			.action_name("Hello World")
			.additional_parameter("key", "v1")
			.additional_parameter("key", "v2")
			.build();
		let query = QueryCreator::new(Some(1))
			.with_style(QueryStyle::Readable)
			.create_query(&request, None)
			.unwrap();
		assert_eq!(
			query,
			"idsite=1&rec=1&apiv=1&action_name=Hello World&_id=112210f47de98115&key=[v1, v2]&send_image=0&rand=random-value"
		);
	}

	#[test]
	fn dimensions_follow_insertion_order() {
		let request = minimal()
			.dimension(3, "three")
			.unwrap()
			.dimension(1, "one")
			.unwrap()
			.build();
		let query = QueryCreator::new(Some(1)).create_query(&request, None).unwrap();
		assert!(query.contains("&dimension3=three&dimension1=one&send_image=0&rand=random-value"));
	}

	#[test]
	fn custom_variables_are_json_encoded() {
		let request = minimal()
			.page_custom_variable(CustomVariable::new("a", "b").unwrap())
			.build();
		let query = QueryCreator::new(Some(1)).create_query(&request, None).unwrap();
		assert!(query.contains("&cvar=%7B%221%22%3A%5B%22a%22%2C%22b%22%5D%7D&"));
	}

	#[test]
	fn bulk_queries_carry_no_token() {
		let requests = vec![minimal().build(), minimal().site_id(2).build()];
		let body = QueryCreator::new(Some(1))
			.create_bulk_body(&requests, Some("876de1876fb2cda2816c362a61bfc712"))
			.unwrap();
		assert_eq!(
			body,
			"{\"requests\":[\"?idsite=1&rec=1&apiv=1&_id=112210f47de98115&send_image=0&rand=random-value\",\
			\"?idsite=2&rec=1&apiv=1&_id=112210f47de98115&send_image=0&rand=random-value\"],\
			\"token_auth\":\"876de1876fb2cda2816c362a61bfc712\"}"
		);
	}

	#[test]
	fn bulk_with_no_requests_fails() {
		let err = QueryCreator::new(Some(1))
			.create_bulk_body(&Vec::<TrackingRequest>::new(), None)
			.unwrap_err();
		assert!(matches!(err, MatomoError::EmptyBulkRequest));
	}
}
