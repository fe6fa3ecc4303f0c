// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The tracking parameter table.
//!
//! Order in these tables is the order on the wire. `idsite` and `token_auth`
//! are emitted ahead of [`LEADING_PARAMETERS`]; additional parameters and
//! dimensions go between the leading and [`TRAILING_PARAMETERS`].

use chrono::{DateTime, Utc};

use crate::request::TrackingRequest;
use crate::validation::{FieldRule, AUTH_TOKEN_PATTERN};
use crate::value::ParamValue;

pub const SITE_ID: &str = "idsite";
pub const AUTH_TOKEN: &str = "token_auth";

pub const SITE_ID_RULE: FieldRule = FieldRule::at_least(1.0);
pub static AUTH_TOKEN_RULE: FieldRule = FieldRule::matching(&AUTH_TOKEN_PATTERN);

/// One named parameter, its rule, and how to read it from a request.
pub struct TrackingParameter {
	pub name: &'static str,
	pub rule: FieldRule,
	pub value: fn(&TrackingRequest) -> Option<ParamValue>,
}

impl std::fmt::Debug for TrackingParameter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TrackingParameter")
			.field("name", &self.name)
			.field("rule", &self.rule)
			.finish()
	}
}

const fn param(
	name: &'static str,
	value: fn(&TrackingRequest) -> Option<ParamValue>,
) -> TrackingParameter {
	TrackingParameter {
		name,
		rule: FieldRule::NONE,
		value,
	}
}

const fn ruled(
	name: &'static str,
	rule: FieldRule,
	value: fn(&TrackingRequest) -> Option<ParamValue>,
) -> TrackingParameter {
	TrackingParameter { name, rule, value }
}

fn text(value: &Option<String>) -> Option<ParamValue> {
	value.clone().map(ParamValue::Text)
}

fn encoded<T: ToString>(value: &Option<T>) -> Option<ParamValue> {
	value.as_ref().map(|v| ParamValue::Encoded(v.to_string()))
}

fn integer<T: Copy + Into<i64>>(value: Option<T>) -> Option<ParamValue> {
	value.map(|v| ParamValue::Integer(v.into()))
}

fn decimal(value: Option<f64>) -> Option<ParamValue> {
	value.map(ParamValue::Decimal)
}

fn flag(value: Option<bool>) -> Option<ParamValue> {
	value.map(ParamValue::Bool)
}

fn epoch_seconds(value: &Option<DateTime<Utc>>) -> Option<ParamValue> {
	value.map(|ts| ParamValue::Integer(ts.timestamp()))
}

pub static LEADING_PARAMETERS: &[TrackingParameter] = &[
	param("rec", |r| flag(r.required)),
	param("apiv", |r| text(&r.api_version)),
	param("action_name", |r| text(&r.action_name)),
	param("url", |r| text(&r.action_url)),
	param("_id", |r| encoded(&r.visitor_id)),
	param("urlref", |r| text(&r.referrer_url)),
	param("_cvar", |r| encoded(&r.visit_custom_variables)),
	ruled("_idvc", FieldRule::at_least(0.0), |r| integer(r.visitor_visit_count)),
	param("_viewts", |r| epoch_seconds(&r.visitor_previous_visit_timestamp)),
	param("_idts", |r| epoch_seconds(&r.visitor_first_visit_timestamp)),
	param("_rcn", |r| text(&r.campaign_name)),
	param("_rck", |r| text(&r.campaign_keyword)),
	param("res", |r| encoded(&r.device_resolution)),
	ruled("h", FieldRule::between(0.0, 23.0), |r| integer(r.current_hour)),
	ruled("m", FieldRule::between(0.0, 59.0), |r| integer(r.current_minute)),
	ruled("s", FieldRule::between(0.0, 59.0), |r| integer(r.current_second)),
	param("fla", |r| flag(r.plugin_flash)),
	param("java", |r| flag(r.plugin_java)),
	param("qt", |r| flag(r.plugin_quicktime)),
	param("realp", |r| flag(r.plugin_real_player)),
	param("pdf", |r| flag(r.plugin_pdf)),
	param("wma", |r| flag(r.plugin_windows_media)),
	param("ag", |r| flag(r.plugin_silverlight)),
	param("cookie", |r| flag(r.supports_cookies)),
	param("ua", |r| text(&r.header_user_agent)),
	param("uadata", |r| text(&r.client_hints)),
	param("lang", |r| encoded(&r.header_accept_language)),
	param("uid", |r| text(&r.user_id)),
	param("cid", |r| encoded(&r.forced_visitor_id)),
	param("new_visit", |r| flag(r.new_visit)),
	param("cvar", |r| encoded(&r.page_custom_variables)),
	param("link", |r| text(&r.outlink_url)),
	param("download", |r| text(&r.download_url)),
	param("search", |r| text(&r.search_query)),
	param("search_cat", |r| text(&r.search_category)),
	ruled("search_count", FieldRule::at_least(0.0), |r| integer(r.search_results_count)),
	param("pv_id", |r| encoded(&r.page_view_id)),
	ruled("idgoal", FieldRule::at_least(0.0), |r| integer(r.goal_id)),
	param("revenue", |r| decimal(r.ecommerce_revenue)),
	ruled("gt_ms", FieldRule::at_least(0.0), |r| integer(r.page_generation_time)),
	param("ca", |r| flag(r.custom_action)),
	ruled("pf_net", FieldRule::at_least(0.0), |r| integer(r.network_time)),
	ruled("pf_srv", FieldRule::at_least(0.0), |r| integer(r.server_time)),
	ruled("pf_tfr", FieldRule::at_least(0.0), |r| integer(r.transfer_time)),
	ruled("pf_dm1", FieldRule::at_least(0.0), |r| integer(r.dom_processing_time)),
	ruled("pf_dm2", FieldRule::at_least(0.0), |r| integer(r.dom_completion_time)),
	ruled("pf_onl", FieldRule::at_least(0.0), |r| integer(r.onload_time)),
	param("e_c", |r| text(&r.event_category)),
	param("e_a", |r| text(&r.event_action)),
	param("e_n", |r| text(&r.event_name)),
	param("e_v", |r| decimal(r.event_value)),
	param("c_n", |r| text(&r.content_name)),
	param("c_p", |r| text(&r.content_piece)),
	param("c_t", |r| text(&r.content_target)),
	param("c_i", |r| text(&r.content_interaction)),
	param("ec_id", |r| text(&r.ecommerce_id)),
	param("ec_items", |r| encoded(&r.ecommerce_items)),
	param("ec_st", |r| decimal(r.ecommerce_subtotal)),
	param("ec_tx", |r| decimal(r.ecommerce_tax)),
	param("ec_sh", |r| decimal(r.ecommerce_shipping_cost)),
	param("ec_dt", |r| decimal(r.ecommerce_discount)),
	param("_ects", |r| epoch_seconds(&r.ecommerce_last_order_timestamp)),
	param("cip", |r| text(&r.visitor_ip)),
	param("cdt", |r| epoch_seconds(&r.request_timestamp)),
	param("country", |r| encoded(&r.visitor_country)),
	ruled("region", FieldRule::max_length(2), |r| text(&r.visitor_region)),
	param("city", |r| text(&r.visitor_city)),
	ruled("lat", FieldRule::between(-90.0, 90.0), |r| decimal(r.visitor_latitude)),
	ruled("long", FieldRule::between(-180.0, 180.0), |r| decimal(r.visitor_longitude)),
	param("ping", |r| flag(r.ping)),
	param("bots", |r| flag(r.track_bot_requests)),
	param("debug", |r| flag(r.debug)),
	param("cs", |r| text(&r.character_set)),
];

pub static TRAILING_PARAMETERS: &[TrackingParameter] = &[
	param("send_image", |r| flag(r.response_as_image)),
	param("rand", |r| encoded(&r.random_value)),
];
