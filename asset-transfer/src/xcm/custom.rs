// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Caller-supplied XCM programs.
//!
//! Programs are given as JSON in the shape produced by polkadot-js: enum variants are objects
//! with a single capitalised key (or bare capitalised strings for unit variants), struct fields
//! are camelCase and numbers may be quoted with thousands separators.

use super::XcmCreator;
use crate::{Error, Junction, Location};
use serde_json::Value as Json;
use subxt::dynamic::Value;

/// Convert a polkadot-js style JSON value to a dynamic value.
pub fn json_to_value(json: &Json) -> Result<Value, Error> {
	Ok(match json {
		Json::Null => Value::unnamed_composite([]),
		Json::Bool(b) => Value::bool(*b),
		Json::Number(n) =>
			if let Some(n) = n.as_u64() {
				Value::u128(n as u128)
			} else if let Some(n) = n.as_i64() {
				Value::i128(n as i128)
			} else {
				return Err(Error::InvalidInput(format!("fractional number {n} in XCM")))
			},
		Json::String(s) => string_to_value(s)?,
		Json::Array(items) => {
			let items = items.iter().map(json_to_value).collect::<Result<Vec<_>, _>>()?;
			Value::unnamed_composite(items)
		},
		Json::Object(map) => match single_variant(map) {
			Some((name, inner)) => variant_value(name, inner)?,
			None => Value::named_composite(
				map.iter()
					.map(|(key, value)| Ok((snake_case(key), json_to_value(value)?)))
					.collect::<Result<Vec<_>, Error>>()?,
			),
		},
	})
}

fn string_to_value(s: &str) -> Result<Value, Error> {
	if let Some(stripped) = s.strip_prefix("0x") {
		let bytes = hex::decode(stripped)
			.map_err(|err| Error::InvalidInput(format!("invalid hex `{s}` in XCM: {err}")))?;
		return Ok(Value::from_bytes(bytes))
	}
	let digits: String = s.chars().filter(|c| *c != ',').collect();
	if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
		return digits
			.parse::<u128>()
			.map(Value::u128)
			.map_err(|err| Error::InvalidInput(format!("number `{s}` in XCM: {err}")))
	}
	if is_variant_name(s) {
		return Ok(Value::unnamed_variant(s, []))
	}
	Ok(Value::string(s))
}

fn is_variant_name(s: &str) -> bool {
	s.starts_with(|c: char| c.is_ascii_uppercase()) && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn single_variant(map: &serde_json::Map<String, Json>) -> Option<(&str, &Json)> {
	let mut entries = map.iter();
	match (entries.next(), entries.next()) {
		(Some((key, value)), None) if is_variant_name(key) => Some((key.as_str(), value)),
		_ => None,
	}
}

fn variant_value(name: &str, inner: &Json) -> Result<Value, Error> {
	Ok(match inner {
		Json::Null => Value::unnamed_variant(name, []),
		Json::Array(items) => Value::unnamed_variant(
			name,
			items.iter().map(json_to_value).collect::<Result<Vec<_>, _>>()?,
		),
		Json::Object(map) if single_variant(map).is_none() => Value::named_variant(
			name,
			map.iter()
				.map(|(key, value)| Ok((snake_case(key), json_to_value(value)?)))
				.collect::<Result<Vec<_>, Error>>()?,
		),
		other => Value::unnamed_variant(name, [json_to_value(other)?]),
	})
}

fn snake_case(key: &str) -> String {
	let mut out = String::with_capacity(key.len() + 4);
	for c in key.chars() {
		if c.is_ascii_uppercase() {
			if !out.is_empty() {
				out.push('_');
			}
			out.push(c.to_ascii_lowercase());
		} else {
			out.push(c);
		}
	}
	out
}

/// Wrap instructions into a `VersionedXcm` of the creator's version.
pub fn versioned_xcm(creator: &dyn XcmCreator, instructions: Vec<Value>) -> Value {
	creator.versioned(Value::unnamed_composite([Value::unnamed_composite(instructions)]))
}

/// `DepositAsset` of all `count` transferred assets to `beneficiary` on the destination.
pub fn deposit_all_counted(
	creator: &dyn XcmCreator,
	count: u32,
	beneficiary: &Junction,
) -> Result<Value, Error> {
	let assets = Value::unnamed_variant(
		"Wild",
		[Value::unnamed_variant("AllCounted", [Value::u128(count as u128)])],
	);
	let beneficiary = creator.location_value(&Location::new(0, vec![*beneficiary]))?;
	Ok(Value::named_variant("DepositAsset", [("assets", assets), ("beneficiary", beneficiary)]))
}
