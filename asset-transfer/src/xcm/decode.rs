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

//! Reading locations back out of decoded dynamic values.

use crate::{Error, Junction, Location, NetworkId};
use subxt::ext::scale_value::{Composite, Primitive, Value, ValueDef, Variant};

/// Parse a location from a decoded `Location`, `MultiLocation` or any versioned wrapper.
pub fn location_from_value<T>(value: &Value<T>) -> Result<Location, Error> {
	match &value.value {
		ValueDef::Variant(Variant { name, values }) if is_version_name(name) =>
			location_from_value(single(values)?),
		ValueDef::Composite(Composite::Named(fields)) => {
			let parents = named(fields, "parents").and_then(as_number)?;
			let interior = interior(named(fields, "interior")?)?;
			Ok(Location::new(to_u8(parents)?, interior))
		},
		ValueDef::Composite(Composite::Unnamed(values)) if values.len() == 1 =>
			location_from_value(&values[0]),
		_ => Err(malformed("location")),
	}
}

fn is_version_name(name: &str) -> bool {
	name.len() == 2 && name.starts_with('V') && name[1..].chars().all(|c| c.is_ascii_digit())
}

fn malformed(what: &str) -> Error {
	Error::Internal(format!("decoded value is not a valid {what}"))
}

fn single<T>(values: &Composite<T>) -> Result<&Value<T>, Error> {
	let mut iter = values.values();
	match (iter.next(), iter.next()) {
		(Some(value), None) => Ok(value),
		_ => Err(malformed("single field")),
	}
}

fn named<'a, T>(fields: &'a [(String, Value<T>)], name: &str) -> Result<&'a Value<T>, Error> {
	fields
		.iter()
		.find(|(key, _)| key == name)
		.map(|(_, value)| value)
		.ok_or_else(|| malformed(name))
}

fn as_number<T>(value: &Value<T>) -> Result<u128, Error> {
	match &value.value {
		ValueDef::Primitive(Primitive::U128(n)) => Ok(*n),
		ValueDef::Composite(composite) => single(composite).and_then(as_number),
		_ => Err(malformed("number")),
	}
}

fn to_u8(n: u128) -> Result<u8, Error> {
	u8::try_from(n).map_err(|_| malformed("u8"))
}

fn byte_vec<T>(value: &Value<T>) -> Result<Vec<u8>, Error> {
	let ValueDef::Composite(composite) = &value.value else { return Err(malformed("bytes")) };
	let items: Vec<&Value<T>> = composite.values().collect();
	if items.len() == 1 && matches!(items[0].value, ValueDef::Composite(_)) {
		return byte_vec(items[0])
	}
	items.into_iter().map(|v| as_number(v).and_then(to_u8)).collect()
}

fn as_bytes<T, const N: usize>(value: &Value<T>) -> Result<[u8; N], Error> {
	byte_vec(value)?.try_into().map_err(|_| malformed("fixed size bytes"))
}

fn field<'a, T>(values: &'a Composite<T>, key: &str, index: usize) -> Result<&'a Value<T>, Error> {
	match values {
		Composite::Named(fields) => named(fields, key),
		Composite::Unnamed(items) => items.get(index).ok_or_else(|| malformed(key)),
	}
}

fn interior<T>(value: &Value<T>) -> Result<Vec<Junction>, Error> {
	let ValueDef::Variant(Variant { name, values }) = &value.value else {
		return Err(malformed("interior"))
	};
	if name == "Here" {
		return Ok(vec![])
	}
	let mut items: Vec<&Value<T>> = values.values().collect();
	// v4 and later keep the junctions in one array
	if let [only] = items[..] {
		if let ValueDef::Composite(inner) = &only.value {
			items = inner.values().collect();
		}
	}
	items.into_iter().map(junction).collect()
}

fn junction<T>(value: &Value<T>) -> Result<Junction, Error> {
	let ValueDef::Variant(Variant { name, values }) = &value.value else {
		return Err(malformed("junction"))
	};
	Ok(match name.as_str() {
		"Parachain" => Junction::Parachain(
			u32::try_from(as_number(single(values)?)?).map_err(|_| malformed("para id"))?,
		),
		"AccountId32" => Junction::AccountId32 {
			network: optional_network(field(values, "network", 0)?)?,
			id: as_bytes(field(values, "id", 1)?)?,
		},
		"AccountIndex64" => Junction::AccountIndex64 {
			network: optional_network(field(values, "network", 0)?)?,
			index: u64::try_from(as_number(field(values, "index", 1)?)?)
				.map_err(|_| malformed("index"))?,
		},
		"AccountKey20" => Junction::AccountKey20 {
			network: optional_network(field(values, "network", 0)?)?,
			key: as_bytes(field(values, "key", 1)?)?,
		},
		"PalletInstance" => Junction::PalletInstance(to_u8(as_number(single(values)?)?)?),
		"GeneralIndex" => Junction::GeneralIndex(as_number(single(values)?)?),
		"GeneralKey" => match values {
			Composite::Unnamed(_) => Junction::general_key(&byte_vec(single(values)?)?)?,
			Composite::Named(_) => Junction::GeneralKey {
				length: to_u8(as_number(field(values, "length", 0)?)?)?,
				data: as_bytes(field(values, "data", 1)?)?,
			},
		},
		"OnlyChild" => Junction::OnlyChild,
		"GlobalConsensus" => Junction::GlobalConsensus(network(single(values)?)?),
		other => return Err(Error::Internal(format!("unsupported junction `{other}`"))),
	})
}

fn optional_network<T>(value: &Value<T>) -> Result<Option<NetworkId>, Error> {
	match &value.value {
		ValueDef::Variant(Variant { name, .. }) if name == "None" || name == "Any" => Ok(None),
		ValueDef::Variant(Variant { name, values }) if name == "Some" =>
			network(single(values)?).map(Some),
		_ => network(value).map(Some),
	}
}

fn network<T>(value: &Value<T>) -> Result<NetworkId, Error> {
	let ValueDef::Variant(Variant { name, values }) = &value.value else {
		return Err(malformed("network id"))
	};
	Ok(match name.as_str() {
		"ByGenesis" => NetworkId::ByGenesis(as_bytes(single(values)?)?),
		"ByFork" => NetworkId::ByFork {
			block_number: u64::try_from(as_number(field(values, "block_number", 0)?)?)
				.map_err(|_| malformed("block number"))?,
			block_hash: as_bytes(field(values, "block_hash", 1)?)?,
		},
		"Polkadot" => NetworkId::Polkadot,
		"Kusama" => NetworkId::Kusama,
		"Westend" => NetworkId::Westend,
		"Rococo" => NetworkId::Rococo,
		"Wococo" => NetworkId::Wococo,
		"Ethereum" => NetworkId::Ethereum {
			chain_id: u64::try_from(as_number(field(values, "chain_id", 0)?)?)
				.map_err(|_| malformed("chain id"))?,
		},
		"BitcoinCore" => NetworkId::BitcoinCore,
		"BitcoinCash" => NetworkId::BitcoinCash,
		"PolkadotBulletin" => NetworkId::PolkadotBulletin,
		other => return Err(Error::UnknownConsensusSystem(other.to_string())),
	})
}
