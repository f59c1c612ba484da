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

//! Version independent representation of XCM locations.
//!
//! A [`Location`] is a number of parents followed by up to [`MAX_JUNCTIONS`] interior
//! junctions. Locations are ordered the way the XCM format orders them: by parents, then by
//! the number of junctions, then junction by junction. Asset lists rely on this ordering.
//!
//! Locations arrive as JSON from many sources (the registry, callers, older tooling), so the
//! parser here accepts every shape those sources produce. [`Location::to_json`] renders the
//! canonical form.

use crate::Error;
use codec::{Decode, Encode, Input, Output};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as Json};
use std::{cmp::Ordering, fmt, str::FromStr};
use xcm_asset_registry::Relay;

/// Maximum number of interior junctions.
pub const MAX_JUNCTIONS: usize = 8;

/// Genesis hash of the Westend relay chain.
pub const WESTEND_GENESIS_HASH: [u8; 32] =
	hex_array("e143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e");

/// Genesis hash of the Rococo relay chain.
pub const ROCOCO_GENESIS_HASH: [u8; 32] =
	hex_array("6408de7737c59c238890533af25896a2c20608d8b380bb01029acb392781063e");

/// Genesis hash of the Paseo relay chain.
pub const PASEO_GENESIS_HASH: [u8; 32] =
	hex_array("77afd6190f1554ad45fd0d31aee62aacc33c6db0ea801129acb813f913e0764f");

const fn hex_array(s: &str) -> [u8; 32] {
	const fn nibble(c: u8) -> u8 {
		match c {
			b'0'..=b'9' => c - b'0',
			b'a'..=b'f' => c - b'a' + 10,
			_ => panic!("invalid hex constant"),
		}
	}
	let bytes = s.as_bytes();
	let mut out = [0u8; 32];
	let mut i = 0;
	while i < 32 {
		out[i] = (nibble(bytes[2 * i]) << 4) | nibble(bytes[2 * i + 1]);
		i += 1;
	}
	out
}

/// A global consensus system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub enum NetworkId {
	ByGenesis([u8; 32]),
	ByFork { block_number: u64, block_hash: [u8; 32] },
	Polkadot,
	Kusama,
	Westend,
	Rococo,
	Wococo,
	Ethereum {
		#[codec(compact)]
		chain_id: u64,
	},
	BitcoinCore,
	BitcoinCash,
	PolkadotBulletin,
}

impl NetworkId {
	/// The consensus system of a relay network.
	pub fn of_relay(relay: Relay) -> Self {
		match relay {
			Relay::Polkadot => NetworkId::Polkadot,
			Relay::Kusama => NetworkId::Kusama,
			Relay::Westend => NetworkId::Westend,
			Relay::Paseo => NetworkId::ByGenesis(PASEO_GENESIS_HASH),
		}
	}
}

/// A single item of a location's interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub enum Junction {
	Parachain(#[codec(compact)] u32),
	AccountId32 {
		network: Option<NetworkId>,
		id: [u8; 32],
	},
	AccountIndex64 {
		network: Option<NetworkId>,
		#[codec(compact)]
		index: u64,
	},
	AccountKey20 {
		network: Option<NetworkId>,
		key: [u8; 20],
	},
	PalletInstance(u8),
	GeneralIndex(#[codec(compact)] u128),
	GeneralKey {
		length: u8,
		data: [u8; 32],
	},
	OnlyChild,
	#[codec(index = 9)]
	GlobalConsensus(NetworkId),
}

impl Junction {
	/// A `GeneralKey` holding `key`, which must be at most 32 bytes long.
	pub fn general_key(key: &[u8]) -> Result<Self, Error> {
		if key.len() > 32 {
			return Err(Error::InvalidInput(format!(
				"general key of {} bytes exceeds 32 bytes",
				key.len()
			)))
		}
		let mut data = [0u8; 32];
		data[..key.len()].copy_from_slice(key);
		Ok(Junction::GeneralKey { length: key.len() as u8, data })
	}
}

/// A relative path between consensus systems.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
	parents: u8,
	interior: Vec<Junction>,
}

impl Location {
	/// Create a location. Callers must keep `interior` within [`MAX_JUNCTIONS`].
	pub fn new(parents: u8, interior: impl Into<Vec<Junction>>) -> Self {
		let interior = interior.into();
		debug_assert!(interior.len() <= MAX_JUNCTIONS);
		Self { parents, interior }
	}

	/// The location of the consensus system itself.
	pub fn here() -> Self {
		Self::new(0, vec![])
	}

	/// The parent consensus system.
	pub fn parent() -> Self {
		Self::new(1, vec![])
	}

	pub fn parents(&self) -> u8 {
		self.parents
	}

	pub fn interior(&self) -> &[Junction] {
		&self.interior
	}

	pub fn first_interior(&self) -> Option<&Junction> {
		self.interior.first()
	}

	/// Whether this is `Here` relative to `parents` levels up.
	pub fn is_parent_only(&self, parents: u8) -> bool {
		self.parents == parents && self.interior.is_empty()
	}

	/// The parachain this location points into, if its first junction is a parachain.
	pub fn para_id(&self) -> Option<u32> {
		match self.interior.first() {
			Some(Junction::Parachain(id)) => Some(*id),
			_ => None,
		}
	}

	/// The first global consensus junction, if any.
	pub fn global_consensus(&self) -> Option<NetworkId> {
		self.interior.iter().find_map(|junction| match junction {
			Junction::GlobalConsensus(network) => Some(*network),
			_ => None,
		})
	}

	/// Whether any junction names a global consensus system.
	pub fn contains_global_consensus(&self) -> bool {
		self.global_consensus().is_some()
	}

	/// Whether `prefix` has the same parents and its interior is a prefix of ours.
	pub fn starts_with(&self, prefix: &Location) -> bool {
		self.parents == prefix.parents && self.interior.starts_with(&prefix.interior)
	}

	/// Append a junction.
	pub fn push_interior(&mut self, junction: Junction) -> Result<(), Error> {
		if self.interior.len() >= MAX_JUNCTIONS {
			return Err(Error::InvalidInput(format!("location {self} has too many junctions")))
		}
		self.interior.push(junction);
		Ok(())
	}

	/// Return the location with `junction` appended.
	pub fn pushed_with(mut self, junction: Junction) -> Result<Self, Error> {
		self.push_interior(junction)?;
		Ok(self)
	}

	/// The location of `self` as seen from `target`, where `context` is the universal location
	/// of the chain `self` is currently expressed from.
	pub fn reanchored(&self, target: &Location, context: &[Junction]) -> Result<Location, Error> {
		let mut result = self.clone();
		let inverted_target = invert_target(context, target)?;
		result.prepend_with(inverted_target)?;
		result.simplify(target.interior());
		Ok(result)
	}

	fn prepend_with(&mut self, mut prefix: Location) -> Result<(), Error> {
		let prepend_interior = prefix.interior.len().saturating_sub(self.parents as usize);
		let final_interior = self.interior.len().saturating_add(prepend_interior);
		let suffix_parents = (self.parents as usize).saturating_sub(prefix.interior.len());
		let final_parents = (prefix.parents as usize).saturating_add(suffix_parents);
		if final_interior > MAX_JUNCTIONS || final_parents > u8::MAX as usize {
			return Err(Error::Internal(format!("cannot prepend {prefix} to {self}")))
		}
		while self.parents > 0 && prefix.interior.pop().is_some() {
			self.parents -= 1;
		}
		self.parents = self.parents.saturating_add(prefix.parents);
		prefix.interior.append(&mut self.interior);
		self.interior = prefix.interior;
		Ok(())
	}

	fn simplify(&mut self, context: &[Junction]) {
		if context.len() < self.parents as usize {
			return
		}
		while self.parents > 0 {
			let expected = context.get(context.len() - self.parents as usize);
			match (self.interior.first(), expected) {
				(Some(i), Some(j)) if i == j => {
					self.interior.remove(0);
					self.parents -= 1;
				},
				_ => break,
			}
		}
	}

	/// Parse a location from its JSON text.
	pub fn from_json_str(raw: &str) -> Result<Self, Error> {
		let json: Json = serde_json::from_str(raw)
			.map_err(|err| Error::InvalidInput(format!("location `{raw}` is not JSON: {err}")))?;
		Self::from_json(&json)
	}

	/// Parse a location from a JSON value.
	pub fn from_json(json: &Json) -> Result<Self, Error> {
		let json = unwrap_versioned(json);
		let object = json
			.as_object()
			.ok_or_else(|| Error::InvalidInput(format!("location must be an object: {json}")))?;
		let parents = match field(object, "parents") {
			Some(value) => parse_number::<u8>(value)?,
			None => return Err(Error::InvalidInput(format!("location lacks `parents`: {json}"))),
		};
		let interior = match field(object, "interior") {
			Some(value) => parse_interior(value)?,
			None => vec![],
		};
		Ok(Self { parents, interior })
	}

	/// Canonical JSON rendering.
	pub fn to_json(&self) -> Json {
		let interior = match self.interior.len() {
			0 => json!("Here"),
			n => {
				let junctions: Vec<Json> = self.interior.iter().map(junction_to_json).collect();
				let mut interior = Map::new();
				interior.insert(format!("X{n}"), Json::Array(junctions));
				Json::Object(interior)
			},
		};
		json!({ "parents": self.parents, "interior": interior })
	}
}

impl PartialOrd for Location {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Location {
	fn cmp(&self, other: &Self) -> Ordering {
		self.parents
			.cmp(&other.parents)
			.then_with(|| self.interior.len().cmp(&other.interior.len()))
			.then_with(|| self.interior.cmp(&other.interior))
	}
}

impl Encode for Location {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		self.parents.encode_to(dest);
		dest.push_byte(self.interior.len() as u8);
		for junction in &self.interior {
			junction.encode_to(dest);
		}
	}
}

impl Decode for Location {
	fn decode<I: Input>(input: &mut I) -> Result<Self, codec::Error> {
		let parents = u8::decode(input)?;
		let len = input.read_byte()? as usize;
		if len > MAX_JUNCTIONS {
			return Err("too many junctions".into())
		}
		let interior = (0..len).map(|_| Junction::decode(input)).collect::<Result<_, _>>()?;
		Ok(Self { parents, interior })
	}
}

impl FromStr for Location {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_json_str(s)
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_json())
	}
}

impl Serialize for Location {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_json().serialize(serializer)
	}
}

/// The universal location of a chain: its relay's consensus system followed by its parachain id.
pub fn universal_location(relay: Relay, para_id: Option<u32>) -> Vec<Junction> {
	let mut junctions = vec![Junction::GlobalConsensus(NetworkId::of_relay(relay))];
	junctions.extend(para_id.map(Junction::Parachain));
	junctions
}

fn invert_target(context: &[Junction], target: &Location) -> Result<Location, Error> {
	let mut remaining = context.to_vec();
	let mut junctions = Vec::new();
	for _ in 0..target.parents {
		junctions.insert(0, remaining.pop().unwrap_or(Junction::OnlyChild));
	}
	if junctions.len() > MAX_JUNCTIONS {
		return Err(Error::Internal(format!("cannot invert {target}")))
	}
	Ok(Location::new(target.interior.len() as u8, junctions))
}

fn junction_to_json(junction: &Junction) -> Json {
	match junction {
		Junction::Parachain(id) => json!({ "Parachain": id }),
		Junction::AccountId32 { network, id } => json!({
			"AccountId32": { "network": network_option_to_json(network), "id": to_hex(id) }
		}),
		Junction::AccountIndex64 { network, index } => json!({
			"AccountIndex64": { "network": network_option_to_json(network), "index": index }
		}),
		Junction::AccountKey20 { network, key } => json!({
			"AccountKey20": { "network": network_option_to_json(network), "key": to_hex(key) }
		}),
		Junction::PalletInstance(index) => json!({ "PalletInstance": index }),
		Junction::GeneralIndex(index) => json!({ "GeneralIndex": index.to_string() }),
		Junction::GeneralKey { length, data } =>
			json!({ "GeneralKey": { "length": length, "data": to_hex(data) } }),
		Junction::OnlyChild => json!("OnlyChild"),
		Junction::GlobalConsensus(network) =>
			json!({ "GlobalConsensus": network_to_json(network) }),
	}
}

fn network_option_to_json(network: &Option<NetworkId>) -> Json {
	network.as_ref().map(network_to_json).unwrap_or(Json::Null)
}

fn network_to_json(network: &NetworkId) -> Json {
	match network {
		NetworkId::ByGenesis(hash) => json!({ "ByGenesis": to_hex(hash) }),
		NetworkId::ByFork { block_number, block_hash } =>
			json!({ "ByFork": { "blockNumber": block_number, "blockHash": to_hex(block_hash) } }),
		NetworkId::Polkadot => json!("Polkadot"),
		NetworkId::Kusama => json!("Kusama"),
		NetworkId::Westend => json!("Westend"),
		NetworkId::Rococo => json!("Rococo"),
		NetworkId::Wococo => json!("Wococo"),
		NetworkId::Ethereum { chain_id } => json!({ "Ethereum": { "chainId": chain_id } }),
		NetworkId::BitcoinCore => json!("BitcoinCore"),
		NetworkId::BitcoinCash => json!("BitcoinCash"),
		NetworkId::PolkadotBulletin => json!("PolkadotBulletin"),
	}
}

fn to_hex(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

/// Lower-case a key and drop separators, so `palletInstance`, `PalletInstance` and
/// `pallet_instance` compare equal.
fn normalize_key(key: &str) -> String {
	key.chars().filter(|c| *c != '_').flat_map(char::to_lowercase).collect()
}

fn field<'a>(object: &'a Map<String, Json>, name: &str) -> Option<&'a Json> {
	object.iter().find(|(key, _)| normalize_key(key) == name).map(|(_, value)| value)
}

/// Strip `{"v3": ..}`-style version wrappers and `Concrete` asset id wrappers.
fn unwrap_versioned(mut json: &Json) -> &Json {
	loop {
		match single_entry(json) {
			Some((key, inner)) if is_wrapper_key(&normalize_key(key)) => json = inner,
			_ => return json,
		}
	}
}

fn is_wrapper_key(key: &str) -> bool {
	key == "concrete" ||
		(key.len() == 2 && key.starts_with('v') && key[1..].chars().all(|c| c.is_ascii_digit()))
}

fn single_entry(json: &Json) -> Option<(&String, &Json)> {
	match json.as_object() {
		Some(object) if object.len() == 1 => object.iter().next(),
		_ => None,
	}
}

fn member<'a>(json: &'a Json, name: &str) -> Result<&'a Json, Error> {
	json.as_object()
		.and_then(|object| field(object, name))
		.ok_or_else(|| Error::InvalidInput(format!("{json} lacks `{name}`")))
}

fn parse_number<T: TryFrom<u128>>(json: &Json) -> Result<T, Error> {
	let value: u128 = match json {
		Json::Number(number) => number
			.as_u64()
			.map(u128::from)
			.ok_or_else(|| Error::InvalidInput(format!("`{number}` is not an unsigned integer")))?,
		Json::String(s) => {
			let digits: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
			digits
				.parse()
				.map_err(|_| Error::InvalidInput(format!("`{s}` is not an unsigned integer")))?
		},
		other => return Err(Error::InvalidInput(format!("`{other}` is not an unsigned integer"))),
	};
	T::try_from(value).map_err(|_| Error::InvalidInput(format!("{value} is out of range")))
}

fn parse_bytes(json: &Json) -> Result<Vec<u8>, Error> {
	let s = json
		.as_str()
		.ok_or_else(|| Error::InvalidInput(format!("expected a hex string, got {json}")))?;
	hex::decode(s.trim_start_matches("0x"))
		.map_err(|err| Error::InvalidInput(format!("`{s}` is not valid hex: {err}")))
}

fn parse_array<const N: usize>(json: &Json) -> Result<[u8; N], Error> {
	let bytes = parse_bytes(json)?;
	bytes.as_slice().try_into().map_err(|_| {
		Error::InvalidInput(format!("expected {N} bytes, got {} in {json}", bytes.len()))
	})
}

fn parse_interior(json: &Json) -> Result<Vec<Junction>, Error> {
	let (key, value) = match json {
		Json::Null => return Ok(vec![]),
		Json::String(s) if normalize_key(s) == "here" => return Ok(vec![]),
		_ => single_entry(json)
			.ok_or_else(|| Error::InvalidInput(format!("malformed location interior {json}")))?,
	};
	let key = normalize_key(key);
	if key == "here" {
		return Ok(vec![])
	}
	let expected: usize = key
		.strip_prefix('x')
		.and_then(|n| n.parse().ok())
		.filter(|n| (1..=MAX_JUNCTIONS).contains(n))
		.ok_or_else(|| Error::InvalidInput(format!("unknown junctions variant `{key}`")))?;
	let junctions = match value {
		Json::Array(items) => items.iter().map(parse_junction).collect::<Result<Vec<_>, _>>()?,
		single => vec![parse_junction(single)?],
	};
	if junctions.len() != expected {
		return Err(Error::InvalidInput(format!(
			"X{expected} interior holds {} junctions",
			junctions.len()
		)))
	}
	Ok(junctions)
}

fn parse_junction(json: &Json) -> Result<Junction, Error> {
	if let Json::String(s) = json {
		return match normalize_key(s).as_str() {
			"onlychild" => Ok(Junction::OnlyChild),
			other => Err(Error::InvalidInput(format!("unknown junction `{other}`"))),
		}
	}
	let (key, value) = single_entry(json)
		.ok_or_else(|| Error::InvalidInput(format!("malformed junction {json}")))?;
	let get = |name| member(value, name);
	let network = || -> Result<Option<NetworkId>, Error> {
		match value.as_object().and_then(|object| field(object, "network")) {
			Some(network) => parse_network(network),
			None => Ok(None),
		}
	};
	let junction = match normalize_key(key).as_str() {
		"parachain" => Junction::Parachain(parse_number(value)?),
		"accountid32" =>
			Junction::AccountId32 { network: network()?, id: parse_array(get("id")?)? },
		"accountindex64" =>
			Junction::AccountIndex64 { network: network()?, index: parse_number(get("index")?)? },
		"accountkey20" =>
			Junction::AccountKey20 { network: network()?, key: parse_array(get("key")?)? },
		"palletinstance" => Junction::PalletInstance(parse_number(value)?),
		"generalindex" => Junction::GeneralIndex(parse_number(value)?),
		"generalkey" => match value {
			Json::String(_) => Junction::general_key(&parse_bytes(value)?)?,
			_ => {
				let length: u8 = parse_number(get("length")?)?;
				let data: [u8; 32] = parse_array(get("data")?)?;
				if length > 32 {
					return Err(Error::InvalidInput(format!(
						"general key length {length} exceeds 32"
					)))
				}
				Junction::GeneralKey { length, data }
			},
		},
		"onlychild" => Junction::OnlyChild,
		"globalconsensus" => Junction::GlobalConsensus(
			parse_network(value)?
				.ok_or_else(|| Error::UnknownConsensusSystem(value.to_string()))?,
		),
		other => return Err(Error::InvalidInput(format!("unsupported junction `{other}`"))),
	};
	Ok(junction)
}

fn parse_network(json: &Json) -> Result<Option<NetworkId>, Error> {
	let (name, value) = match json {
		Json::Null => return Ok(None),
		Json::String(s) => (s.as_str(), &Json::Null),
		_ => single_entry(json)
			.map(|(key, value)| (key.as_str(), value))
			.ok_or_else(|| Error::UnknownConsensusSystem(json.to_string()))?,
	};
	let field_of = |key| member(value, key);
	let network = match normalize_key(name).as_str() {
		"any" => return Ok(None),
		"bygenesis" => NetworkId::ByGenesis(parse_array(value)?),
		"byfork" => NetworkId::ByFork {
			block_number: parse_number(field_of("blocknumber")?)?,
			block_hash: parse_array(field_of("blockhash")?)?,
		},
		"polkadot" => NetworkId::Polkadot,
		"kusama" => NetworkId::Kusama,
		"westend" => NetworkId::Westend,
		"rococo" => NetworkId::Rococo,
		"wococo" => NetworkId::Wococo,
		"ethereum" => NetworkId::Ethereum { chain_id: parse_number(field_of("chainid")?)? },
		"bitcoincore" => NetworkId::BitcoinCore,
		"bitcoincash" => NetworkId::BitcoinCash,
		"polkadotbulletin" => NetworkId::PolkadotBulletin,
		_ => return Err(Error::UnknownConsensusSystem(name.to_string())),
	};
	Ok(Some(network))
}
