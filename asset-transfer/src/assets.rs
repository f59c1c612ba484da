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

//! Asset resolution and transfer-semantics classification.
//!
//! Callers name assets by symbol, by on-chain id or by location. Everything is turned into a
//! [`Location`] relative to the origin chain here, using the registry, before messages are
//! built. The same locations then drive the teleport-or-reserve decision.

use crate::{
	direction::ChainKind,
	location::universal_location,
	types::{AssetCallType, AssetType, Direction},
	Error, Junction, Location,
};
use xcm_asset_registry::{ChainInfo, Registry, Relay};

const LOG_TARGET: &str = "xcm-transfer::assets";

/// The chain a transfer starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginChain {
	pub relay: Relay,
	pub id: u32,
	pub info: ChainInfo,
}

impl OriginChain {
	pub fn kind(&self) -> ChainKind {
		ChainKind::of(self.id)
	}

	pub fn spec_name(&self) -> &str {
		&self.info.spec_name
	}

	/// The universal location of the chain.
	pub fn universal_location(&self) -> Vec<Junction> {
		let para_id = (self.kind() != ChainKind::Relay).then_some(self.id);
		universal_location(self.relay, para_id)
	}

	/// Location of the relay's native token as seen from this chain.
	pub fn relay_native_location(&self) -> Location {
		match self.kind() {
			ChainKind::Relay => Location::here(),
			_ => Location::parent(),
		}
	}

	/// Symbol of the chain's primary native token.
	pub fn primary_native_symbol(&self) -> &str {
		self.info.tokens.first().map(String::as_str).unwrap_or(self.relay.native_symbol())
	}

	/// Whether `location` is an asset issued by this chain.
	pub fn is_native(&self, location: &Location) -> bool {
		location.parents() == 0 ||
			(location.parents() == 1 && location.para_id() == Some(self.id))
	}

	/// Whether `location` is the chain's primary native token, i.e. the chain root, seen from
	/// the chain itself or from its siblings.
	pub fn is_primary_native(&self, location: &Location) -> bool {
		match location.parents() {
			0 => location.interior().is_empty(),
			1 => location.interior() == [Junction::Parachain(self.id)],
			_ => false,
		}
	}
}

/// How a caller names an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocator {
	/// A symbol or a chain-local id, resolved through the registry.
	Id(String),
	/// A fully qualified location.
	Location(Location),
}

impl AssetLocator {
	/// A leading `{` marks a JSON location, anything else is an id.
	pub fn parse(raw: &str) -> Result<Self, Error> {
		let raw = raw.trim();
		if raw.starts_with('{') {
			Ok(AssetLocator::Location(Location::from_json_str(raw)?))
		} else {
			Ok(AssetLocator::Id(raw.to_string()))
		}
	}
}

/// An asset resolved to a location on the origin chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferAsset {
	pub location: Location,
	pub amount: u128,
}

/// What asset resolution needs to know about the origin chain.
#[derive(Debug, Clone, Copy)]
pub struct AssetContext<'a> {
	pub registry: &'a Registry,
	pub origin: &'a OriginChain,
	/// Index of the `Assets` pallet, when present.
	pub assets_pallet: Option<u8>,
	/// Index of the `PoolAssets` pallet, when present.
	pub pool_assets_pallet: Option<u8>,
	pub is_foreign_assets_transfer: bool,
	pub is_liquid_token_transfer: bool,
}

impl<'a> AssetContext<'a> {
	/// Resolve a locator to a location relative to the origin.
	pub fn resolve(&self, locator: &AssetLocator) -> Result<Location, Error> {
		let id = match locator {
			AssetLocator::Location(location) => return Ok(location.clone()),
			AssetLocator::Id(id) => id.as_str(),
		};
		if id.is_empty() || id.eq_ignore_ascii_case(self.origin.relay.native_symbol()) {
			return Ok(self.origin.relay_native_location())
		}
		match self.origin.kind() {
			ChainKind::Relay => Err(Error::AssetNotFound(format!(
				"{id} is not available on {}",
				self.origin.spec_name()
			))),
			ChainKind::System => self.resolve_on_system_chain(id),
			ChainKind::General => self.resolve_on_general_chain(id),
		}
	}

	/// Resolve ids and amounts into transfer assets, in request order.
	pub fn resolve_all(
		&self,
		asset_ids: &[String],
		amounts: &[String],
	) -> Result<Vec<TransferAsset>, Error> {
		if asset_ids.is_empty() {
			return Err(Error::InvalidInput("at least one asset is required".into()))
		}
		if asset_ids.len() != amounts.len() {
			return Err(Error::InvalidInput(format!(
				"{} asset ids were given with {} amounts",
				asset_ids.len(),
				amounts.len()
			)))
		}
		asset_ids
			.iter()
			.zip(amounts)
			.map(|(id, amount)| {
				let location = self.resolve(&AssetLocator::parse(id)?)?;
				Ok(TransferAsset { location, amount: parse_amount(amount)? })
			})
			.collect()
	}

	fn resolve_on_system_chain(&self, id: &str) -> Result<Location, Error> {
		let (relay, chain) = (self.origin.relay, self.origin.id);
		if self.is_liquid_token_transfer {
			let pallet = self
				.pool_assets_pallet
				.ok_or_else(|| Error::PalletNotFound("PoolAssets".into()))?;
			if self.registry.pool_by_lp_token(relay, chain, id).is_none() {
				return Err(Error::AssetNotFound(format!("liquidity token {id}")))
			}
			return general_index_location(pallet, id)
		}
		if !self.is_foreign_assets_transfer {
			let asset_id = if is_numeric(id) {
				Some(id)
			} else {
				self.registry.asset_id_by_symbol(relay, chain, id)
			};
			if let Some(asset_id) = asset_id {
				let pallet =
					self.assets_pallet.ok_or_else(|| Error::PalletNotFound("Assets".into()))?;
				return general_index_location(pallet, asset_id)
			}
		}
		match self.registry.foreign_asset_by_symbol(relay, chain, id) {
			Some(foreign) => Location::from_json_str(&foreign.multi_location),
			None => Err(Error::AssetNotFound(format!("{id} on {}", self.origin.spec_name()))),
		}
	}

	fn resolve_on_general_chain(&self, id: &str) -> Result<Location, Error> {
		if id.eq_ignore_ascii_case(self.origin.primary_native_symbol()) {
			return Ok(Location::here())
		}
		let (relay, chain) = (self.origin.relay, self.origin.id);
		let entry = self.registry.xc_asset_by_symbol(relay, chain, id).or_else(|| {
			self.origin.info.xc_assets_data.iter().find(|asset| match &asset.asset {
				serde_json::Value::String(s) => s == id,
				other => other.to_string() == id,
			})
		});
		match entry {
			Some(asset) => Location::from_json_str(&asset.xcm_v1_multi_location),
			None => Err(Error::AssetNotFound(format!("{id} on {}", self.origin.spec_name()))),
		}
	}
}

fn is_numeric(id: &str) -> bool {
	!id.is_empty() && id.chars().all(|c| c.is_ascii_digit() || c == ',')
}

fn general_index_location(pallet: u8, asset_id: &str) -> Result<Location, Error> {
	let index = parse_amount(asset_id)?;
	Ok(Location::new(0, vec![Junction::PalletInstance(pallet), Junction::GeneralIndex(index)]))
}

/// Parse an unsigned integer amount, tolerating thousands separators.
pub fn parse_amount(raw: &str) -> Result<u128, Error> {
	let digits: String = raw.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
	digits
		.parse()
		.map_err(|_| Error::InvalidInput(format!("`{raw}` is not a valid amount")))
}

/// Asset type of a transfer. A property of the channel, except between system chains where
/// the caller flags foreign assets explicitly.
pub fn fetch_asset_type(direction: Direction, is_foreign_assets_transfer: bool) -> AssetType {
	match direction {
		Direction::RelayToSystem | Direction::SystemToRelay => AssetType::Native,
		Direction::SystemToSystem if !is_foreign_assets_transfer => AssetType::Native,
		_ => AssetType::Foreign,
	}
}

/// Inputs of the teleport-or-reserve decision.
#[derive(Debug, Clone, Copy)]
pub struct CallTypeQuery<'a> {
	pub direction: Direction,
	pub asset_type: AssetType,
	pub assets: &'a [TransferAsset],
	pub origin: &'a OriginChain,
	/// Native token location of the destination, as seen from the origin.
	pub dest_native_location: Option<&'a Location>,
}

/// Decide whether the assets are teleported or reserve transferred.
pub fn fetch_call_type(query: &CallTypeQuery) -> AssetCallType {
	use Direction::*;
	match (query.direction, query.asset_type) {
		(RelayToSystem | SystemToRelay, _) => AssetCallType::Teleport,
		(RelayToPara, _) => AssetCallType::Reserve,
		(SystemToSystem, AssetType::Native) => AssetCallType::Teleport,
		(SystemToPara, AssetType::Native) => AssetCallType::Reserve,
		(SystemToPara, AssetType::Foreign) => {
			let returning_home = query.dest_native_location.map_or(false, |native| {
				query.assets.iter().all(|asset| &asset.location == native)
			});
			if returning_home {
				AssetCallType::Teleport
			} else {
				AssetCallType::Reserve
			}
		},
		(ParaToSystem, _) => para_to_system_call_type(query),
		(ParaToPara | ParaToRelay | SystemToBridge | ParaToEthereum, _) => AssetCallType::Reserve,
		(direction, asset_type) => {
			log::debug!(
				target: LOG_TARGET,
				"No call type rule for {direction} with {asset_type} assets, using Reserve"
			);
			AssetCallType::Reserve
		},
	}
}

fn para_to_system_call_type(query: &CallTypeQuery) -> AssetCallType {
	let relay_native = query.origin.relay_native_location();
	if query.assets.iter().any(|asset| asset.location == relay_native) {
		return AssetCallType::Reserve
	}
	let teleportable = query.assets.iter().all(|asset| {
		query.origin.is_native(&asset.location) && !query.origin.is_primary_native(&asset.location)
	});
	if teleportable {
		AssetCallType::Teleport
	} else {
		AssetCallType::Reserve
	}
}

/// Location of the destination chain's native token as seen from the origin.
///
/// The origin's foreign asset table is consulted first, so tokens living below the
/// destination's root (e.g. behind a pallet instance) are found; otherwise the chain's root
/// location is assumed.
pub fn dest_native_location(registry: &Registry, origin: &OriginChain, dest_id: u32) -> Location {
	let root = Location::new(1, vec![Junction::Parachain(dest_id)]);
	let symbol = registry.chain(origin.relay, dest_id).and_then(|chain| chain.tokens.first());
	let Some(symbol) = symbol else { return root };
	origin
		.info
		.foreign_assets_info
		.values()
		.filter(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
		.filter_map(|asset| Location::from_json_str(&asset.multi_location).ok())
		.find(|location| location.starts_with(&root))
		.unwrap_or(root)
}
