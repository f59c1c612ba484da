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

//! Version-specific construction of XCM call arguments.
//!
//! Every supported XCM version has a creator implementing [`XcmCreator`]. Creators emit
//! dynamic [`Value`]s shaped after the versioned types of the runtime (`VersionedLocation`,
//! `VersionedAssets`, ...), which are then encoded against the chain metadata.
//!
//! The differences between versions are concentrated in a few places:
//! - v2 knows no global consensus junctions and uses `Any` for an unspecified network.
//! - v2 and v3 wrap locations of asset ids in `Concrete`, list single junctions positionally and
//!   name the multi-junction variants `X1..X8` with one field per junction.
//! - v4 and v5 use `AssetId(Location)` and store the junctions of `X1..X8` as one array.
//! - v5 identifies the Westend and Rococo networks by their genesis hash.

mod custom;
mod decode;
mod v2;
mod v3;
mod v4;
mod v5;
pub mod xtokens;

pub use custom::{deposit_all_counted, json_to_value, versioned_xcm};
pub use decode::location_from_value;

use crate::{
	types::{WeightLimit, XcmVersion},
	Error, Junction, Location, NetworkId,
};
use subxt::dynamic::Value;

/// An asset to transfer: its location relative to the origin and the amount.
pub type AssetAmount = (Location, u128);

/// Builds the XCM arguments of transfer calls for one XCM version.
pub trait XcmCreator: Send + Sync {
	/// The version values are created for.
	fn version(&self) -> XcmVersion;

	/// A network id of this version.
	fn network_value(&self, network: &NetworkId) -> Result<Value, Error>;

	/// The optional network carried by account junctions.
	fn account_network_value(&self, network: &Option<NetworkId>) -> Result<Value, Error> {
		Ok(match network {
			None => Value::unnamed_variant("None", []),
			Some(network) => Value::unnamed_variant("Some", [self.network_value(network)?]),
		})
	}

	/// A single junction of this version.
	fn junction_value(&self, junction: &Junction) -> Result<Value, Error> {
		Ok(match junction {
			Junction::Parachain(id) =>
				Value::unnamed_variant("Parachain", [Value::u128(*id as u128)]),
			Junction::AccountId32 { network, id } => Value::named_variant(
				"AccountId32",
				[("network", self.account_network_value(network)?), ("id", Value::from_bytes(id))],
			),
			Junction::AccountIndex64 { network, index } => Value::named_variant(
				"AccountIndex64",
				[
					("network", self.account_network_value(network)?),
					("index", Value::u128(*index as u128)),
				],
			),
			Junction::AccountKey20 { network, key } => Value::named_variant(
				"AccountKey20",
				[
					("network", self.account_network_value(network)?),
					("key", Value::from_bytes(key)),
				],
			),
			Junction::PalletInstance(index) =>
				Value::unnamed_variant("PalletInstance", [Value::u128(*index as u128)]),
			Junction::GeneralIndex(index) =>
				Value::unnamed_variant("GeneralIndex", [Value::u128(*index)]),
			Junction::GeneralKey { length, data } => Value::named_variant(
				"GeneralKey",
				[("length", Value::u128(*length as u128)), ("data", Value::from_bytes(data))],
			),
			Junction::OnlyChild => Value::unnamed_variant("OnlyChild", []),
			Junction::GlobalConsensus(network) =>
				Value::unnamed_variant("GlobalConsensus", [self.network_value(network)?]),
		})
	}

	/// The interior of a location: `Here` or one of `X1..X8`.
	fn interior_value(&self, junctions: &[Junction]) -> Result<Value, Error>;

	/// The id of an asset at `location`.
	fn asset_id_value(&self, location: &Location) -> Result<Value, Error>;

	/// An unversioned location.
	fn location_value(&self, location: &Location) -> Result<Value, Error> {
		Ok(Value::named_composite([
			("parents", Value::u128(location.parents() as u128)),
			("interior", self.interior_value(location.interior())?),
		]))
	}

	/// An unversioned fungible asset.
	fn asset_value(&self, location: &Location, amount: u128) -> Result<Value, Error> {
		Ok(Value::named_composite([
			("id", self.asset_id_value(location)?),
			("fun", Value::unnamed_variant("Fungible", [Value::u128(amount)])),
		]))
	}

	/// Unversioned assets, sorted and deduplicated.
	fn assets_value(&self, assets: &[AssetAmount]) -> Result<Value, Error> {
		let items = normalize_assets(assets)
			.iter()
			.map(|(location, amount)| self.asset_value(location, *amount))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Value::unnamed_composite([Value::unnamed_composite(items)]))
	}

	/// Wrap a value of this version in its versioned enum variant.
	fn versioned(&self, value: Value) -> Value {
		Value::unnamed_variant(self.version().variant(), [value])
	}

	/// The `VersionedLocation` of the destination.
	fn create_dest(&self, dest: &Location) -> Result<Value, Error> {
		Ok(self.versioned(self.location_value(dest)?))
	}

	/// The `VersionedLocation` of the receiving account, relative to the destination.
	fn create_beneficiary(&self, beneficiary: &Junction) -> Result<Value, Error> {
		self.create_dest(&Location::new(0, vec![*beneficiary]))
	}

	/// The `VersionedAssets` to transfer.
	fn create_assets(&self, assets: &[AssetAmount]) -> Result<Value, Error> {
		Ok(self.versioned(self.assets_value(assets)?))
	}

	/// The `VersionedAsset` of a single asset.
	fn create_asset(&self, location: &Location, amount: u128) -> Result<Value, Error> {
		Ok(self.versioned(self.asset_value(location, amount)?))
	}

	/// The weight limit for execution on the destination.
	fn create_weight_limit(&self, limit: Option<WeightLimit>) -> Value {
		weight_limit_value(limit)
	}

	/// Index of the fee asset within the sorted assets, `0` when no fee asset is given.
	fn create_fee_asset_item(
		&self,
		assets: &[AssetAmount],
		fee_asset: Option<&Location>,
	) -> Result<u32, Error> {
		fee_asset_item(assets, fee_asset)
	}
}

/// The creator for `version`.
pub fn creator_for(version: XcmVersion) -> Box<dyn XcmCreator> {
	match version {
		XcmVersion::V2 => Box::new(v2::XcmV2),
		XcmVersion::V3 => Box::new(v3::XcmV3),
		XcmVersion::V4 => Box::new(v4::XcmV4),
		XcmVersion::V5 => Box::new(v5::XcmV5),
	}
}

/// Sort assets by location and merge duplicates, adding their amounts.
pub fn normalize_assets(assets: &[AssetAmount]) -> Vec<AssetAmount> {
	let mut sorted = assets.to_vec();
	sorted.sort_by(|a, b| a.0.cmp(&b.0));
	let mut merged: Vec<AssetAmount> = Vec::with_capacity(sorted.len());
	for (location, amount) in sorted {
		match merged.last_mut() {
			Some((last, total)) if *last == location => *total = total.saturating_add(amount),
			_ => merged.push((location, amount)),
		}
	}
	merged
}

/// Index of `fee_asset` within the normalized `assets`.
pub fn fee_asset_item(assets: &[AssetAmount], fee_asset: Option<&Location>) -> Result<u32, Error> {
	let Some(fee_asset) = fee_asset else { return Ok(0) };
	normalize_assets(assets)
		.iter()
		.position(|(location, _)| location == fee_asset)
		.map(|index| index as u32)
		.ok_or_else(|| {
			Error::AssetNotFound(format!(
				"fee asset {fee_asset} is not among the transferred assets"
			))
		})
}

/// `Unlimited`, or `Limited` with the given weight.
pub fn weight_limit_value(limit: Option<WeightLimit>) -> Value {
	match limit {
		None => Value::unnamed_variant("Unlimited", []),
		Some(WeightLimit { ref_time, proof_size }) => Value::unnamed_variant(
			"Limited",
			[Value::named_composite([
				("ref_time", Value::u128(ref_time as u128)),
				("proof_size", Value::u128(proof_size as u128)),
			])],
		),
	}
}

/// Network ids shared by v3 and later.
fn network_value_v3(network: &NetworkId) -> Value {
	match *network {
		NetworkId::ByGenesis(hash) =>
			Value::unnamed_variant("ByGenesis", [Value::from_bytes(hash)]),
		NetworkId::ByFork { block_number, block_hash } => Value::named_variant(
			"ByFork",
			[
				("block_number", Value::u128(block_number as u128)),
				("block_hash", Value::from_bytes(block_hash)),
			],
		),
		NetworkId::Polkadot => Value::unnamed_variant("Polkadot", []),
		NetworkId::Kusama => Value::unnamed_variant("Kusama", []),
		NetworkId::Westend => Value::unnamed_variant("Westend", []),
		NetworkId::Rococo => Value::unnamed_variant("Rococo", []),
		NetworkId::Wococo => Value::unnamed_variant("Wococo", []),
		NetworkId::Ethereum { chain_id } =>
			Value::named_variant("Ethereum", [("chain_id", Value::u128(chain_id as u128))]),
		NetworkId::BitcoinCore => Value::unnamed_variant("BitcoinCore", []),
		NetworkId::BitcoinCash => Value::unnamed_variant("BitcoinCash", []),
		NetworkId::PolkadotBulletin => Value::unnamed_variant("PolkadotBulletin", []),
	}
}

/// `X1..X8` with one field per junction, as in v2 and v3.
fn positional_interior(
	creator: &dyn XcmCreator,
	junctions: &[Junction],
) -> Result<Value, Error> {
	if junctions.is_empty() {
		return Ok(Value::unnamed_variant("Here", []))
	}
	let values = junctions
		.iter()
		.map(|junction| creator.junction_value(junction))
		.collect::<Result<Vec<_>, _>>()?;
	Ok(Value::unnamed_variant(format!("X{}", junctions.len()), values))
}

/// `X1..X8` holding the junctions as one array, as in v4 and v5.
fn array_interior(creator: &dyn XcmCreator, junctions: &[Junction]) -> Result<Value, Error> {
	if junctions.is_empty() {
		return Ok(Value::unnamed_variant("Here", []))
	}
	let values = junctions
		.iter()
		.map(|junction| creator.junction_value(junction))
		.collect::<Result<Vec<_>, _>>()?;
	Ok(Value::unnamed_variant(format!("X{}", junctions.len()), [Value::unnamed_composite(values)]))
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::Junction::*;
	use assert_matches::assert_matches;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	pub fn usdt() -> Location {
		Location::new(0, vec![PalletInstance(50), GeneralIndex(1984)])
	}

	#[test]
	fn assets_are_sorted_and_merged() {
		let assets = vec![(usdt(), 10), (Location::parent(), 5), (usdt(), 7)];
		assert_eq!(normalize_assets(&assets), vec![(usdt(), 17), (Location::parent(), 5)]);
		let saturating = vec![(usdt(), u128::MAX), (usdt(), 1)];
		assert_eq!(normalize_assets(&saturating), vec![(usdt(), u128::MAX)]);
	}

	#[test]
	fn fee_asset_item_indexes_the_sorted_list() {
		let assets = vec![(Location::parent(), 5), (usdt(), 10)];
		assert_eq!(fee_asset_item(&assets, None).unwrap(), 0);
		assert_eq!(fee_asset_item(&assets, Some(&Location::parent())).unwrap(), 1);
		assert_eq!(fee_asset_item(&assets, Some(&usdt())).unwrap(), 0);
		assert_matches!(
			fee_asset_item(&assets, Some(&Location::here())),
			Err(Error::AssetNotFound(_))
		);
	}

	#[test]
	fn weight_limits() {
		assert_eq!(weight_limit_value(None), Value::unnamed_variant("Unlimited", []));
		assert_eq!(
			weight_limit_value(Some(WeightLimit { ref_time: 1_000, proof_size: 2_000 })),
			Value::unnamed_variant(
				"Limited",
				[Value::named_composite([
					("ref_time", Value::u128(1_000)),
					("proof_size", Value::u128(2_000)),
				])]
			)
		);
	}

	#[rstest]
	#[case(XcmVersion::V2, "V2")]
	#[case(XcmVersion::V3, "V3")]
	#[case(XcmVersion::V4, "V4")]
	#[case(XcmVersion::V5, "V5")]
	fn dest_is_wrapped_in_the_version_variant(#[case] version: XcmVersion, #[case] name: &str) {
		let creator = creator_for(version);
		assert_eq!(creator.version(), version);
		let dest = creator.create_dest(&Location::parent()).unwrap();
		assert_eq!(
			dest,
			Value::unnamed_variant(
				name,
				[Value::named_composite([
					("parents", Value::u128(1)),
					("interior", Value::unnamed_variant("Here", [])),
				])]
			)
		);
	}

	#[test]
	fn interiors_differ_between_v3_and_v4() {
		let location = Location::new(1, vec![Parachain(1000)]);
		let v3 = creator_for(XcmVersion::V3).location_value(&location).unwrap();
		let v4 = creator_for(XcmVersion::V4).location_value(&location).unwrap();
		let parachain = Value::unnamed_variant("Parachain", [Value::u128(1000)]);
		assert_eq!(
			v3,
			Value::named_composite([
				("parents", Value::u128(1)),
				("interior", Value::unnamed_variant("X1", [parachain.clone()])),
			])
		);
		assert_eq!(
			v4,
			Value::named_composite([
				("parents", Value::u128(1)),
				(
					"interior",
					Value::unnamed_variant("X1", [Value::unnamed_composite([parachain])])
				),
			])
		);
	}

	#[test]
	fn asset_ids_differ_between_v3_and_v4() {
		let v3 = creator_for(XcmVersion::V3);
		let v4 = creator_for(XcmVersion::V4);
		let location = v3.location_value(&Location::parent()).unwrap();
		assert_eq!(
			v3.asset_id_value(&Location::parent()).unwrap(),
			Value::unnamed_variant("Concrete", [location.clone()])
		);
		assert_eq!(
			v4.asset_id_value(&Location::parent()).unwrap(),
			Value::unnamed_composite([location])
		);
	}

	#[test]
	fn beneficiaries_carry_the_account() {
		let creator = creator_for(XcmVersion::V4);
		let account = AccountId32 { network: None, id: [1; 32] };
		let beneficiary = creator.create_beneficiary(&account).unwrap();
		let expected = Value::unnamed_variant(
			"V4",
			[Value::named_composite([
				("parents", Value::u128(0)),
				(
					"interior",
					Value::unnamed_variant(
						"X1",
						[Value::unnamed_composite([Value::named_variant(
							"AccountId32",
							[
								("network", Value::unnamed_variant("None", [])),
								("id", Value::from_bytes([1; 32])),
							],
						)])],
					),
				),
			])],
		);
		assert_eq!(beneficiary, expected);
	}

	#[test]
	fn created_assets_are_sorted() {
		let creator = creator_for(XcmVersion::V3);
		let assets = creator.create_assets(&[(Location::parent(), 1), (usdt(), 2)]).unwrap();
		let expected = Value::unnamed_variant(
			"V3",
			[Value::unnamed_composite([Value::unnamed_composite([
				creator.asset_value(&usdt(), 2).unwrap(),
				creator.asset_value(&Location::parent(), 1).unwrap(),
			])])],
		);
		assert_eq!(assets, expected);
	}
}
