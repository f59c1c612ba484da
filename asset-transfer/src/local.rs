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

//! Transfers that stay on the origin chain.

use crate::{
	account::Account,
	assets::{parse_amount, OriginChain},
	call::RuntimeCall,
	client::RuntimeCapabilities,
	direction::ChainKind,
	types::XcmVersion,
	xcm::{creator_for, json_to_value},
	Error, Location,
};
use serde_json::Value as Json;
use subxt::dynamic::Value;
use xcm_asset_registry::Registry;

/// The pallet a local transfer goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum LocalTxType {
	Balances,
	Assets,
	ForeignAssets,
	PoolAssets,
	Tokens,
}

/// The asset of a local transfer, resolved to the key its pallet uses.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalAsset {
	Native,
	Asset(u128),
	Foreign(Location),
	Pool(u128),
	Token(Value),
}

impl LocalAsset {
	pub fn tx_type(&self) -> LocalTxType {
		match self {
			LocalAsset::Native => LocalTxType::Balances,
			LocalAsset::Asset(_) => LocalTxType::Assets,
			LocalAsset::Foreign(_) => LocalTxType::ForeignAssets,
			LocalAsset::Pool(_) => LocalTxType::PoolAssets,
			LocalAsset::Token(_) => LocalTxType::Tokens,
		}
	}
}

/// A transfer between two accounts of the origin chain.
pub struct LocalTransfer<'a> {
	pub capabilities: &'a RuntimeCapabilities,
	pub registry: &'a Registry,
	pub origin: &'a OriginChain,
	pub asset_id: &'a str,
	pub amount: u128,
	pub beneficiary: Account,
	pub keep_alive: bool,
	pub transfer_all: bool,
	pub is_liquid_token_transfer: bool,
	pub is_foreign_assets_transfer: bool,
}

/// The single asset id and amount of a local transfer. No asset id means the native token.
pub fn single_asset<'a>(
	asset_ids: &'a [String],
	amounts: &[String],
) -> Result<(&'a str, u128), Error> {
	if asset_ids.len() > 1 || amounts.len() != 1 {
		return Err(Error::InvalidInput(format!(
			"local transfers take exactly one asset and one amount, got {} assets and {} amounts",
			asset_ids.len(),
			amounts.len()
		)))
	}
	let asset_id = asset_ids.first().map(|id| id.trim()).unwrap_or("");
	Ok((asset_id, parse_amount(&amounts[0])?))
}

impl<'a> LocalTransfer<'a> {
	/// Resolve the asset to the key of the pallet holding it.
	pub fn resolve_asset(&self) -> Result<LocalAsset, Error> {
		let id = self.asset_id;
		let origin = self.origin;
		let (relay, chain) = (origin.relay, origin.id);
		if self.is_liquid_token_transfer {
			if self.registry.pool_by_lp_token(relay, chain, id).is_none() {
				return Err(Error::AssetNotFound(format!("liquidity token {id}")))
			}
			return Ok(LocalAsset::Pool(parse_amount(id)?))
		}
		let is_native = id.is_empty() ||
			(id.eq_ignore_ascii_case(relay.native_symbol()) &&
				origin.kind() != ChainKind::General) ||
			id.eq_ignore_ascii_case(origin.primary_native_symbol());
		if is_native {
			return Ok(LocalAsset::Native)
		}
		match origin.kind() {
			ChainKind::Relay =>
				Err(Error::AssetNotFound(format!("{id} on {}", origin.spec_name()))),
			ChainKind::System => {
				if id.starts_with('{') {
					let location = Location::from_json_str(id)?;
					if location == origin.relay_native_location() {
						return Ok(LocalAsset::Native)
					}
					return Ok(LocalAsset::Foreign(location))
				}
				if !self.is_foreign_assets_transfer {
					if id.chars().all(|c| c.is_ascii_digit() || c == ',') {
						return Ok(LocalAsset::Asset(parse_amount(id)?))
					}
					if let Some(asset_id) = self.registry.asset_id_by_symbol(relay, chain, id) {
						return Ok(LocalAsset::Asset(parse_amount(asset_id)?))
					}
				}
				match self.registry.foreign_asset_by_symbol(relay, chain, id) {
					Some(foreign) =>
						Ok(LocalAsset::Foreign(Location::from_json_str(&foreign.multi_location)?)),
					None => Err(Error::AssetNotFound(format!("{id} on {}", origin.spec_name()))),
				}
			},
			ChainKind::General => Ok(LocalAsset::Token(self.currency_id(id)?)),
		}
	}

	/// The `Tokens` pallet currency id of `id`: a symbol, a currency id (plain or JSON) or a JSON
	/// location, looked up in the chain's cross-chain asset table.
	fn currency_id(&self, id: &str) -> Result<Value, Error> {
		let entries = &self.origin.info.xc_assets_data;
		let entry = if id.starts_with('{') {
			let json: Json = serde_json::from_str(id)
				.map_err(|err| Error::InvalidInput(format!("currency id `{id}`: {err}")))?;
			if json.get("parents").is_some() {
				let location = Location::from_json_str(id)?;
				entries.iter().find(|entry| {
					Location::from_json_str(&entry.xcm_v1_multi_location)
						.map_or(false, |known| known == location)
				})
			} else {
				entries.iter().find(|entry| entry.asset == json)
			}
		} else {
			let (relay, chain) = (self.origin.relay, self.origin.id);
			self.registry.xc_asset_by_symbol(relay, chain, id).or_else(|| {
				entries.iter().find(|entry| match &entry.asset {
					Json::String(s) => s == id,
					other => other.to_string() == id,
				})
			})
		};
		match entry {
			Some(entry) => json_to_value(&entry.asset),
			None => Err(Error::AssetNotFound(format!("{id} on {}", self.origin.spec_name()))),
		}
	}

	fn dest(&self) -> Value {
		match &self.beneficiary {
			Account::Id32(id) => Value::unnamed_variant("Id", [Value::from_bytes(id)]),
			Account::Key20(key) => Value::from_bytes(key),
		}
	}

	/// Build the transfer call.
	pub fn build(&self) -> Result<(LocalAsset, RuntimeCall), Error> {
		let asset = self.resolve_asset()?;
		let pallet = asset.tx_type();
		let pallet_name = pallet.as_ref();
		let info = self
			.capabilities
			.pallet(pallet_name)
			.ok_or_else(|| Error::PalletNotFound(pallet_name.to_string()))?;
		let has = |call: &str| info.calls.contains(call);
		let amount = Value::u128(self.amount);
		let keep_alive = Value::bool(self.keep_alive);

		let call = match &asset {
			LocalAsset::Native => {
				let method = if self.transfer_all {
					"transfer_all"
				} else if self.keep_alive {
					"transfer_keep_alive"
				} else if has("transfer_allow_death") {
					"transfer_allow_death"
				} else {
					"transfer"
				};
				let call = RuntimeCall::new(pallet_name, method).arg("dest", self.dest());
				if self.transfer_all {
					call.arg("keep_alive", keep_alive)
				} else {
					call.arg("value", amount)
				}
			},
			LocalAsset::Asset(_) | LocalAsset::Foreign(_) | LocalAsset::Pool(_) => {
				let id = match &asset {
					LocalAsset::Foreign(location) =>
						creator_for(XcmVersion::V4).location_value(location)?,
					LocalAsset::Asset(id) | LocalAsset::Pool(id) => Value::u128(*id),
					_ => return Err(Error::Internal("unexpected local asset".into())),
				};
				if self.transfer_all {
					RuntimeCall::new(pallet_name, "transfer_all")
						.arg("id", id)
						.arg("dest", self.dest())
						.arg("keep_alive", keep_alive)
				} else {
					let method = if self.keep_alive { "transfer_keep_alive" } else { "transfer" };
					RuntimeCall::new(pallet_name, method)
						.arg("id", id)
						.arg("target", self.dest())
						.arg("amount", amount)
				}
			},
			LocalAsset::Token(currency_id) =>
				if self.transfer_all {
					RuntimeCall::new(pallet_name, "transfer_all")
						.arg("dest", self.dest())
						.arg("currency_id", currency_id.clone())
						.arg("keep_alive", keep_alive)
				} else {
					let method = if self.keep_alive { "transfer_keep_alive" } else { "transfer" };
					RuntimeCall::new(pallet_name, method)
						.arg("dest", self.dest())
						.arg("currency_id", currency_id.clone())
						.arg("amount", amount)
				},
		};
		if !has(&call.call) {
			return Err(Error::RuntimeCallNotFound { pallet: call.pallet, call: call.call })
		}
		Ok((asset, call))
	}
}
