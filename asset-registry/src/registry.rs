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

use crate::{
	types::{ChainInfo, ForeignAssetInfo, PoolPairInfo, Relay, XcAssetData},
	RegistryError, LOG_TARGET,
};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map::Entry, BTreeMap};

const BUNDLED_REGISTRY: &str = include_str!("../registry.json");

/// A chain found in the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainRef<'a> {
	pub relay: Relay,
	pub id: u32,
	pub info: &'a ChainInfo,
}

/// Relay network -> chain id -> chain description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry(BTreeMap<Relay, BTreeMap<u32, ChainInfo>>);

impl Registry {
	/// Parse a registry document.
	pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
		Ok(serde_json::from_str(raw)?)
	}

	/// The registry shipped with this crate.
	pub fn bundled() -> Result<Self, RegistryError> {
		Self::from_json(BUNDLED_REGISTRY)
	}

	/// Look up a chain by relay and id.
	pub fn chain(&self, relay: Relay, id: u32) -> Option<&ChainInfo> {
		self.0.get(&relay).and_then(|chains| chains.get(&id))
	}

	/// Iterate over the chains of a relay network.
	pub fn chains(&self, relay: Relay) -> impl Iterator<Item = ChainRef<'_>> {
		self.0.get(&relay).into_iter().flat_map(move |chains| {
			chains.iter().map(move |(id, info)| ChainRef { relay, id: *id, info })
		})
	}

	/// Find a chain by its runtime spec name, ignoring case.
	pub fn find_by_spec_name(&self, spec_name: &str) -> Option<ChainRef<'_>> {
		self.0.iter().find_map(|(relay, chains)| {
			chains.iter().find_map(|(id, info)| {
				info.spec_name
					.eq_ignore_ascii_case(spec_name)
					.then(|| ChainRef { relay: *relay, id: *id, info })
			})
		})
	}

	/// Insert or replace a chain entry.
	pub fn insert(&mut self, relay: Relay, id: u32, info: ChainInfo) {
		self.0.entry(relay).or_default().insert(id, info);
	}

	/// Merge `other` into `self`.
	///
	/// Chains unknown to `self` are added. For chains present in both, token lists and asset
	/// tables are extended and entries of `other` win on conflicting keys.
	pub fn merge(&mut self, other: Registry) {
		for (relay, chains) in other.0 {
			let target = self.0.entry(relay).or_default();
			for (id, info) in chains {
				match target.entry(id) {
					Entry::Vacant(entry) => {
						log::debug!(
							target: LOG_TARGET,
							"Adding chain {relay}/{id} ({})",
							info.spec_name
						);
						entry.insert(info);
					},
					Entry::Occupied(mut entry) => {
						log::debug!(
							target: LOG_TARGET,
							"Extending chain {relay}/{id} ({})",
							info.spec_name
						);
						merge_chain(entry.get_mut(), info);
					},
				}
			}
		}
	}

	/// Find an on-chain asset id by symbol.
	pub fn asset_id_by_symbol(&self, relay: Relay, id: u32, symbol: &str) -> Option<&str> {
		self.chain(relay, id)?
			.assets_info
			.iter()
			.find(|(_, sym)| sym.eq_ignore_ascii_case(symbol))
			.map(|(asset_id, _)| asset_id.as_str())
	}

	/// Find a foreign asset by symbol.
	pub fn foreign_asset_by_symbol(
		&self,
		relay: Relay,
		id: u32,
		symbol: &str,
	) -> Option<&ForeignAssetInfo> {
		self.chain(relay, id)?
			.foreign_assets_info
			.values()
			.find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
	}

	/// Find a cross-chain asset by symbol.
	pub fn xc_asset_by_symbol(&self, relay: Relay, id: u32, symbol: &str) -> Option<&XcAssetData> {
		self.chain(relay, id)?
			.xc_assets_data
			.iter()
			.find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
	}

	/// Find a liquidity pool by the id of its liquidity token.
	pub fn pool_by_lp_token(&self, relay: Relay, id: u32, lp_token: &str) -> Option<&PoolPairInfo> {
		self.chain(relay, id)?.pool_pairs_info.values().find(|pool| pool.lp_token == lp_token)
	}
}

fn merge_chain(existing: &mut ChainInfo, other: ChainInfo) {
	if !other.spec_name.is_empty() {
		existing.spec_name = other.spec_name;
	}
	for token in other.tokens {
		if !existing.tokens.contains(&token) {
			existing.tokens.push(token);
		}
	}
	existing.assets_info.extend(other.assets_info);
	existing.foreign_assets_info.extend(other.foreign_assets_info);
	existing.pool_pairs_info.extend(other.pool_pairs_info);
	for asset in other.xc_assets_data {
		match existing
			.xc_assets_data
			.iter_mut()
			.find(|known| known.symbol == asset.symbol && known.para_id == asset.para_id)
		{
			Some(known) => *known = asset,
			None => existing.xc_assets_data.push(asset),
		}
	}
}
