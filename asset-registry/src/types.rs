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

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// A relay network.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Relay {
	Polkadot,
	Kusama,
	Westend,
	Paseo,
}

impl Relay {
	/// All known relay networks.
	pub const ALL: [Relay; 4] = [Relay::Polkadot, Relay::Kusama, Relay::Westend, Relay::Paseo];

	/// Symbol of the relay's native token.
	pub fn native_symbol(&self) -> &'static str {
		match self {
			Relay::Polkadot => "DOT",
			Relay::Kusama => "KSM",
			Relay::Westend => "WND",
			Relay::Paseo => "PAS",
		}
	}

	/// Spec name of the relay chain runtime.
	pub fn spec_name(&self) -> &'static str {
		match self {
			Relay::Polkadot => "polkadot",
			Relay::Kusama => "kusama",
			Relay::Westend => "westend",
			Relay::Paseo => "paseo",
		}
	}
}

impl fmt::Display for Relay {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.spec_name())
	}
}

impl FromStr for Relay {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Relay::ALL
			.into_iter()
			.find(|relay| relay.spec_name().eq_ignore_ascii_case(s))
			.ok_or_else(|| format!("unknown relay network `{s}`"))
	}
}

/// Everything the registry knows about a single chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
	/// Runtime spec name, e.g. `statemint`.
	pub spec_name: String,
	/// Native tokens; the first entry is the primary native token.
	#[serde(default)]
	pub tokens: Vec<String>,
	/// On-chain asset id to symbol.
	#[serde(default)]
	pub assets_info: BTreeMap<String, String>,
	/// Foreign assets registered on the chain, keyed by symbol.
	#[serde(default)]
	pub foreign_assets_info: BTreeMap<String, ForeignAssetInfo>,
	/// Liquidity pools keyed by pool id.
	#[serde(default)]
	pub pool_pairs_info: BTreeMap<String, PoolPairInfo>,
	/// Cross-chain assets accepted by the chain.
	#[serde(default)]
	pub xc_assets_data: Vec<XcAssetData>,
}

/// A foreign asset entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignAssetInfo {
	pub symbol: String,
	pub name: String,
	/// JSON encoded location of the asset, relative to the chain holding the entry.
	pub multi_location: String,
	#[serde(default)]
	pub asset_hub_reserve_location: Option<String>,
}

/// A liquidity pool entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPairInfo {
	/// Id of the pool's liquidity token in the `PoolAssets` pallet.
	pub lp_token: String,
	/// JSON encoded pair of asset locations.
	pub pair_info: String,
}

/// A cross-chain asset entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XcAssetData {
	/// Chain the asset originates from.
	#[serde(rename = "paraID")]
	pub para_id: u32,
	pub symbol: String,
	pub decimals: u8,
	/// JSON encoded location of the asset.
	#[serde(rename = "xcmV1MultiLocation")]
	pub xcm_v1_multi_location: String,
	/// Chain-local identifier of the asset, in whatever shape the chain uses.
	#[serde(default)]
	pub asset: serde_json::Value,
	#[serde(default)]
	pub asset_hub_reserve_location: Option<String>,
}
