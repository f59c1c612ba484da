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

//! Access to a running chain.
//!
//! Transaction construction only needs a narrow view of the chain: its runtime version, the
//! pallets and calls in its metadata, a few storage items and runtime APIs, and the metadata
//! based encoding of calls. [`ChainClient`] captures that view so the builders can run against
//! a live node through [`SubxtClient`] or against an in-memory chain in tests.

mod subxt_client;

pub use subxt_client::SubxtClient;

use crate::{call::RuntimeCall, Error};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use subxt::dynamic::Value;

/// The runtime version of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeVersion {
	pub spec_name: String,
	pub spec_version: u32,
	pub transaction_version: u32,
}

/// Number and hash of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
	pub number: u64,
	pub hash: [u8; 32],
}

/// A pallet of the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PalletInfo {
	pub index: u8,
	pub calls: BTreeSet<String>,
}

/// The pallets and calls available in a runtime, keyed by pallet name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeCapabilities {
	pallets: BTreeMap<String, PalletInfo>,
}

impl RuntimeCapabilities {
	/// Register a pallet with its calls.
	pub fn with_pallet<'a>(
		mut self,
		name: &str,
		index: u8,
		calls: impl IntoIterator<Item = &'a str>,
	) -> Self {
		let calls = calls.into_iter().map(str::to_string).collect();
		self.pallets.insert(name.to_string(), PalletInfo { index, calls });
		self
	}

	pub fn pallet(&self, name: &str) -> Option<&PalletInfo> {
		self.pallets.get(name)
	}

	pub fn has_pallet(&self, name: &str) -> bool {
		self.pallets.contains_key(name)
	}

	pub fn has_call(&self, pallet: &str, call: &str) -> bool {
		self.pallets.get(pallet).map_or(false, |info| info.calls.contains(call))
	}

	/// The first of `candidates` present in the runtime.
	pub fn first_pallet<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
		candidates.iter().copied().find(|name| self.has_pallet(name))
	}

	pub fn pallet_names(&self) -> impl Iterator<Item = &str> {
		self.pallets.keys().map(String::as_str)
	}
}

/// A connection to a chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// The runtime version at the best block.
	async fn runtime_version(&self) -> Result<RuntimeVersion, Error>;

	fn genesis_hash(&self) -> [u8; 32];

	/// Pallets and calls of the connected runtime.
	fn capabilities(&self) -> RuntimeCapabilities;

	/// Identifiers of the transaction extensions, in encoding order.
	fn transaction_extensions(&self) -> Vec<String>;

	/// Read a storage entry at the best block.
	async fn storage(
		&self,
		pallet: &str,
		entry: &str,
		keys: Vec<Value>,
	) -> Result<Option<Value>, Error>;

	/// Call a runtime API at the best block.
	async fn runtime_api_call(
		&self,
		api: &str,
		method: &str,
		args: Vec<Value>,
	) -> Result<Value, Error>;

	/// SCALE encode a call against the runtime metadata.
	fn encode_call(&self, call: &RuntimeCall) -> Result<Vec<u8>, Error>;

	/// Decode SCALE encoded call data against the runtime metadata.
	fn decode_call(&self, call_data: &[u8]) -> Result<Value, Error>;

	/// An unsigned extrinsic carrying the call.
	fn create_unsigned(&self, call: &RuntimeCall) -> Result<Vec<u8>, Error>;

	/// The next nonce of `address`, including transactions in the pool.
	async fn account_nonce(&self, address: &str) -> Result<u64, Error>;

	async fn latest_block(&self) -> Result<BlockRef, Error>;

	/// Hash of the best chain's block at `number`.
	async fn block_hash(&self, number: u64) -> Result<Option<[u8; 32]>, Error>;

	/// Close the connection. The client is consumed, so nothing can use it afterwards.
	async fn disconnect(self: Box<Self>);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capabilities_lookup() {
		let capabilities = RuntimeCapabilities::default()
			.with_pallet("PolkadotXcm", 31, ["transfer_assets", "claim_assets"])
			.with_pallet("Balances", 10, ["transfer_keep_alive"]);
		assert!(capabilities.has_call("PolkadotXcm", "transfer_assets"));
		assert!(!capabilities.has_call("PolkadotXcm", "teleport_assets"));
		assert!(!capabilities.has_call("XTokens", "transfer"));
		assert_eq!(capabilities.pallet("Balances").map(|p| p.index), Some(10));
		assert_eq!(capabilities.first_pallet(&["XcmPallet", "PolkadotXcm"]), Some("PolkadotXcm"));
		assert_eq!(capabilities.first_pallet(&["XTokens"]), None);
	}
}
