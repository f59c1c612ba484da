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

//! An in-memory [`ChainClient`] for tests.

use crate::{
	assets::OriginChain,
	call::RuntimeCall,
	client::{BlockRef, ChainClient, RuntimeCapabilities, RuntimeVersion},
	dry_run::ChainConnector,
	Error,
};
use async_trait::async_trait;
use codec::{Compact, Encode};
use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc, Mutex,
};
use subxt::dynamic::Value;
use xcm_asset_registry::{Registry, Relay};

pub const XCM_CALLS: [&str; 7] = [
	"transfer_assets",
	"transfer_assets_using_type_and_then",
	"limited_teleport_assets",
	"limited_reserve_transfer_assets",
	"teleport_assets",
	"reserve_transfer_assets",
	"claim_assets",
];

const BALANCES_CALLS: [&str; 4] =
	["transfer_allow_death", "transfer_keep_alive", "transfer_all", "force_transfer"];
const ASSETS_CALLS: [&str; 3] = ["transfer", "transfer_keep_alive", "transfer_all"];
const XTOKENS_CALLS: [&str; 3] =
	["transfer_multiasset", "transfer_multiasset_with_fee", "transfer_multiassets"];

pub const GENESIS: [u8; 32] = [7; 32];

type StorageEntry = (String, String, Vec<Value>, Value);

#[derive(Debug, Default)]
struct Recorder {
	api_calls: Mutex<Vec<(String, String, Vec<Value>)>>,
	disconnects: AtomicUsize,
}

/// Answers from fixed runtime data and records the runtime API calls it receives.
#[derive(Debug, Clone)]
pub struct MockClient {
	spec_name: String,
	spec_version: u32,
	capabilities: RuntimeCapabilities,
	extensions: Vec<String>,
	storage: Vec<StorageEntry>,
	api_responses: Vec<(String, String, Value)>,
	nonce: u64,
	block: BlockRef,
	recorder: Arc<Recorder>,
}

impl MockClient {
	pub fn new(spec_name: &str) -> Self {
		Self {
			spec_name: spec_name.to_string(),
			spec_version: 1_005_001,
			capabilities: RuntimeCapabilities::default(),
			extensions: [
				"CheckNonZeroSender",
				"CheckSpecVersion",
				"CheckTxVersion",
				"CheckGenesis",
				"CheckMortality",
				"CheckNonce",
				"CheckWeight",
				"ChargeTransactionPayment",
			]
			.map(String::from)
			.to_vec(),
			storage: Vec::new(),
			api_responses: Vec::new(),
			nonce: 5,
			block: BlockRef { number: 100, hash: [9; 32] },
			recorder: Arc::default(),
		}
	}

	/// Polkadot asset hub with the XCM, balances and asset pallets.
	pub fn asset_hub() -> Self {
		Self::new("statemint")
			.with_pallet("Balances", 10, BALANCES_CALLS)
			.with_pallet("PolkadotXcm", 31, XCM_CALLS)
			.with_pallet("Assets", 50, ASSETS_CALLS)
			.with_pallet("ForeignAssets", 53, ASSETS_CALLS)
			.with_pallet("PoolAssets", 55, ASSETS_CALLS)
			.with_extensions(&[
				"CheckNonZeroSender",
				"CheckSpecVersion",
				"CheckTxVersion",
				"CheckGenesis",
				"CheckMortality",
				"CheckNonce",
				"CheckWeight",
				"ChargeAssetTxPayment",
				"CheckMetadataHash",
			])
			.with_storage("PolkadotXcm", "SafeXcmVersion", vec![], Value::u128(4))
			.with_storage("Assets", "Asset", vec![Value::u128(1984)], asset_details())
			.with_storage("Assets", "Asset", vec![Value::u128(1337)], asset_details())
	}

	/// The Polkadot relay chain.
	pub fn relay() -> Self {
		Self::new("polkadot")
			.with_pallet("Balances", 5, BALANCES_CALLS)
			.with_pallet("XcmPallet", 99, XCM_CALLS)
			.with_storage("XcmPallet", "SafeXcmVersion", vec![], Value::u128(3))
	}

	/// Bifrost, a parachain with `XTokens` and an orml `Tokens` pallet.
	pub fn parachain() -> Self {
		Self::new("bifrost_polkadot")
			.with_pallet("Balances", 10, BALANCES_CALLS)
			.with_pallet("PolkadotXcm", 41, XCM_CALLS)
			.with_pallet("XTokens", 70, XTOKENS_CALLS)
			.with_pallet("Tokens", 72, ASSETS_CALLS)
	}

	pub fn with_pallet<'a>(
		mut self,
		name: &str,
		index: u8,
		calls: impl IntoIterator<Item = &'a str>,
	) -> Self {
		self.capabilities = self.capabilities.with_pallet(name, index, calls);
		self
	}

	pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
		self.extensions = extensions.iter().map(|e| e.to_string()).collect();
		self
	}

	pub fn with_storage(
		mut self,
		pallet: &str,
		entry: &str,
		keys: Vec<Value>,
		value: Value,
	) -> Self {
		self.storage.push((pallet.into(), entry.into(), keys, value));
		self
	}

	pub fn with_api_response(mut self, api: &str, method: &str, response: Value) -> Self {
		self.api_responses.push((api.into(), method.into(), response));
		self
	}

	/// Runtime API calls received so far, as `(api, method)`.
	pub fn api_calls(&self) -> Vec<(String, String)> {
		self.api_call_args().into_iter().map(|(api, method, _)| (api, method)).collect()
	}

	/// Runtime API calls received so far, with their arguments.
	pub fn api_call_args(&self) -> Vec<(String, String, Vec<Value>)> {
		self.recorder.api_calls.lock().map(|calls| calls.clone()).unwrap_or_default()
	}

	pub fn disconnects(&self) -> usize {
		self.recorder.disconnects.load(Ordering::SeqCst)
	}

	/// Clients sharing this one's recorder that are still alive, this one included.
	pub fn live_handles(&self) -> usize {
		Arc::strong_count(&self.recorder)
	}

	fn indices(&self, pallet: &str, call: &str) -> Result<(u8, u8), Error> {
		let info = self
			.capabilities
			.pallet(pallet)
			.ok_or_else(|| Error::PalletNotFound(pallet.to_string()))?;
		let call_index = info.calls.iter().position(|name| name == call).ok_or_else(|| {
			Error::RuntimeCallNotFound { pallet: pallet.into(), call: call.into() }
		})?;
		Ok((info.index, call_index as u8))
	}
}

fn asset_details() -> Value {
	Value::named_composite([
		("supply", Value::u128(1_000_000)),
		("is_sufficient", Value::bool(true)),
	])
}

#[async_trait]
impl ChainClient for MockClient {
	async fn runtime_version(&self) -> Result<RuntimeVersion, Error> {
		Ok(RuntimeVersion {
			spec_name: self.spec_name.clone(),
			spec_version: self.spec_version,
			transaction_version: 15,
		})
	}

	fn genesis_hash(&self) -> [u8; 32] {
		GENESIS
	}

	fn capabilities(&self) -> RuntimeCapabilities {
		self.capabilities.clone()
	}

	fn transaction_extensions(&self) -> Vec<String> {
		self.extensions.clone()
	}

	async fn storage(
		&self,
		pallet: &str,
		entry: &str,
		keys: Vec<Value>,
	) -> Result<Option<Value>, Error> {
		Ok(self
			.storage
			.iter()
			.find(|(p, e, k, _)| p == pallet && e == entry && *k == keys)
			.map(|(_, _, _, value)| value.clone()))
	}

	async fn runtime_api_call(
		&self,
		api: &str,
		method: &str,
		args: Vec<Value>,
	) -> Result<Value, Error> {
		if let Ok(mut calls) = self.recorder.api_calls.lock() {
			calls.push((api.to_string(), method.to_string(), args));
		}
		self.api_responses
			.iter()
			.find(|(a, m, _)| a == api && m == method)
			.map(|(_, _, response)| response.clone())
			.ok_or_else(|| Error::Internal(format!("no mocked response for {api}_{method}")))
	}

	/// Pallet and call index, followed by the rendered arguments.
	fn encode_call(&self, call: &RuntimeCall) -> Result<Vec<u8>, Error> {
		let (pallet, index) = self.indices(&call.pallet, &call.call)?;
		let mut encoded = vec![pallet, index];
		for (name, value) in &call.fields {
			encoded.extend(format!("{name}={value};").into_bytes());
		}
		Ok(encoded)
	}

	fn decode_call(&self, call_data: &[u8]) -> Result<Value, Error> {
		let [pallet_index, call_index, ..] = call_data else {
			return Err(Error::InvalidInput("call data too short".into()))
		};
		let (pallet, info) = self
			.capabilities
			.pallet_names()
			.find_map(|name| {
				self.capabilities
					.pallet(name)
					.filter(|info| info.index == *pallet_index)
					.map(|info| (name, info))
			})
			.ok_or_else(|| Error::InvalidInput(format!("unknown pallet {pallet_index}")))?;
		let call = info
			.calls
			.iter()
			.nth(*call_index as usize)
			.ok_or_else(|| Error::InvalidInput(format!("unknown call {call_index}")))?;
		let args = String::from_utf8_lossy(&call_data[2..]).into_owned();
		let call = Value::unnamed_variant(call.clone(), [Value::string(args)]);
		Ok(Value::unnamed_variant(pallet, [call]))
	}

	fn create_unsigned(&self, call: &RuntimeCall) -> Result<Vec<u8>, Error> {
		let mut body = vec![4u8];
		body.extend(self.encode_call(call)?);
		let mut encoded = Compact(body.len() as u32).encode();
		encoded.extend(body);
		Ok(encoded)
	}

	async fn account_nonce(&self, _address: &str) -> Result<u64, Error> {
		Ok(self.nonce)
	}

	async fn latest_block(&self) -> Result<BlockRef, Error> {
		Ok(self.block)
	}

	async fn block_hash(&self, number: u64) -> Result<Option<[u8; 32]>, Error> {
		Ok(Some([number as u8; 32]))
	}

	async fn disconnect(self: Box<Self>) {
		self.recorder.disconnects.fetch_add(1, Ordering::SeqCst);
	}
}

/// Hands out clones of one destination client, sharing its recordings.
pub struct MockConnector {
	pub client: MockClient,
	pub connections: Mutex<Vec<(Relay, u32)>>,
}

impl MockConnector {
	pub fn new(client: MockClient) -> Self {
		Self { client, connections: Mutex::new(Vec::new()) }
	}
}

#[async_trait]
impl ChainConnector for MockConnector {
	async fn connect(&self, relay: Relay, chain_id: u32) -> Result<Box<dyn ChainClient>, Error> {
		if let Ok(mut connections) = self.connections.lock() {
			connections.push((relay, chain_id));
		}
		Ok(Box::new(self.client.clone()))
	}
}

/// Polkadot asset hub as found in the bundled registry.
pub fn asset_hub_origin() -> OriginChain {
	origin(Relay::Polkadot, 1000)
}

pub fn origin(relay: Relay, id: u32) -> OriginChain {
	let registry = Registry::bundled().unwrap();
	OriginChain { relay, id, info: registry.chain(relay, id).unwrap().clone() }
}
