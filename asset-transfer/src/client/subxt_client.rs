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

use super::{BlockRef, ChainClient, RuntimeCapabilities, RuntimeVersion};
use crate::{call::RuntimeCall, Error};
use async_trait::async_trait;
use std::time::Duration;
use subxt::{
	backend::{
		legacy::{rpc_methods::BlockNumber, LegacyRpcMethods},
		rpc::{
			reconnecting_rpc_client::{ExponentialBackoff, RpcClient as ReconnectingRpcClient},
			RpcClient,
		},
	},
	dynamic::Value,
	ext::{scale_value, subxt_rpcs::rpc_params},
	OnlineClient, PolkadotConfig,
};

const LOG_TARGET: &str = "xcm-transfer::client";

/// A [`ChainClient`] backed by a subxt websocket connection.
///
/// The client owns every handle of its rpc client, so the websocket is closed once it is
/// disconnected or dropped.
pub struct SubxtClient {
	api: OnlineClient<PolkadotConfig>,
	rpc_client: RpcClient,
	rpc: LegacyRpcMethods<PolkadotConfig>,
	url: String,
}

impl SubxtClient {
	/// Connect to the node at `url`.
	pub async fn connect(url: &str) -> Result<Self, Error> {
		log::info!(target: LOG_TARGET, "Connecting to node at: {url} ...");
		let rpc_client = ReconnectingRpcClient::builder()
			.retry_policy(ExponentialBackoff::from_millis(100).max_delay(Duration::from_secs(10)))
			.build(url.to_string())
			.await
			.map_err(|err| Error::Internal(format!("cannot connect to {url}: {err}")))?;
		let rpc_client = RpcClient::new(rpc_client);
		log::info!(target: LOG_TARGET, "Connected to node at: {url}");

		let api = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client.clone()).await?;
		let rpc = LegacyRpcMethods::<PolkadotConfig>::new(rpc_client.clone());
		Ok(Self { api, rpc_client, rpc, url: url.to_string() })
	}

	/// The underlying subxt client.
	pub fn api(&self) -> &OnlineClient<PolkadotConfig> {
		&self.api
	}
}

#[async_trait]
impl ChainClient for SubxtClient {
	async fn runtime_version(&self) -> Result<RuntimeVersion, Error> {
		let version = self.rpc.state_get_runtime_version(None).await?;
		let spec_name = version
			.other
			.get("specName")
			.and_then(|name| name.as_str())
			.ok_or_else(|| Error::Internal("runtime version lacks a spec name".into()))?;
		Ok(RuntimeVersion {
			spec_name: spec_name.to_string(),
			spec_version: version.spec_version,
			transaction_version: version.transaction_version,
		})
	}

	fn genesis_hash(&self) -> [u8; 32] {
		self.api.genesis_hash().0
	}

	fn capabilities(&self) -> RuntimeCapabilities {
		self.api.metadata().pallets().fold(RuntimeCapabilities::default(), |caps, pallet| {
			let calls = pallet.call_variants().unwrap_or_default();
			caps.with_pallet(pallet.name(), pallet.index(), calls.iter().map(|v| v.name.as_str()))
		})
	}

	fn transaction_extensions(&self) -> Vec<String> {
		self.api
			.metadata()
			.extrinsic()
			.transaction_extensions_to_use_for_encoding()
			.map(|extension| extension.identifier().to_string())
			.collect()
	}

	async fn storage(
		&self,
		pallet: &str,
		entry: &str,
		keys: Vec<Value>,
	) -> Result<Option<Value>, Error> {
		let address = subxt::dynamic::storage(pallet, entry, keys);
		let value = self.api.storage().at_latest().await?.fetch(&address).await?;
		value.map(|thunk| Ok(thunk.to_value().map_err(subxt::Error::from)?.remove_context())).transpose()
	}

	async fn runtime_api_call(
		&self,
		api: &str,
		method: &str,
		args: Vec<Value>,
	) -> Result<Value, Error> {
		log::debug!(target: LOG_TARGET, "Calling {api}_{method} on {}", self.url);
		let payload = subxt::dynamic::runtime_api_call(api, method, args);
		let result = self.api.runtime_api().at_latest().await?.call(payload).await?;
		Ok(result.to_value().map_err(subxt::Error::from)?.remove_context())
	}

	fn encode_call(&self, call: &RuntimeCall) -> Result<Vec<u8>, Error> {
		Ok(self.api.tx().call_data(&call.to_payload())?)
	}

	fn decode_call(&self, call_data: &[u8]) -> Result<Value, Error> {
		let metadata = self.api.metadata();
		let call_ty = metadata.outer_enums().call_enum_ty();
		let value =
			scale_value::scale::decode_as_type(&mut &call_data[..], call_ty, metadata.types())
				.map_err(|err| Error::InvalidInput(format!("cannot decode call: {err}")))?;
		Ok(value.remove_context())
	}

	fn create_unsigned(&self, call: &RuntimeCall) -> Result<Vec<u8>, Error> {
		Ok(self.api.tx().create_unsigned(&call.to_payload())?.into_encoded())
	}

	async fn account_nonce(&self, address: &str) -> Result<u64, Error> {
		let nonce = self
			.rpc_client
			.request::<u64>("system_accountNextIndex", rpc_params![address])
			.await?;
		Ok(nonce)
	}

	async fn latest_block(&self) -> Result<BlockRef, Error> {
		let block = self.api.blocks().at_latest().await?;
		Ok(BlockRef { number: block.number().into(), hash: block.hash().0 })
	}

	async fn block_hash(&self, number: u64) -> Result<Option<[u8; 32]>, Error> {
		let hash = self.rpc.chain_get_block_hash(Some(BlockNumber::from(number))).await?;
		Ok(hash.map(|hash| hash.0))
	}

	async fn disconnect(self: Box<Self>) {
		let Self { api, rpc_client, rpc, url } = *self;
		// the reconnecting client stops its background task with its last handle
		drop((api, rpc, rpc_client));
		log::debug!(target: LOG_TARGET, "Disconnected from {url}");
	}
}
