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

//! Simulated execution of transfer calls and fee estimation.
//!
//! A dry run executes the call through the runtime's `DryRunApi` from the sender's account. The
//! effects include the local XCM program and the messages forwarded to other chains; the
//! `XcmPaymentApi` of each chain then converts their weight into a fee in a given asset.

use crate::{
	account::Account,
	assets::OriginChain,
	call::RuntimeCall,
	client::{ChainClient, SubxtClient},
	types::XcmVersion,
	xcm::{creator_for, location_from_value, XcmCreator},
	Error, Location,
};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use subxt::{
	dynamic::Value,
	ext::scale_value::{Composite, ValueDef, Variant},
};
use xcm_asset_registry::Relay;

const LOG_TARGET: &str = "xcm-transfer::dry-run";

const DRY_RUN_API: &str = "DryRunApi";
const XCM_PAYMENT_API: &str = "XcmPaymentApi";

/// Whether the simulated call dispatched successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "result")]
pub enum ExecutionResult {
	Success,
	/// The rendered dispatch error.
	Failure { error: String },
}

/// Messages the call sent to one destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardedXcm {
	/// The destination relative to the origin.
	pub destination: Location,
	pub messages: usize,
	#[serde(skip)]
	pub raw: Vec<Value>,
}

/// The effects of a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunOutcome {
	pub execution_result: ExecutionResult,
	/// Fee of the local XCM program, when a fee asset was given.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub local_xcm_fee: Option<u128>,
	pub forwarded_xcms: Vec<ForwardedXcm>,
	#[serde(skip)]
	pub local_xcm: Option<Value>,
}

impl DryRunOutcome {
	pub fn is_success(&self) -> bool {
		self.execution_result == ExecutionResult::Success
	}
}

/// The execution fee of the messages forwarded to one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationFee {
	pub destination: Location,
	/// `None` when the destination cannot be reached from the configured endpoints.
	pub fee: Option<u128>,
}

/// Opens connections to other chains of a relay network.
#[async_trait]
pub trait ChainConnector: Send + Sync {
	/// Connect to chain `chain_id` of `relay`, `0` being the relay chain.
	async fn connect(&self, relay: Relay, chain_id: u32) -> Result<Box<dyn ChainClient>, Error>;
}

/// Connects over websockets to the endpoints configured per `relay/chain-id`.
#[derive(Debug, Clone, Default)]
pub struct EndpointConnector {
	endpoints: BTreeMap<String, String>,
}

impl EndpointConnector {
	pub fn new(endpoints: BTreeMap<String, String>) -> Self {
		Self { endpoints }
	}

	/// The endpoint of a chain, if configured.
	pub fn endpoint(&self, relay: Relay, chain_id: u32) -> Option<&str> {
		self.endpoints.get(&format!("{relay}/{chain_id}")).map(String::as_str)
	}
}

#[async_trait]
impl ChainConnector for EndpointConnector {
	async fn connect(&self, relay: Relay, chain_id: u32) -> Result<Box<dyn ChainClient>, Error> {
		let url = self.endpoint(relay, chain_id).ok_or_else(|| {
			Error::InvalidInput(format!("no endpoint configured for {relay}/{chain_id}"))
		})?;
		Ok(Box::new(SubxtClient::connect(url).await?))
	}
}

/// Dry run `call` signed by `sender`.
///
/// Forwarded messages are requested in `version`. With a `fee_asset` the weight of the local XCM
/// program is priced in that asset.
pub async fn dry_run_call<C: ChainClient + ?Sized>(
	client: &C,
	call: &RuntimeCall,
	sender: &Account,
	version: XcmVersion,
	fee_asset: Option<&Location>,
) -> Result<DryRunOutcome, Error> {
	let origin = Value::unnamed_variant(
		"system",
		[Value::unnamed_variant("Signed", [Value::from_bytes(sender.as_bytes())])],
	);
	let effects = client
		.runtime_api_call(
			DRY_RUN_API,
			"dry_run_call",
			vec![origin, call.to_value(), Value::u128(version.as_u32().into())],
		)
		.await?;
	let mut outcome = parse_effects(ok_value(&effects, "dry_run_call")?)?;
	log::debug!(
		target: LOG_TARGET,
		"Dry run of {} finished with {:?}, {} forwarded destination(s)",
		call.method(),
		outcome.execution_result,
		outcome.forwarded_xcms.len()
	);

	if let (Some(asset), Some(local_xcm)) = (fee_asset, &outcome.local_xcm) {
		if outcome.is_success() {
			let creator = asset_id_creator(version);
			let fee = weight_to_fee(client, local_xcm, asset_id(creator.as_ref(), asset)?).await?;
			outcome.local_xcm_fee = Some(fee);
		}
	}
	Ok(outcome)
}

/// Price the messages the dry run forwarded, on each of their destinations.
///
/// `fee_asset` is relative to the origin and is re-anchored to every destination. A connection
/// is opened per destination and closed again whether or not the query succeeds.
pub async fn destination_fees(
	connector: &dyn ChainConnector,
	origin: &OriginChain,
	outcome: &DryRunOutcome,
	fee_asset: &Location,
	version: XcmVersion,
) -> Result<Vec<DestinationFee>, Error> {
	let creator = asset_id_creator(version);
	let context = origin.universal_location();
	let mut fees = Vec::with_capacity(outcome.forwarded_xcms.len());
	for forwarded in &outcome.forwarded_xcms {
		let destination = forwarded.destination.clone();
		let Some(chain_id) = chain_id_of(origin, &destination) else {
			log::warn!(
				target: LOG_TARGET,
				"Skipping fee estimation for {destination}, it is outside the relay network"
			);
			fees.push(DestinationFee { destination, fee: None });
			continue
		};
		if forwarded.raw.is_empty() {
			log::warn!(
				target: LOG_TARGET,
				"No messages forwarded to {destination}, nothing to price"
			);
			fees.push(DestinationFee { destination, fee: None });
			continue
		}
		let asset = asset_id(creator.as_ref(), &fee_asset.reanchored(&destination, &context)?)?;

		let client = connector.connect(origin.relay, chain_id).await?;
		let fee = messages_fee(client.as_ref(), &forwarded.raw, &asset).await;
		client.disconnect().await;

		log::debug!(target: LOG_TARGET, "Execution fee on {destination}: {fee:?}");
		fees.push(DestinationFee { destination, fee: Some(fee?) });
	}
	Ok(fees)
}

/// The chain id within the origin's relay network that `destination` points at.
fn chain_id_of(origin: &OriginChain, destination: &Location) -> Option<u32> {
	if destination.contains_global_consensus() {
		return None
	}
	match (origin.id, destination.parents(), destination.interior()) {
		(_, 1, []) => Some(0),
		(0, 0, _) | (_, 1, _) => destination.para_id(),
		_ => None,
	}
}

/// `VersionedAssetId` has no v2 variant.
fn asset_id_creator(version: XcmVersion) -> Box<dyn XcmCreator> {
	creator_for(version.max(XcmVersion::V3))
}

fn asset_id(creator: &dyn XcmCreator, location: &Location) -> Result<Value, Error> {
	Ok(creator.versioned(creator.asset_id_value(location)?))
}

/// Total execution fee of `messages` on the chain `client` is connected to.
async fn messages_fee<C: ChainClient + ?Sized>(
	client: &C,
	messages: &[Value],
	asset_id: &Value,
) -> Result<u128, Error> {
	let mut total = 0u128;
	for message in messages {
		total = total.saturating_add(weight_to_fee(client, message, asset_id.clone()).await?);
	}
	Ok(total)
}

async fn weight_to_fee<C: ChainClient + ?Sized>(
	client: &C,
	message: &Value,
	asset_id: Value,
) -> Result<u128, Error> {
	let weight = client
		.runtime_api_call(XCM_PAYMENT_API, "query_xcm_weight", vec![message.clone()])
		.await?;
	let weight = ok_value(&weight, "query_xcm_weight")?.clone();
	let fee = client
		.runtime_api_call(XCM_PAYMENT_API, "query_weight_to_asset_fee", vec![weight, asset_id])
		.await?;
	ok_value(&fee, "query_weight_to_asset_fee")?
		.as_u128()
		.ok_or_else(|| Error::Internal("query_weight_to_asset_fee did not return a number".into()))
}

fn variant<T>(value: &Value<T>) -> Option<(&str, &Composite<T>)> {
	match &value.value {
		ValueDef::Variant(Variant { name, values }) => Some((name.as_str(), values)),
		_ => None,
	}
}

fn first<T>(values: &Composite<T>) -> Option<&Value<T>> {
	values.values().next()
}

fn field<'a, T>(value: &'a Value<T>, name: &str) -> Result<&'a Value<T>, Error> {
	match &value.value {
		ValueDef::Composite(Composite::Named(fields)) => fields
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value)
			.ok_or_else(|| Error::Internal(format!("dry run effects lack `{name}`"))),
		_ => Err(Error::Internal(format!("expected a struct holding `{name}`"))),
	}
}

/// Unwrap the `Ok` of a runtime API `Result`; an `Err` becomes [`Error::Internal`].
fn ok_value<'a>(value: &'a Value, method: &str) -> Result<&'a Value, Error> {
	match variant(value) {
		Some(("Ok", values)) => first(values)
			.ok_or_else(|| Error::Internal(format!("{method} returned an empty result"))),
		Some(("Err", values)) => Err(Error::Internal(format!(
			"{method} failed: {}",
			first(values).map(ToString::to_string).unwrap_or_default()
		))),
		_ => Err(Error::Internal(format!("{method} returned an unexpected value: {value}"))),
	}
}

/// Read `CallDryRunEffects`.
fn parse_effects(effects: &Value) -> Result<DryRunOutcome, Error> {
	let execution_result = match variant(field(effects, "execution_result")?) {
		Some(("Ok", _)) => ExecutionResult::Success,
		Some(("Err", values)) => {
			let error = first(values)
				.map(|info| field(info, "error").unwrap_or(info).to_string())
				.unwrap_or_default();
			ExecutionResult::Failure { error }
		},
		_ => return Err(Error::Internal("malformed dry run execution result".into())),
	};

	let local_xcm = match variant(field(effects, "local_xcm")?) {
		Some(("Some", values)) => first(values).cloned(),
		_ => None,
	};

	let forwarded_xcms = match &field(effects, "forwarded_xcms")?.value {
		ValueDef::Composite(entries) => entries
			.values()
			.map(parse_forwarded)
			.collect::<Result<Vec<_>, _>>()?,
		_ => return Err(Error::Internal("malformed forwarded xcms".into())),
	};

	Ok(DryRunOutcome { execution_result, local_xcm_fee: None, forwarded_xcms, local_xcm })
}

/// Read a `(VersionedLocation, Vec<VersionedXcm>)` entry.
fn parse_forwarded(entry: &Value) -> Result<ForwardedXcm, Error> {
	let ValueDef::Composite(Composite::Unnamed(parts)) = &entry.value else {
		return Err(Error::Internal("malformed forwarded xcm entry".into()))
	};
	let [destination, messages] = &parts[..] else {
		return Err(Error::Internal("malformed forwarded xcm entry".into()))
	};
	let raw: Vec<Value> = match &messages.value {
		ValueDef::Composite(messages) => messages.values().cloned().collect(),
		_ => Vec::new(),
	};
	Ok(ForwardedXcm { destination: location_from_value(destination)?, messages: raw.len(), raw })
}
