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

//! Transfer entry points and their arguments.

mod pallet_xcm;
mod resolver;
mod xtokens;

pub use pallet_xcm::{claim_assets_call, TypeAndThen};
pub use resolver::{resolve_call, resolve_method, select_pallet, CallRequest, ResolvedCall};

use crate::{
	types::{Direction, WeightLimit},
	xcm::{AssetAmount, XcmCreator},
	Junction, Location,
};
use subxt::{dynamic::Value, ext::scale_value::Composite, tx::DynamicPayload};

/// Names the XCM pallet is deployed under.
pub const XCM_PALLETS: [&str; 2] = ["PolkadotXcm", "XcmPallet"];
/// Names the `xTokens` pallet is deployed under.
pub const XTOKENS_PALLETS: [&str; 2] = ["XTokens", "Xtokens"];

/// The cross-chain transfer entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum XcmMethod {
	TransferAssets,
	TransferAssetsUsingTypeAndThen,
	LimitedTeleportAssets,
	LimitedReserveTransferAssets,
	TeleportAssets,
	ReserveTransferAssets,
	ClaimAssets,
	TransferMultiasset,
	TransferMultiassetWithFee,
	TransferMultiassets,
}

impl XcmMethod {
	/// Whether the method belongs to the `xTokens` pallet.
	pub fn is_xtokens(&self) -> bool {
		matches!(
			self,
			XcmMethod::TransferMultiasset |
				XcmMethod::TransferMultiassetWithFee |
				XcmMethod::TransferMultiassets
		)
	}
}

/// A call of a runtime pallet with named arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeCall {
	pub pallet: String,
	pub call: String,
	pub fields: Vec<(String, Value)>,
}

impl RuntimeCall {
	pub fn new(pallet: impl Into<String>, call: impl Into<String>) -> Self {
		Self { pallet: pallet.into(), call: call.into(), fields: Vec::new() }
	}

	/// Append a named argument.
	pub fn arg(mut self, name: &str, value: Value) -> Self {
		self.fields.push((name.to_string(), value));
		self
	}

	/// The argument called `name`.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|(key, _)| key == name).map(|(_, value)| value)
	}

	/// Human readable method name, e.g. `polkadotXcm::transfer_assets`.
	pub fn method(&self) -> String {
		let mut chars = self.pallet.chars();
		let pallet = match chars.next() {
			Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
			None => String::new(),
		};
		format!("{pallet}::{}", self.call)
	}

	/// The call as a value of the runtime's outer call enum.
	pub fn to_value(&self) -> Value {
		Value::unnamed_variant(
			self.pallet.clone(),
			[Value::named_variant(self.call.clone(), self.fields.clone())],
		)
	}

	/// The call as a subxt transaction payload.
	pub fn to_payload(&self) -> DynamicPayload {
		let fields = Composite::named(self.fields.clone());
		subxt::dynamic::tx(self.pallet.clone(), self.call.clone(), fields)
	}
}

/// Arguments shared by all cross-chain transfer builders.
pub struct CallArgs<'a> {
	pub creator: &'a dyn XcmCreator,
	pub direction: Direction,
	/// The destination as seen from the origin.
	pub dest: &'a Location,
	/// Destination chain id, `None` for bridged destinations.
	pub dest_chain: Option<u32>,
	/// The receiving account.
	pub beneficiary: Junction,
	pub assets: &'a [AssetAmount],
	/// Asset paying for execution on the destination.
	pub fee_asset: Option<&'a Location>,
	pub weight_limit: Option<WeightLimit>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn method_names() {
		assert_eq!(
			XcmMethod::TransferAssetsUsingTypeAndThen.to_string(),
			"transfer_assets_using_type_and_then"
		);
		assert_eq!(XcmMethod::TransferMultiassetWithFee.as_ref(), "transfer_multiasset_with_fee");
		assert!(XcmMethod::TransferMultiassets.is_xtokens());
		assert!(!XcmMethod::ClaimAssets.is_xtokens());
	}

	#[test]
	fn runtime_call_shape() {
		let call = RuntimeCall::new("PolkadotXcm", "claim_assets").arg("assets", Value::u128(1));
		assert_eq!(call.method(), "polkadotXcm::claim_assets");
		assert_eq!(call.field("assets"), Some(&Value::u128(1)));
		assert_eq!(
			call.to_value(),
			Value::unnamed_variant(
				"PolkadotXcm",
				[Value::named_variant("claim_assets", [("assets".to_string(), Value::u128(1))])]
			)
		);
	}
}
