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

//! Types shared by the transfer builders.

use crate::{
	dry_run::{DestinationFee, DryRunOutcome},
	Error, Location,
};
use serde::{Deserialize, Serialize, Serializer};

/// The topological relationship between origin and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Direction {
	Local,
	SystemToRelay,
	SystemToSystem,
	SystemToPara,
	SystemToBridge,
	RelayToSystem,
	RelayToPara,
	RelayToBridge,
	ParaToRelay,
	ParaToSystem,
	ParaToPara,
	ParaToEthereum,
}

impl Direction {
	/// Whether the transfer starts on a general purpose parachain.
	pub fn is_from_para(&self) -> bool {
		matches!(
			self,
			Direction::ParaToRelay |
				Direction::ParaToSystem |
				Direction::ParaToPara |
				Direction::ParaToEthereum
		)
	}

	/// Whether the destination lives in another consensus system.
	pub fn is_bridged(&self) -> bool {
		matches!(
			self,
			Direction::SystemToBridge | Direction::RelayToBridge | Direction::ParaToEthereum
		)
	}
}

/// Flags describing origin and destination; the input of direction classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainTopology {
	pub is_origin_relay: bool,
	pub is_origin_system_chain: bool,
	pub is_origin_general_chain: bool,
	pub is_dest_relay: bool,
	pub is_dest_system_chain: bool,
	pub is_dest_general_chain: bool,
	pub is_dest_bridge: bool,
	pub is_dest_ethereum: bool,
}

/// Whether the assets are native to the origin chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AssetType {
	Native,
	Foreign,
}

/// The family of XCM instructions a transfer may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AssetCallType {
	Teleport,
	Reserve,
}

/// A supported XCM version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum XcmVersion {
	V2,
	V3,
	V4,
	V5,
}

impl XcmVersion {
	pub fn as_u32(&self) -> u32 {
		match self {
			XcmVersion::V2 => 2,
			XcmVersion::V3 => 3,
			XcmVersion::V4 => 4,
			XcmVersion::V5 => 5,
		}
	}

	/// Name of the variant wrapping values of this version, e.g. `V3`.
	pub fn variant(&self) -> &'static str {
		match self {
			XcmVersion::V2 => "V2",
			XcmVersion::V3 => "V3",
			XcmVersion::V4 => "V4",
			XcmVersion::V5 => "V5",
		}
	}
}

impl TryFrom<u32> for XcmVersion {
	type Error = Error;

	fn try_from(version: u32) -> Result<Self, Self::Error> {
		match version {
			2 => Ok(XcmVersion::V2),
			3 => Ok(XcmVersion::V3),
			4 => Ok(XcmVersion::V4),
			5 => Ok(XcmVersion::V5),
			other => Err(Error::InvalidXcmVersion(format!(
				"version {other} is not supported, expected one of 2, 3, 4 or 5"
			))),
		}
	}
}

impl Serialize for XcmVersion {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u32(self.as_u32())
	}
}

/// Output shape of a constructed transaction.
#[derive(
	Debug,
	Clone,
	Copy,
	Default,
	PartialEq,
	Eq,
	Serialize,
	Deserialize,
	strum::Display,
	strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Format {
	/// The SCALE encoded call.
	#[default]
	Call,
	/// The payload to be signed by the sender.
	Payload,
	/// An unsigned extrinsic.
	Submittable,
}

/// An explicit weight limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLimit {
	pub ref_time: u64,
	pub proof_size: u64,
}

/// How assets or fees travel in a type-and-then transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferType {
	Teleport,
	LocalReserve,
	DestinationReserve,
	RemoteReserve(Location),
}

impl TransferType {
	/// Parse a transfer type name; `RemoteReserve` needs the reserve location as JSON.
	pub fn parse(kind: &str, remote_reserve: Option<&str>) -> Result<Self, Error> {
		match kind.to_ascii_lowercase().as_str() {
			"teleport" => Ok(TransferType::Teleport),
			"localreserve" => Ok(TransferType::LocalReserve),
			"destinationreserve" => Ok(TransferType::DestinationReserve),
			"remotereserve" => {
				let location = remote_reserve.ok_or_else(|| {
					Error::InvalidInput("RemoteReserve requires a reserve location".into())
				})?;
				Ok(TransferType::RemoteReserve(Location::from_json_str(location)?))
			},
			other => Err(Error::InvalidInput(format!("unknown transfer type `{other}`"))),
		}
	}
}

/// Options accepted by the transaction builders.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
	/// Output shape.
	pub format: Format,
	/// XCM version to build messages with. Defaults to the chain's safe version.
	pub xcm_version: Option<u32>,
	/// Asset paying the transaction fee on the origin chain (payload format only).
	pub pays_with_fee_origin: Option<String>,
	/// Asset paying the execution fee on the destination.
	pub pays_with_fee_dest: Option<String>,
	/// Weight limit for execution on the destination. Unlimited when absent.
	pub weight_limit: Option<WeightLimit>,
	/// The assets are liquidity-pool tokens.
	pub is_liquid_token_transfer: bool,
	/// The assets live in the `ForeignAssets` pallet.
	pub is_foreign_assets_transfer: bool,
	/// Sender, required by the payload format and dry runs.
	pub sender_address: Option<String>,
	/// Force a specific XCM pallet: `xTokens`, `polkadotXcm` or `xcmPallet`.
	pub xcm_pallet_override: Option<String>,
	/// How the assets travel, for bridged transfers.
	pub asset_transfer_type: Option<TransferType>,
	/// How the fees travel, for bridged transfers.
	pub fees_transfer_type: Option<TransferType>,
	/// Instructions executed on the destination after the assets arrive.
	pub custom_xcm_on_dest: Option<serde_json::Value>,
	/// Simulate the transaction after building it.
	pub dry_run_call: bool,
	/// Asset to quote the local execution fee in when dry running.
	pub xcm_fee_asset: Option<String>,
	/// Local transfers must not reap the sender.
	pub keep_alive: bool,
	/// Local transfers move the sender's whole balance.
	pub transfer_all: bool,
}

/// The outcome of a construction request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
	/// Spec name of the origin chain.
	pub origin: String,
	/// Spec name of the destination chain, or the destination location for bridged transfers.
	pub dest: String,
	pub direction: Direction,
	/// Pallet and call, e.g. `polkadotXcm::transfer_assets`.
	pub method: String,
	/// `None` for local transfers.
	pub xcm_version: Option<XcmVersion>,
	pub format: Format,
	/// Hex encoded transaction in the requested format.
	pub tx: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dry_run: Option<DryRunOutcome>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub destination_fees: Option<Vec<DestinationFee>>,
}
