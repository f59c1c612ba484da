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

use super::{positional_interior, XcmCreator};
use crate::{types::XcmVersion, Error, Junction, Location, NetworkId};
use subxt::dynamic::Value;

/// Creator of XCM v2 values.
pub struct XcmV2;

impl XcmCreator for XcmV2 {
	fn version(&self) -> XcmVersion {
		XcmVersion::V2
	}

	fn network_value(&self, network: &NetworkId) -> Result<Value, Error> {
		match network {
			NetworkId::Polkadot => Ok(Value::unnamed_variant("Polkadot", [])),
			NetworkId::Kusama => Ok(Value::unnamed_variant("Kusama", [])),
			other => Err(Error::InvalidXcmVersion(format!(
				"network {other:?} cannot be expressed in XCM v2"
			))),
		}
	}

	fn account_network_value(&self, network: &Option<NetworkId>) -> Result<Value, Error> {
		match network {
			None => Ok(Value::unnamed_variant("Any", [])),
			Some(network) => self.network_value(network),
		}
	}

	fn junction_value(&self, junction: &Junction) -> Result<Value, Error> {
		match junction {
			Junction::GeneralKey { length, data } => Ok(Value::unnamed_variant(
				"GeneralKey",
				[Value::from_bytes(&data[..(*length as usize).min(data.len())])],
			)),
			Junction::GlobalConsensus(_) => Err(Error::InvalidXcmVersion(
				"global consensus locations require XCM v3 or later".into(),
			)),
			Junction::AccountId32 { network, id } => Ok(Value::named_variant(
				"AccountId32",
				[("network", self.account_network_value(network)?), ("id", Value::from_bytes(id))],
			)),
			Junction::AccountIndex64 { network, index } => Ok(Value::named_variant(
				"AccountIndex64",
				[
					("network", self.account_network_value(network)?),
					("index", Value::u128(*index as u128)),
				],
			)),
			Junction::AccountKey20 { network, key } => Ok(Value::named_variant(
				"AccountKey20",
				[
					("network", self.account_network_value(network)?),
					("key", Value::from_bytes(key)),
				],
			)),
			Junction::Parachain(id) =>
				Ok(Value::unnamed_variant("Parachain", [Value::u128(*id as u128)])),
			Junction::PalletInstance(index) =>
				Ok(Value::unnamed_variant("PalletInstance", [Value::u128(*index as u128)])),
			Junction::GeneralIndex(index) =>
				Ok(Value::unnamed_variant("GeneralIndex", [Value::u128(*index)])),
			Junction::OnlyChild => Ok(Value::unnamed_variant("OnlyChild", [])),
		}
	}

	fn interior_value(&self, junctions: &[Junction]) -> Result<Value, Error> {
		positional_interior(self, junctions)
	}

	fn asset_id_value(&self, location: &Location) -> Result<Value, Error> {
		Ok(Value::unnamed_variant("Concrete", [self.location_value(location)?]))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn unspecified_networks_are_any() {
		let account = Junction::AccountId32 { network: None, id: [0; 32] };
		assert_eq!(
			XcmV2.junction_value(&account).unwrap(),
			Value::named_variant(
				"AccountId32",
				[("network", Value::unnamed_variant("Any", [])), ("id", Value::from_bytes([0; 32]))]
			)
		);
	}

	#[test]
	fn general_keys_are_plain_bytes() {
		let key = Junction::general_key(&[0, 1]).unwrap();
		assert_eq!(
			XcmV2.junction_value(&key).unwrap(),
			Value::unnamed_variant("GeneralKey", [Value::from_bytes([0, 1])])
		);
	}

	#[test]
	fn global_consensus_is_not_expressible() {
		let bridged = Location::new(2, vec![Junction::GlobalConsensus(NetworkId::Kusama)]);
		assert_matches!(XcmV2.location_value(&bridged), Err(Error::InvalidXcmVersion(_)));
		let westend = Junction::AccountId32 { network: Some(NetworkId::Westend), id: [0; 32] };
		assert_matches!(XcmV2.junction_value(&westend), Err(Error::InvalidXcmVersion(_)));
	}
}
