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

use super::{network_value_v3, positional_interior, XcmCreator};
use crate::{types::XcmVersion, Error, Junction, Location, NetworkId};
use subxt::dynamic::Value;

/// Creator of XCM v3 values.
pub struct XcmV3;

impl XcmCreator for XcmV3 {
	fn version(&self) -> XcmVersion {
		XcmVersion::V3
	}

	fn network_value(&self, network: &NetworkId) -> Result<Value, Error> {
		Ok(network_value_v3(network))
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

	#[test]
	fn general_keys_carry_their_length() {
		let key = Junction::general_key(&[7]).unwrap();
		let mut data = [0u8; 32];
		data[0] = 7;
		assert_eq!(
			XcmV3.junction_value(&key).unwrap(),
			Value::named_variant(
				"GeneralKey",
				[("length", Value::u128(1)), ("data", Value::from_bytes(data))]
			)
		);
	}

	#[test]
	fn multiple_junctions_are_positional() {
		let location = Location::new(
			2,
			vec![
				Junction::GlobalConsensus(NetworkId::Ethereum { chain_id: 1 }),
				Junction::AccountKey20 { network: None, key: [9; 20] },
			],
		);
		let Value { value, .. } = XcmV3.interior_value(location.interior()).unwrap();
		match value {
			subxt::ext::scale_value::ValueDef::Variant(variant) => {
				assert_eq!(variant.name, "X2");
				assert_eq!(variant.values.len(), 2);
			},
			other => panic!("unexpected interior {other:?}"),
		}
	}
}
