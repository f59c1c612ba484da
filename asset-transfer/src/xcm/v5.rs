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

use super::{array_interior, network_value_v3, XcmCreator};
use crate::{
	location::{ROCOCO_GENESIS_HASH, WESTEND_GENESIS_HASH},
	types::XcmVersion,
	Error, Junction, Location, NetworkId,
};
use subxt::dynamic::Value;

/// Creator of XCM v5 values.
///
/// v5 dropped the dedicated test network ids; Westend and Rococo are addressed by genesis hash.
pub struct XcmV5;

impl XcmCreator for XcmV5 {
	fn version(&self) -> XcmVersion {
		XcmVersion::V5
	}

	fn network_value(&self, network: &NetworkId) -> Result<Value, Error> {
		match network {
			NetworkId::Westend => Ok(network_value_v3(&NetworkId::ByGenesis(WESTEND_GENESIS_HASH))),
			NetworkId::Rococo => Ok(network_value_v3(&NetworkId::ByGenesis(ROCOCO_GENESIS_HASH))),
			NetworkId::Wococo =>
				Err(Error::InvalidXcmVersion("Wococo is not a valid network in XCM v5".into())),
			other => Ok(network_value_v3(other)),
		}
	}

	fn interior_value(&self, junctions: &[Junction]) -> Result<Value, Error> {
		array_interior(self, junctions)
	}

	fn asset_id_value(&self, location: &Location) -> Result<Value, Error> {
		Ok(Value::unnamed_composite([self.location_value(location)?]))
	}
}
