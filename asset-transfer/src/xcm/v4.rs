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
use crate::{types::XcmVersion, Error, Junction, Location, NetworkId};
use subxt::dynamic::Value;

/// Creator of XCM v4 values.
pub struct XcmV4;

impl XcmCreator for XcmV4 {
	fn version(&self) -> XcmVersion {
		XcmVersion::V4
	}

	fn network_value(&self, network: &NetworkId) -> Result<Value, Error> {
		Ok(network_value_v3(network))
	}

	fn interior_value(&self, junctions: &[Junction]) -> Result<Value, Error> {
		array_interior(self, junctions)
	}

	fn asset_id_value(&self, location: &Location) -> Result<Value, Error> {
		Ok(Value::unnamed_composite([self.location_value(location)?]))
	}
}
