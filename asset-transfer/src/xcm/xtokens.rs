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

//! Arguments specific to the `xTokens` pallet.
//!
//! Unlike the XCM pallet, `xTokens` takes a single destination that already names the
//! receiving account, always expressed from the parachain sending the assets.

use super::XcmCreator;
use crate::{Error, Junction, Location};
use subxt::dynamic::Value;

/// The receiving account on `dest_chain` (`0` for the relay chain), seen from a parachain.
pub fn dest_location(dest_chain: u32, beneficiary: &Junction) -> Location {
	match dest_chain {
		0 => Location::new(1, vec![*beneficiary]),
		id => Location::new(1, vec![Junction::Parachain(id), *beneficiary]),
	}
}

/// The `VersionedLocation` passed as `dest` to `xTokens` calls.
pub fn create_dest(
	creator: &dyn XcmCreator,
	dest_chain: u32,
	beneficiary: &Junction,
) -> Result<Value, Error> {
	creator.create_dest(&dest_location(dest_chain, beneficiary))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{types::XcmVersion, xcm::creator_for};

	#[test]
	fn destination_embeds_the_beneficiary() {
		let alice = Junction::AccountId32 { network: None, id: [1; 32] };
		assert_eq!(
			dest_location(2004, &alice),
			Location::new(1, vec![Junction::Parachain(2004), alice])
		);
		assert_eq!(dest_location(0, &alice), Location::new(1, vec![alice]));

		let creator = creator_for(XcmVersion::V3);
		assert_eq!(
			create_dest(creator.as_ref(), 0, &alice).unwrap(),
			creator.create_dest(&Location::new(1, vec![alice])).unwrap()
		);
	}
}
