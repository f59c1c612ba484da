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

//! Builders for the calls of the `xTokens` pallet.

use super::{CallArgs, RuntimeCall, XcmMethod};
use crate::{
	types::Direction,
	xcm::{self, normalize_assets, AssetAmount},
	Error, Location,
};
use subxt::dynamic::Value;

/// Build a call of the `xTokens` pallet named `pallet`.
///
/// The single asset methods reject requests carrying more assets than they can express. Towards
/// the relay chain only the relay token can be sent. `transfer_multiasset_with_fee` sends the one
/// asset besides the fee asset and pays with the fee asset's transferred amount when it is among
/// the assets, else with the sent amount.
pub fn build(pallet: &str, method: XcmMethod, args: &CallArgs) -> Result<RuntimeCall, Error> {
	let creator = args.creator;
	let dest_chain = args.dest_chain.ok_or_else(|| {
		Error::InvalidInput(format!("xTokens cannot transfer to {}", args.dest))
	})?;
	let dest = xcm::xtokens::create_dest(creator, dest_chain, &args.beneficiary)?;
	let assets = normalize_assets(args.assets);
	if assets.is_empty() {
		return Err(Error::InvalidInput("at least one asset is required".into()))
	}
	let call = RuntimeCall::new(pallet, method.as_ref());
	let call = match method {
		XcmMethod::TransferMultiasset => {
			let (location, amount) = single_asset(method, &assets)?;
			if args.direction == Direction::ParaToRelay && *location != Location::parent() {
				return Err(Error::InvalidInput(format!(
					"xTokens only sends the relay token to the relay chain, got {location}"
				)))
			}
			call.arg("asset", creator.create_asset(location, *amount)?)
		},
		XcmMethod::TransferMultiassetWithFee => {
			let fee = args.fee_asset.ok_or_else(|| {
				Error::Internal("transfer_multiasset_with_fee without a fee asset".into())
			})?;
			let fee_entry = assets.iter().find(|(location, _)| location == fee);
			let sent: Vec<AssetAmount> =
				assets.iter().filter(|(location, _)| location != fee).cloned().collect();
			let (location, amount) = match (sent.as_slice(), fee_entry) {
				([], Some(fee_entry)) => fee_entry,
				_ => single_asset(method, &sent)?,
			};
			let fee_amount = fee_entry.map_or(*amount, |(_, amount)| *amount);
			call.arg("asset", creator.create_asset(location, *amount)?)
				.arg("fee", creator.create_asset(fee, fee_amount)?)
		},
		XcmMethod::TransferMultiassets => call
			.arg("assets", creator.create_assets(&assets)?)
			.arg(
				"fee_item",
				Value::u128(creator.create_fee_asset_item(&assets, args.fee_asset)? as u128),
			),
		other => return Err(Error::Internal(format!("{other} is not an xTokens call"))),
	};
	Ok(call
		.arg("dest", dest)
		.arg("dest_weight_limit", creator.create_weight_limit(args.weight_limit)))
}

fn single_asset(method: XcmMethod, assets: &[AssetAmount]) -> Result<&AssetAmount, Error> {
	match assets {
		[asset] => Ok(asset),
		_ => Err(Error::InvalidInput(format!(
			"xTokens::{method} sends a single asset, got {}",
			assets.len()
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		types::{Direction, XcmVersion},
		xcm::creator_for,
		Junction, Location,
	};
	use assert_matches::assert_matches;

	const ALICE: Junction = Junction::AccountId32 { network: None, id: [1; 32] };

	#[test]
	fn destination_names_the_beneficiary() {
		let creator = creator_for(XcmVersion::V3);
		let dest = Location::new(1, vec![Junction::Parachain(1000)]);
		let assets = [(Location::here(), 5)];
		let args = CallArgs {
			creator: creator.as_ref(),
			direction: Direction::ParaToSystem,
			dest: &dest,
			dest_chain: Some(1000),
			beneficiary: ALICE,
			assets: &assets,
			fee_asset: None,
			weight_limit: None,
		};
		let call = build("XTokens", XcmMethod::TransferMultiasset, &args).unwrap();
		assert_eq!(
			call.field("dest"),
			Some(
				&creator
					.create_dest(&Location::new(1, vec![Junction::Parachain(1000), ALICE]))
					.unwrap()
			)
		);
		assert_eq!(call.field("asset"), Some(&creator.create_asset(&Location::here(), 5).unwrap()));
		assert!(call.field("dest_weight_limit").is_some());
	}

	#[test]
	fn fee_variants() {
		let creator = creator_for(XcmVersion::V4);
		let dest = Location::parent();
		let usdt =
			Location::new(1, vec![Junction::Parachain(1000), Junction::PalletInstance(50)]);
		let assets = [(usdt.clone(), 5), (Location::parent(), 7)];
		let fee = Location::parent();
		let args = CallArgs {
			creator: creator.as_ref(),
			direction: Direction::ParaToPara,
			dest: &dest,
			dest_chain: Some(2000),
			beneficiary: ALICE,
			assets: &assets,
			fee_asset: Some(&fee),
			weight_limit: None,
		};
		let call = build("XTokens", XcmMethod::TransferMultiassetWithFee, &args).unwrap();
		assert_eq!(call.field("fee"), Some(&creator.create_asset(&fee, 7).unwrap()));

		let call = build("XTokens", XcmMethod::TransferMultiassets, &args).unwrap();
		assert_eq!(call.field("fee_item"), Some(&Value::u128(0)));

		let bridged = CallArgs { dest_chain: None, ..args };
		assert_matches!(
			build("XTokens", XcmMethod::TransferMultiasset, &bridged),
			Err(Error::InvalidInput(_))
		);
	}

	#[test]
	fn fee_asset_outside_the_assets_pays_with_the_sent_amount() {
		let creator = creator_for(XcmVersion::V3);
		let dest = Location::parent();
		let usdt = Location::new(1, vec![Junction::Parachain(1000), Junction::GeneralIndex(1984)]);
		let assets = [(usdt.clone(), 5)];
		let fee = Location::parent();
		let args = CallArgs {
			creator: creator.as_ref(),
			direction: Direction::ParaToSystem,
			dest: &dest,
			dest_chain: Some(1000),
			beneficiary: ALICE,
			assets: &assets,
			fee_asset: Some(&fee),
			weight_limit: None,
		};
		let call = build("XTokens", XcmMethod::TransferMultiassetWithFee, &args).unwrap();
		assert_eq!(call.field("asset"), Some(&creator.create_asset(&usdt, 5).unwrap()));
		assert_eq!(call.field("fee"), Some(&creator.create_asset(&fee, 5).unwrap()));
	}

	#[test]
	fn single_asset_methods_do_not_drop_assets() {
		let creator = creator_for(XcmVersion::V3);
		let dest = Location::parent();
		let usdt = Location::new(1, vec![Junction::Parachain(1000), Junction::GeneralIndex(1984)]);
		let bnc = Location::new(0, vec![Junction::GeneralIndex(1)]);
		let three = [(Location::parent(), 1), (usdt.clone(), 2), (bnc, 3)];
		let to_relay = CallArgs {
			creator: creator.as_ref(),
			direction: Direction::ParaToRelay,
			dest: &dest,
			dest_chain: Some(0),
			beneficiary: ALICE,
			assets: &three,
			fee_asset: None,
			weight_limit: None,
		};
		assert_matches!(
			build("XTokens", XcmMethod::TransferMultiasset, &to_relay),
			Err(Error::InvalidInput(_))
		);

		let not_relay_token = [(usdt, 2)];
		let args = CallArgs { assets: &not_relay_token, ..to_relay };
		assert_matches!(
			build("XTokens", XcmMethod::TransferMultiasset, &args),
			Err(Error::InvalidInput(_))
		);

		let relay_token = [(Location::parent(), 1)];
		let args = CallArgs { assets: &relay_token, ..to_relay };
		assert!(build("XTokens", XcmMethod::TransferMultiasset, &args).is_ok());

		let fee = Location::parent();
		let args = CallArgs {
			direction: Direction::ParaToPara,
			dest_chain: Some(2034),
			fee_asset: Some(&fee),
			..to_relay
		};
		assert_matches!(
			build("XTokens", XcmMethod::TransferMultiassetWithFee, &args),
			Err(Error::InvalidInput(_))
		);
	}
}
