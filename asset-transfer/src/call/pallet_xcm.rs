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

//! Builders for the calls of the XCM pallet.

use super::{CallArgs, RuntimeCall, XcmMethod};
use crate::{
	types::{TransferType, XcmVersion},
	xcm::{deposit_all_counted, normalize_assets, versioned_xcm, AssetAmount, XcmCreator},
	Error, Junction, Location,
};
use subxt::dynamic::Value;

/// How assets and fees travel in a `transfer_assets_using_type_and_then` call, and what runs on
/// the destination once they arrive.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAndThen {
	pub assets_transfer_type: TransferType,
	pub fees_transfer_type: TransferType,
	/// Instructions executed on the destination. Deposits everything to the beneficiary when
	/// absent.
	pub custom_xcm_on_dest: Option<Vec<Value>>,
}

/// Build a call of the XCM pallet named `pallet`.
pub fn build(
	pallet: &str,
	method: XcmMethod,
	args: &CallArgs,
	type_and_then: Option<&TypeAndThen>,
) -> Result<RuntimeCall, Error> {
	let creator = args.creator;
	let call = RuntimeCall::new(pallet, method.as_ref());
	let call = match method {
		XcmMethod::TransferAssets |
		XcmMethod::LimitedTeleportAssets |
		XcmMethod::LimitedReserveTransferAssets => call
			.arg("dest", creator.create_dest(args.dest)?)
			.arg("beneficiary", creator.create_beneficiary(&args.beneficiary)?)
			.arg("assets", creator.create_assets(args.assets)?)
			.arg("fee_asset_item", fee_asset_item(args)?)
			.arg("weight_limit", creator.create_weight_limit(args.weight_limit)),
		XcmMethod::TeleportAssets | XcmMethod::ReserveTransferAssets => call
			.arg("dest", creator.create_dest(args.dest)?)
			.arg("beneficiary", creator.create_beneficiary(&args.beneficiary)?)
			.arg("assets", creator.create_assets(args.assets)?)
			.arg("fee_asset_item", fee_asset_item(args)?),
		XcmMethod::TransferAssetsUsingTypeAndThen => {
			let type_and_then = type_and_then.ok_or_else(|| {
				Error::Internal("type and then transfer without transfer types".into())
			})?;
			type_and_then_call(call, args, type_and_then)?
		},
		other => return Err(Error::Internal(format!("{other} is not an XCM pallet call"))),
	};
	Ok(call)
}

fn fee_asset_item(args: &CallArgs) -> Result<Value, Error> {
	let index = args.creator.create_fee_asset_item(args.assets, args.fee_asset)?;
	Ok(Value::u128(index as u128))
}

fn require_v3(creator: &dyn XcmCreator, what: &str) -> Result<(), Error> {
	if creator.version() < XcmVersion::V3 {
		return Err(Error::InvalidXcmVersion(format!("{what} requires XCM v3 or later")))
	}
	Ok(())
}

fn type_and_then_call(
	call: RuntimeCall,
	args: &CallArgs,
	type_and_then: &TypeAndThen,
) -> Result<RuntimeCall, Error> {
	let creator = args.creator;
	require_v3(creator, "transfer_assets_using_type_and_then")?;
	let sorted = normalize_assets(args.assets);
	let fees_id = match args.fee_asset {
		Some(location) => location.clone(),
		None => sorted
			.first()
			.map(|(location, _)| location.clone())
			.ok_or_else(|| Error::InvalidInput("at least one asset is required".into()))?,
	};
	let custom_xcm = match &type_and_then.custom_xcm_on_dest {
		Some(instructions) => instructions.clone(),
		None => vec![deposit_all_counted(creator, sorted.len() as u32, &args.beneficiary)?],
	};
	Ok(call
		.arg("dest", creator.create_dest(args.dest)?)
		.arg("assets", creator.create_assets(args.assets)?)
		.arg(
			"assets_transfer_type",
			transfer_type_value(creator, &type_and_then.assets_transfer_type)?,
		)
		.arg("remote_fees_id", creator.versioned(creator.asset_id_value(&fees_id)?))
		.arg("fees_transfer_type", transfer_type_value(creator, &type_and_then.fees_transfer_type)?)
		.arg("custom_xcm_on_dest", versioned_xcm(creator, custom_xcm))
		.arg("weight_limit", creator.create_weight_limit(args.weight_limit)))
}

fn transfer_type_value(creator: &dyn XcmCreator, kind: &TransferType) -> Result<Value, Error> {
	Ok(match kind {
		TransferType::Teleport => Value::unnamed_variant("Teleport", []),
		TransferType::LocalReserve => Value::unnamed_variant("LocalReserve", []),
		TransferType::DestinationReserve => Value::unnamed_variant("DestinationReserve", []),
		TransferType::RemoteReserve(reserve) =>
			Value::unnamed_variant("RemoteReserve", [creator.create_dest(reserve)?]),
	})
}

/// `claim_assets` of the XCM pallet, recovering assets trapped on the chain.
pub fn claim_assets_call(
	pallet: &str,
	creator: &dyn XcmCreator,
	assets: &[AssetAmount],
	beneficiary: &Junction,
) -> Result<RuntimeCall, Error> {
	require_v3(creator, "claim_assets")?;
	Ok(RuntimeCall::new(pallet, XcmMethod::ClaimAssets.as_ref())
		.arg("assets", creator.create_assets(assets)?)
		.arg("beneficiary", creator.create_dest(&Location::new(0, vec![*beneficiary]))?))
}
