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

//! Selection of the pallet and entry point a transfer is built with.
//!
//! The choice only depends on the transfer's classification and on the pallets and calls the
//! connected runtime exposes, so it is made here without touching the chain.

use super::{
	pallet_xcm, xtokens, CallArgs, RuntimeCall, TypeAndThen, XcmMethod, XCM_PALLETS,
	XTOKENS_PALLETS,
};
use crate::{
	client::RuntimeCapabilities,
	types::{AssetCallType, Direction, TransferType},
	xcm::normalize_assets,
	Error, Junction, Location,
};
use subxt::dynamic::Value;

const LOG_TARGET: &str = "xcm-transfer::resolver";

/// Para id of the asset hub, the reserve of bridged assets for parachains.
const ASSET_HUB_PARA_ID: u32 = 1000;

/// Pick the pallet a transfer is sent through.
///
/// An explicit override wins. Otherwise parachains use `xTokens` when they have it, except
/// towards Ethereum, and everything else goes through the XCM pallet.
pub fn select_pallet(
	capabilities: &RuntimeCapabilities,
	direction: Direction,
	pallet_override: Option<&str>,
) -> Result<&'static str, Error> {
	if let Some(requested) = pallet_override {
		let candidates: &[&'static str] = match requested.to_ascii_lowercase().as_str() {
			"xtokens" => &XTOKENS_PALLETS,
			"polkadotxcm" => &["PolkadotXcm"],
			"xcmpallet" => &["XcmPallet"],
			_ => return Err(Error::InvalidInput(format!("unknown XCM pallet `{requested}`"))),
		};
		return capabilities
			.first_pallet(candidates)
			.ok_or_else(|| Error::PalletNotFound(requested.to_string()))
	}
	let uses_xtokens = matches!(
		direction,
		Direction::ParaToRelay | Direction::ParaToSystem | Direction::ParaToPara
	);
	if uses_xtokens {
		if let Some(pallet) = capabilities.first_pallet(&XTOKENS_PALLETS) {
			return Ok(pallet)
		}
	}
	capabilities
		.first_pallet(&XCM_PALLETS)
		.ok_or_else(|| Error::PalletNotFound(XCM_PALLETS.join(" or ")))
}

/// What the choice of entry point depends on.
#[derive(Debug, Clone, Copy)]
pub struct MethodQuery<'a> {
	pub capabilities: &'a RuntimeCapabilities,
	pub pallet: &'a str,
	pub direction: Direction,
	pub call_type: AssetCallType,
	pub asset_count: usize,
	pub has_fee_asset: bool,
	pub has_transfer_type_overrides: bool,
}

/// Pick the entry point and confirm the runtime has it.
pub fn resolve_method(query: &MethodQuery) -> Result<XcmMethod, Error> {
	let method = if XTOKENS_PALLETS.contains(&query.pallet) {
		xtokens_method(query)
	} else {
		xcm_pallet_method(query)
	};
	if !query.capabilities.has_call(query.pallet, method.as_ref()) {
		return Err(Error::RuntimeCallNotFound {
			pallet: query.pallet.to_string(),
			call: method.to_string(),
		})
	}
	log::debug!(
		target: LOG_TARGET,
		"Resolved {}::{method} for {} ({})",
		query.pallet,
		query.direction,
		query.call_type
	);
	Ok(method)
}

/// Relay transfers only carry the relay token. A fee asset selects the fee variant whatever the
/// number of assets.
fn xtokens_method(query: &MethodQuery) -> XcmMethod {
	match query.direction {
		Direction::ParaToRelay => XcmMethod::TransferMultiasset,
		_ if query.has_fee_asset => XcmMethod::TransferMultiassetWithFee,
		_ if query.asset_count == 1 => XcmMethod::TransferMultiasset,
		_ => XcmMethod::TransferMultiassets,
	}
}

fn xcm_pallet_method(query: &MethodQuery) -> XcmMethod {
	let has = |method: XcmMethod| query.capabilities.has_call(query.pallet, method.as_ref());
	let wants_type_and_then =
		query.has_transfer_type_overrides || query.direction == Direction::ParaToEthereum;
	if wants_type_and_then && has(XcmMethod::TransferAssetsUsingTypeAndThen) {
		return XcmMethod::TransferAssetsUsingTypeAndThen
	}
	if has(XcmMethod::TransferAssets) {
		if query.has_transfer_type_overrides {
			log::warn!(
				target: LOG_TARGET,
				"No transfer_assets_using_type_and_then in the runtime, transfer types are ignored"
			);
		}
		return XcmMethod::TransferAssets
	}
	match query.call_type {
		AssetCallType::Teleport if has(XcmMethod::LimitedTeleportAssets) =>
			XcmMethod::LimitedTeleportAssets,
		AssetCallType::Teleport => XcmMethod::TeleportAssets,
		AssetCallType::Reserve if has(XcmMethod::LimitedReserveTransferAssets) =>
			XcmMethod::LimitedReserveTransferAssets,
		AssetCallType::Reserve => XcmMethod::ReserveTransferAssets,
	}
}

/// A transfer to be turned into a runtime call.
pub struct CallRequest<'a> {
	pub capabilities: &'a RuntimeCapabilities,
	pub args: CallArgs<'a>,
	pub call_type: AssetCallType,
	pub pallet_override: Option<&'a str>,
	pub assets_transfer_type: Option<TransferType>,
	pub fees_transfer_type: Option<TransferType>,
	pub custom_xcm_on_dest: Option<Vec<Value>>,
}

/// The entry point chosen for a transfer, with the built call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
	pub method: XcmMethod,
	pub call: RuntimeCall,
}

/// Select pallet and entry point for `request` and build the call.
pub fn resolve_call(request: &CallRequest) -> Result<ResolvedCall, Error> {
	let args = &request.args;
	let pallet = select_pallet(request.capabilities, args.direction, request.pallet_override)?;
	let method = resolve_method(&MethodQuery {
		capabilities: request.capabilities,
		pallet,
		direction: args.direction,
		call_type: request.call_type,
		asset_count: normalize_assets(args.assets).len(),
		has_fee_asset: args.fee_asset.is_some(),
		has_transfer_type_overrides: request.assets_transfer_type.is_some() ||
			request.fees_transfer_type.is_some(),
	})?;
	let call = if method.is_xtokens() {
		xtokens::build(pallet, method, args)?
	} else if method == XcmMethod::TransferAssetsUsingTypeAndThen {
		let type_and_then = type_and_then(request);
		pallet_xcm::build(pallet, method, args, Some(&type_and_then))?
	} else {
		pallet_xcm::build(pallet, method, args, None)?
	};
	Ok(ResolvedCall { method, call })
}

/// Fill in transfer types the caller left out.
///
/// Towards Ethereum assets and fees go through the asset hub. Elsewhere teleports stay
/// teleports, and reserve transfers use the origin as reserve for its own assets and the
/// destination otherwise. Missing fee types follow the asset type.
fn type_and_then(request: &CallRequest) -> TypeAndThen {
	let args = &request.args;
	let default_type = || {
		if args.direction == Direction::ParaToEthereum {
			return TransferType::RemoteReserve(Location::new(
				1,
				vec![Junction::Parachain(ASSET_HUB_PARA_ID)],
			))
		}
		match request.call_type {
			AssetCallType::Teleport => TransferType::Teleport,
			AssetCallType::Reserve
				if args.assets.iter().all(|(location, _)| location.parents() == 0) =>
				TransferType::LocalReserve,
			AssetCallType::Reserve => TransferType::DestinationReserve,
		}
	};
	let assets_transfer_type = request.assets_transfer_type.clone().unwrap_or_else(default_type);
	let fees_transfer_type =
		request.fees_transfer_type.clone().unwrap_or_else(|| assets_transfer_type.clone());
	TypeAndThen {
		assets_transfer_type,
		fees_transfer_type,
		custom_xcm_on_dest: request.custom_xcm_on_dest.clone(),
	}
}
