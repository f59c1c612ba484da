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

//! Output shapes of a constructed transaction.
//!
//! A call is returned as its SCALE encoding, as the payload a sender signs, or as an unsigned
//! extrinsic ready for submission. The signing payload is the call followed by the "extra" and
//! "additional" data of each transaction extension the runtime declares, in declaration order.

use crate::{
	account::Account,
	assets::OriginChain,
	call::RuntimeCall,
	client::ChainClient,
	types::Format,
	Error, Location,
};
use codec::{Compact, Decode, Encode, Output};
use serde_json::Value as Json;
use xcm_asset_registry::Registry;

const LOG_TARGET: &str = "xcm-transfer::format";

/// Extrinsic format version of unsigned (bare) transactions.
const BARE_EXTRINSIC_VERSIONS: [u8; 2] = [4, 5];
const SIGNED_BIT: u8 = 0b1000_0000;

/// The lifetime of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
	Immortal,
	/// Valid for `period` blocks from the block whose number modulo `period` is `phase`.
	Mortal { period: u64, phase: u64 },
}

impl Era {
	/// A mortal era starting at block `current`. The period is rounded to a power of two in
	/// `4..=65536` and the phase quantized accordingly.
	pub fn mortal(period: u64, current: u64) -> Self {
		let period = period.checked_next_power_of_two().unwrap_or(1 << 16).clamp(4, 1 << 16);
		let phase = current % period;
		let quantize_factor = (period >> 12).max(1);
		Era::Mortal { period, phase: phase / quantize_factor * quantize_factor }
	}

	/// The first block the era is valid in, given the current block.
	pub fn birth(&self, current: u64) -> u64 {
		match *self {
			Era::Immortal => 0,
			Era::Mortal { period, phase } => (current.max(phase) - phase) / period * period + phase,
		}
	}
}

impl Encode for Era {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		match *self {
			Era::Immortal => dest.push_byte(0),
			Era::Mortal { period, phase } => {
				let quantize_factor = (period >> 12).max(1);
				let low = (period.trailing_zeros().saturating_sub(1)).clamp(1, 15) as u16;
				let encoded = low | (((phase / quantize_factor) as u16) << 4);
				encoded.encode_to(dest);
			},
		}
	}
}

impl Decode for Era {
	fn decode<I: codec::Input>(input: &mut I) -> Result<Self, codec::Error> {
		let first = input.read_byte()?;
		if first == 0 {
			return Ok(Era::Immortal)
		}
		let encoded = first as u64 + ((input.read_byte()? as u64) << 8);
		let period = 2 << (encoded % (1 << 4));
		let quantize_factor = (period >> 12).max(1);
		let phase = (encoded >> 4) * quantize_factor;
		if period >= 4 && phase < period {
			Ok(Era::Mortal { period, phase })
		} else {
			Err("invalid mortal era".into())
		}
	}
}

/// Everything besides the call that goes into a signing payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
	pub spec_version: u32,
	pub transaction_version: u32,
	pub genesis_hash: [u8; 32],
	pub nonce: u64,
	pub era: Era,
	/// Hash of the block the era starts at.
	pub birth_hash: [u8; 32],
	pub tip: u128,
	/// Asset paying the transaction fee, `None` for the native token.
	pub fee_asset: Option<Location>,
}

/// The SCALE encoded signing payload of `call`, given the runtime's transaction extensions.
pub fn encode_payload(
	call: &[u8],
	extensions: &[String],
	context: &SigningContext,
) -> Result<Vec<u8>, Error> {
	let mut extra = Vec::new();
	let mut additional = Vec::new();
	for extension in extensions {
		match extension.as_str() {
			"CheckNonZeroSender" | "CheckWeight" | "StorageWeightReclaim" | "WeightReclaim" |
			"AuthorizeCall" | "PrevalidateAttests" => {},
			"CheckSpecVersion" => context.spec_version.encode_to(&mut additional),
			"CheckTxVersion" => context.transaction_version.encode_to(&mut additional),
			"CheckGenesis" => context.genesis_hash.encode_to(&mut additional),
			"CheckMortality" | "CheckEra" => {
				context.era.encode_to(&mut extra);
				context.birth_hash.encode_to(&mut additional);
			},
			"CheckNonce" => Compact(context.nonce).encode_to(&mut extra),
			"ChargeTransactionPayment" => {
				if context.fee_asset.is_some() {
					return Err(Error::InvalidInput(
						"the chain cannot pay transaction fees in other assets".into(),
					))
				}
				Compact(context.tip).encode_to(&mut extra);
			},
			"ChargeAssetTxPayment" => {
				Compact(context.tip).encode_to(&mut extra);
				context.fee_asset.encode_to(&mut extra);
			},
			"CheckMetadataHash" => {
				// mode: disabled, no metadata hash
				0u8.encode_to(&mut extra);
				None::<[u8; 32]>.encode_to(&mut additional);
			},
			other =>
				return Err(Error::Internal(format!("unsupported transaction extension `{other}`"))),
		}
	}
	let mut payload = call.to_vec();
	payload.extend(extra);
	payload.extend(additional);
	Ok(payload)
}

/// Options of the `payload` format.
#[derive(Debug, Clone)]
pub struct PayloadOptions<'a> {
	pub sender: &'a str,
	pub mortal_period: u64,
	pub fee_asset: Option<Location>,
}

/// Hex encode `bytes` with a `0x` prefix.
pub fn to_hex(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

fn from_hex(raw: &str) -> Result<Vec<u8>, Error> {
	let raw = raw.trim();
	hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
		.map_err(|err| Error::InvalidInput(format!("transaction is not valid hex: {err}")))
}

/// Produce the transaction in the requested format, hex encoded.
pub async fn construct<C: ChainClient + ?Sized>(
	client: &C,
	call: &RuntimeCall,
	format: Format,
	payload: Option<PayloadOptions<'_>>,
) -> Result<String, Error> {
	match format {
		Format::Call => Ok(to_hex(&client.encode_call(call)?)),
		Format::Submittable => Ok(to_hex(&client.create_unsigned(call)?)),
		Format::Payload => {
			let options = payload.ok_or_else(|| {
				Error::InvalidInput("the payload format requires a sender address".into())
			})?;
			Account::parse(options.sender)?;
			let encoded_call = client.encode_call(call)?;
			let (version, block, nonce) = futures::try_join!(
				client.runtime_version(),
				client.latest_block(),
				client.account_nonce(options.sender),
			)?;
			let era = Era::mortal(options.mortal_period, block.number);
			let birth = era.birth(block.number);
			let birth_hash = if birth == block.number {
				block.hash
			} else {
				client.block_hash(birth).await?.ok_or_else(|| {
					Error::Internal(format!("no block hash for era birth block {birth}"))
				})?
			};
			log::debug!(
				target: LOG_TARGET,
				"Signing payload for {} at block {} with nonce {nonce}",
				call.method(),
				block.number
			);
			let context = SigningContext {
				spec_version: version.spec_version,
				transaction_version: version.transaction_version,
				genesis_hash: client.genesis_hash(),
				nonce,
				era,
				birth_hash,
				tip: 0,
				fee_asset: options.fee_asset,
			};
			let extensions = client.transaction_extensions();
			let payload = encode_payload(&encoded_call, &extensions, &context)?;
			Ok(to_hex(&payload))
		},
	}
}

/// Check that `fee_asset` can pay transaction fees on the origin, i.e. that it is paired with
/// the native token in one of the chain's liquidity pools.
///
/// Returns `None` for the relay token, which is paid for natively.
pub fn fee_asset_location(
	registry: &Registry,
	origin: &OriginChain,
	fee_asset: &Location,
) -> Result<Option<Location>, Error> {
	if *fee_asset == origin.relay_native_location() {
		return Ok(None)
	}
	let pools = registry
		.chain(origin.relay, origin.id)
		.map(|chain| chain.pool_pairs_info.values())
		.into_iter()
		.flatten();
	for pool in pools {
		let Ok(pair) = serde_json::from_str::<Json>(&pool.pair_info) else {
			log::debug!(target: LOG_TARGET, "Skipping malformed pool pair {}", pool.pair_info);
			continue
		};
		if pool_locations(&pair).iter().any(|location| location == fee_asset) {
			return Ok(Some(fee_asset.clone()))
		}
	}
	Err(Error::NoFeeAssetLpFound(fee_asset.to_string()))
}

fn pool_locations(json: &Json) -> Vec<Location> {
	match json {
		Json::Array(items) => items.iter().flat_map(pool_locations).collect(),
		Json::Object(_) => Location::from_json(json).into_iter().collect(),
		_ => vec![],
	}
}

/// Decode a transaction produced in `format` into a readable rendering of its call.
pub fn decode_extrinsic<C: ChainClient + ?Sized>(
	client: &C,
	encoded: &str,
	format: Format,
) -> Result<String, Error> {
	let bytes = from_hex(encoded)?;
	let call_data = match format {
		// The payload starts with the call; trailing extension data is ignored.
		Format::Call | Format::Payload => &bytes[..],
		Format::Submittable => strip_extrinsic_prefix(&bytes)?,
	};
	Ok(client.decode_call(call_data)?.to_string())
}

fn strip_extrinsic_prefix(bytes: &[u8]) -> Result<&[u8], Error> {
	let mut input = bytes;
	let Compact(len) = Compact::<u32>::decode(&mut input)?;
	if input.len() != len as usize {
		return Err(Error::InvalidInput(format!(
			"extrinsic length prefix {len} does not match its {} bytes",
			input.len()
		)))
	}
	match input.split_first() {
		Some((version, rest)) if BARE_EXTRINSIC_VERSIONS.contains(version) => Ok(rest),
		Some((version, _)) if version & SIGNED_BIT != 0 =>
			Err(Error::InvalidInput("signed extrinsics cannot be decoded".into())),
		_ => Err(Error::InvalidInput("unsupported extrinsic version".into())),
	}
}
