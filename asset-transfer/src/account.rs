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

//! Account address parsing.

use crate::{Error, Junction};

const SS58_PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;

/// An account on a substrate or an ethereum-compatible chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Account {
	Id32([u8; 32]),
	Key20([u8; 20]),
}

impl Account {
	/// Parse an SS58 address, or a hex encoded 32 or 20 byte key.
	pub fn parse(address: &str) -> Result<Self, Error> {
		let address = address.trim();
		if let Some(stripped) = address.strip_prefix("0x") {
			let bytes = hex::decode(stripped).map_err(|err| {
				Error::InvalidInput(format!("`{address}` is not valid hex: {err}"))
			})?;
			return match bytes.len() {
				32 => Ok(Account::Id32(to_array(&bytes))),
				20 => Ok(Account::Key20(to_array(&bytes))),
				len => Err(Error::InvalidInput(format!(
					"hex address `{address}` has {len} bytes, expected 32 or 20"
				))),
			}
		}
		ss58_decode(address).map(Account::Id32)
	}

	/// The raw account bytes.
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			Account::Id32(id) => id,
			Account::Key20(key) => key,
		}
	}

	/// The junction naming this account, without a network.
	pub fn junction(&self) -> Junction {
		match *self {
			Account::Id32(id) => Junction::AccountId32 { network: None, id },
			Account::Key20(key) => Junction::AccountKey20 { network: None, key },
		}
	}
}

fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
	let mut out = [0u8; N];
	out.copy_from_slice(bytes);
	out
}

fn ss58_decode(address: &str) -> Result<[u8; 32], Error> {
	let invalid = |reason: &str| Error::InvalidInput(format!("`{address}` {reason}"));
	let data = bs58::decode(address)
		.into_vec()
		.map_err(|_| invalid("is neither an SS58 address nor hex"))?;
	let prefix_len = match data.first() {
		Some(0..=63) => 1,
		Some(64..=127) => 2,
		_ => return Err(invalid("has an invalid SS58 prefix")),
	};
	if data.len() != prefix_len + 32 + CHECKSUM_LEN {
		return Err(invalid("has an unexpected length"))
	}
	let (body, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
	let hash = sp_crypto_hashing::blake2_512(&[SS58_PREFIX, body].concat());
	if &hash[..CHECKSUM_LEN] != checksum {
		return Err(invalid("has an invalid checksum"))
	}
	Ok(to_array(&body[prefix_len..]))
}

/// Encode a 32 byte account id as an SS58 address with the given network prefix.
pub fn ss58_encode(id: &[u8; 32], prefix: u16) -> String {
	let mut data = match prefix {
		0..=63 => vec![prefix as u8],
		_ => {
			let first = ((prefix & 0b1111_1100) as u8) >> 2;
			let second = ((prefix >> 8) as u8) | (((prefix & 0b11) as u8) << 6);
			vec![first | 0b0100_0000, second]
		},
	};
	data.extend_from_slice(id);
	let hash = sp_crypto_hashing::blake2_512(&[SS58_PREFIX, &data].concat());
	data.extend_from_slice(&hash[..CHECKSUM_LEN]);
	bs58::encode(data).into_string()
}
