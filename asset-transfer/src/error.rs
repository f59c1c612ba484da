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

use thiserror::Error;
use xcm_asset_registry::RegistryError;

/// The caller-visible failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorKind {
	InvalidInput,
	InvalidXcmVersion,
	AssetNotFound,
	NoFeeAssetLpFound,
	RuntimeCallNotFound,
	UnknownConsensusSystem,
	PalletNotFound,
	InternalError,
}

/// The error type for transfer construction.
#[derive(Error, Debug)]
pub enum Error {
	/// Malformed address, mismatched id/amount lists or an unsupported asset count.
	#[error("invalid input: {0}")]
	InvalidInput(String),
	/// The requested XCM version is unsupported or too low for the locations involved.
	#[error("invalid xcm version: {0}")]
	InvalidXcmVersion(String),
	/// The asset is unknown to both the chain and the registry.
	#[error("asset not found: {0}")]
	AssetNotFound(String),
	/// The fee payment asset is not part of any known liquidity pool.
	#[error("no liquidity pool found for fee asset {0}")]
	NoFeeAssetLpFound(String),
	/// The resolved call does not exist in the connected runtime.
	#[error("{pallet}::{call} not found in the current runtime")]
	RuntimeCallNotFound { pallet: String, call: String },
	/// The consensus system of a bridged destination is not recognised.
	#[error("unknown consensus system `{0}`")]
	UnknownConsensusSystem(String),
	/// No usable pallet is present in the connected runtime.
	#[error("pallet not found: {0}")]
	PalletNotFound(String),
	/// A gap in classification or any other unexpected condition.
	#[error("internal error: {0}")]
	Internal(String),
	/// A [`RegistryError`] wrapper error.
	#[error(transparent)]
	Registry(#[from] RegistryError),
	/// A [`subxt::Error`] wrapper error.
	#[error(transparent)]
	Subxt(#[from] subxt::Error),
	/// A [`subxt::ext::subxt_rpcs::Error`] wrapper error.
	#[error(transparent)]
	Rpc(#[from] subxt::ext::subxt_rpcs::Error),
	/// A [`codec::Error`] wrapper error.
	#[error(transparent)]
	Codec(#[from] codec::Error),
}

impl Error {
	/// The category of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::InvalidInput(_) => ErrorKind::InvalidInput,
			Error::InvalidXcmVersion(_) => ErrorKind::InvalidXcmVersion,
			Error::AssetNotFound(_) => ErrorKind::AssetNotFound,
			Error::NoFeeAssetLpFound(_) => ErrorKind::NoFeeAssetLpFound,
			Error::RuntimeCallNotFound { .. } => ErrorKind::RuntimeCallNotFound,
			Error::UnknownConsensusSystem(_) => ErrorKind::UnknownConsensusSystem,
			Error::PalletNotFound(_) => ErrorKind::PalletNotFound,
			Error::Internal(_) |
			Error::Registry(_) |
			Error::Subxt(_) |
			Error::Rpc(_) |
			Error::Codec(_) => ErrorKind::InternalError,
		}
	}
}
