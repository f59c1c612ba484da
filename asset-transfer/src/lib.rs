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

//! Construction of XCM asset transfer transactions.
//!
//! Given a connection to a relay chain, a system chain or a parachain, [`AssetTransferApi`]
//! turns a request of the form "send these assets to that account on that chain" into a
//! transaction of the connected runtime:
//!
//! 1. the [direction](direction) of the transfer is classified from origin and destination,
//! 2. the assets are resolved to locations and classified as teleports or reserve transfers
//!    ([`assets`]),
//! 3. the [call resolver](call) picks the pallet and entry point the runtime supports and builds
//!    its arguments with the [XCM creator](xcm) of the requested version,
//! 4. the call is rendered in the requested [format] and optionally
//!    [dry run](dry_run) to estimate fees.
//!
//! Transfers between two accounts of the same chain are built by the [`local`] module instead.
//!
//! The chain is accessed through the [`ChainClient`](client::ChainClient) trait, with a subxt
//! implementation in [`client::SubxtClient`].

mod api;
mod error;

pub mod account;
pub mod assets;
pub mod call;
pub mod client;
pub mod config;
pub mod direction;
pub mod dry_run;
pub mod format;
pub mod local;
pub mod location;
pub mod types;
pub mod xcm;

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;

pub use api::AssetTransferApi;
pub use config::Config;
pub use error::{Error, ErrorKind};
pub use location::{Junction, Location, NetworkId};
pub use types::{
	AssetCallType, AssetType, Direction, Format, TransferOptions, TransferType, TxResult,
	WeightLimit, XcmVersion,
};
pub use xcm_asset_registry as registry;

/// Log target used by this crate.
pub const LOG_TARGET: &str = "xcm-transfer";
