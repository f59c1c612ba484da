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

//! Registry of relay chains and the chains connected to them.
//!
//! For every relay network the registry maps a chain id (`0` for the relay itself) to a
//! [`ChainInfo`] describing:
//!
//! * the chain's native tokens, the first one being the primary native token,
//! * the assets living in its `Assets` pallet,
//! * the foreign assets it knows about, keyed by symbol,
//! * the liquidity-pool pairs it hosts,
//! * the cross-chain assets it accepts, together with their canonical locations.
//!
//! Locations are kept as the JSON strings they were published with. Interpreting them is left
//! to the consumer.

mod error;
mod loader;
mod registry;
mod types;

pub use error::RegistryError;
pub use loader::RegistrySource;
pub use registry::{ChainRef, Registry};
pub use types::{ChainInfo, ForeignAssetInfo, PoolPairInfo, Relay, XcAssetData};

/// Log target used by this crate.
pub const LOG_TARGET: &str = "xcm-registry";
