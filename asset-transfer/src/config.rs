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

//! Builder configuration.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::{Path, PathBuf}};
use xcm_asset_registry::RegistrySource;

/// XCM version used when the chain does not report a safe version.
pub const DEFAULT_XCM_VERSION: u32 = 3;

/// Number of blocks a signing payload stays valid for.
pub const DEFAULT_MORTAL_PERIOD: u64 = 64;

/// Configuration of an [`AssetTransferApi`](crate::AssetTransferApi).
///
/// ```toml
/// default_xcm_version = 4
/// inject_registry = "registry-overrides.json"
///
/// [registry]
/// url = "https://example.com/registry.json"
///
/// [endpoints]
/// "polkadot/1000" = "wss://polkadot-asset-hub-rpc.polkadot.io"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Where the registry is loaded from.
	pub registry: RegistrySource,
	/// A registry document merged over the loaded one.
	pub inject_registry: Option<PathBuf>,
	pub default_xcm_version: u32,
	pub mortal_period: u64,
	/// Websocket endpoints keyed by `relay/chain-id`, used to estimate destination fees.
	pub endpoints: BTreeMap<String, String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			registry: RegistrySource::default(),
			inject_registry: None,
			default_xcm_version: DEFAULT_XCM_VERSION,
			mortal_period: DEFAULT_MORTAL_PERIOD,
			endpoints: BTreeMap::new(),
		}
	}
}

impl Config {
	/// Parse a TOML document.
	pub fn from_toml(raw: &str) -> Result<Self, Error> {
		toml::from_str(raw).map_err(|err| Error::InvalidInput(format!("invalid config: {err}")))
	}

	/// Read the configuration from a TOML file.
	pub fn from_file(path: &Path) -> Result<Self, Error> {
		let raw = std::fs::read_to_string(path).map_err(|err| {
			Error::InvalidInput(format!("cannot read config {}: {err}", path.display()))
		})?;
		Self::from_toml(&raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn empty_document_yields_defaults() {
		assert_eq!(Config::from_toml("").unwrap(), Config::default());
	}

	#[test]
	fn parses_sources_and_endpoints() {
		let config = Config::from_toml(
			r#"
			default_xcm_version = 4
			mortal_period = 128

			[registry]
			file = "/tmp/registry.json"

			[endpoints]
			"polkadot/1000" = "ws://127.0.0.1:9944"
			"#,
		)
		.unwrap();
		assert_eq!(config.default_xcm_version, 4);
		assert_eq!(config.mortal_period, 128);
		assert_eq!(config.registry, RegistrySource::File("/tmp/registry.json".into()));
		assert_eq!(
			config.endpoints.get("polkadot/1000").map(String::as_str),
			Some("ws://127.0.0.1:9944")
		);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert_matches!(Config::from_toml("xcm_version = 3"), Err(Error::InvalidInput(_)));
	}
}
