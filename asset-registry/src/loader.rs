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

use crate::{Registry, RegistryError, LOG_TARGET};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to load a registry from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrySource {
	/// The registry compiled into this crate.
	#[default]
	Bundled,
	/// A JSON file on disk.
	File(PathBuf),
	/// A JSON document served over HTTP(S).
	Url(String),
}

impl RegistrySource {
	/// Load the registry.
	pub async fn load(&self) -> Result<Registry, RegistryError> {
		match self {
			Self::Bundled => Registry::bundled(),
			Self::File(path) => {
				log::debug!(target: LOG_TARGET, "Reading registry from {}", path.display());
				let raw = tokio::fs::read_to_string(path)
					.await
					.map_err(|source| RegistryError::Io { path: path.clone(), source })?;
				Registry::from_json(&raw)
			},
			Self::Url(url) => {
				log::info!(target: LOG_TARGET, "Fetching registry from {url}");
				let registry =
					reqwest::get(url).await?.error_for_status()?.json::<Registry>().await?;
				Ok(registry)
			},
		}
	}
}
