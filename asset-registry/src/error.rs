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

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a registry.
#[derive(Error, Debug)]
pub enum RegistryError {
	/// The registry document is not valid JSON or does not match the expected layout.
	#[error("malformed registry: {0}")]
	Json(#[from] serde_json::Error),
	/// Fetching a remote registry failed.
	#[error("registry fetch failed: {0}")]
	Http(#[from] reqwest::Error),
	/// Reading a registry file failed.
	#[error("failed to read registry file {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}
