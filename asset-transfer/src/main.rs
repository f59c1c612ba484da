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

//! Builds XCM transfer transactions against a live chain and prints them as JSON.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use xcm_asset_transfer::{client::SubxtClient, AssetTransferApi, Config};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	let _ = env_logger::try_init_from_env(
		env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
	);

	let cli = Cli::parse();
	let config = match &cli.config {
		Some(path) => Config::from_file(path)?,
		None => Config::default(),
	};
	let client = SubxtClient::connect(&cli.url)
		.await
		.with_context(|| format!("Failed to connect to {}", cli.url))?;
	let api = AssetTransferApi::new(client, config);

	let output = match cli.command {
		Command::Transfer { dest, to, assets, amounts, options } => {
			let options = options.into_options()?;
			let result =
				api.create_transfer_transaction(&dest, &to, &assets, &amounts, &options).await?;
			serde_json::to_string_pretty(&result)?
		},
		Command::Claim { assets, amounts, beneficiary, options } => {
			let result =
				api.claim_assets(&assets, &amounts, &beneficiary, &options.into_options()?).await?;
			serde_json::to_string_pretty(&result)?
		},
		Command::Decode { tx, format } => api.decode_extrinsic(&tx, format)?,
	};
	println!("{output}");
	Ok(())
}
