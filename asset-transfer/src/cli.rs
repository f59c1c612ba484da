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

//! Command line interface of the `xcm-transfer` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use xcm_asset_transfer::{Format, TransferOptions, TransferType, WeightLimit};

#[derive(Parser, Debug)]
#[command(name = "xcm-transfer")]
#[command(about = "Build XCM asset transfer transactions", long_about = None)]
pub struct Cli {
	/// Websocket endpoint of the origin chain.
	#[arg(long, default_value = "ws://127.0.0.1:9944")]
	pub url: String,

	/// TOML configuration file.
	#[arg(long)]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Build a transfer to another chain, or to another account of the origin chain.
	Transfer {
		/// Destination chain id, or a JSON location of a bridged consensus system.
		#[arg(long)]
		dest: String,

		/// Receiving account, SS58 or hex.
		#[arg(long)]
		to: String,

		/// Asset symbols, ids or JSON locations. May be repeated.
		#[arg(long = "asset")]
		assets: Vec<String>,

		/// Amounts, in the order of the assets.
		#[arg(long = "amount", required = true)]
		amounts: Vec<String>,

		#[command(flatten)]
		options: TxArgs,
	},
	/// Build a `claim_assets` transaction for assets trapped on the origin chain.
	Claim {
		#[arg(long = "asset", required = true)]
		assets: Vec<String>,

		#[arg(long = "amount", required = true)]
		amounts: Vec<String>,

		/// Account receiving the claimed assets.
		#[arg(long)]
		beneficiary: String,

		#[command(flatten)]
		options: TxArgs,
	},
	/// Decode a transaction built by this tool.
	Decode {
		/// Hex encoded transaction.
		tx: String,

		#[arg(long, default_value_t = Format::Call)]
		format: Format,
	},
}

#[derive(Args, Debug)]
pub struct TxArgs {
	/// Output format: call, payload or submittable.
	#[arg(long, default_value_t = Format::Call)]
	pub format: Format,

	/// XCM version, defaults to the chain's safe version.
	#[arg(long)]
	pub xcm_version: Option<u32>,

	/// Sender address, needed by the payload format and dry runs.
	#[arg(long)]
	pub sender: Option<String>,

	/// Asset paying the transaction fee on the origin.
	#[arg(long)]
	pub pays_with_fee_origin: Option<String>,

	/// Asset paying execution on the destination.
	#[arg(long)]
	pub pays_with_fee_dest: Option<String>,

	/// Destination weight limit as `ref_time,proof_size`.
	#[arg(long, value_parser = parse_weight_limit)]
	pub weight_limit: Option<WeightLimit>,

	/// The assets are liquidity pool tokens.
	#[arg(long)]
	pub liquid_token: bool,

	/// The assets live in the `ForeignAssets` pallet.
	#[arg(long)]
	pub foreign_assets: bool,

	/// Force the pallet: xTokens, polkadotXcm or xcmPallet.
	#[arg(long)]
	pub pallet: Option<String>,

	/// How assets travel: Teleport, LocalReserve, DestinationReserve or RemoteReserve.
	#[arg(long)]
	pub assets_transfer_type: Option<String>,

	/// How fees travel, same values as `--assets-transfer-type`.
	#[arg(long)]
	pub fees_transfer_type: Option<String>,

	/// JSON location of the reserve for RemoteReserve transfer types.
	#[arg(long)]
	pub remote_reserve: Option<String>,

	/// JSON instructions executed on the destination.
	#[arg(long)]
	pub custom_xcm_on_dest: Option<String>,

	/// Dry run the transaction from the sender's account.
	#[arg(long)]
	pub dry_run: bool,

	/// Asset to price local execution in when dry running.
	#[arg(long)]
	pub xcm_fee_asset: Option<String>,

	/// Local transfers keep the sender alive.
	#[arg(long)]
	pub keep_alive: bool,

	/// Local transfers move the whole balance.
	#[arg(long)]
	pub transfer_all: bool,
}

fn parse_weight_limit(raw: &str) -> Result<WeightLimit, String> {
	let (ref_time, proof_size) =
		raw.split_once(',').ok_or_else(|| format!("expected `ref_time,proof_size`, got `{raw}`"))?;
	Ok(WeightLimit {
		ref_time: ref_time.trim().parse().map_err(|err| format!("ref_time: {err}"))?,
		proof_size: proof_size.trim().parse().map_err(|err| format!("proof_size: {err}"))?,
	})
}

impl TxArgs {
	pub fn into_options(self) -> Result<TransferOptions, anyhow::Error> {
		let reserve = self.remote_reserve.as_deref();
		let transfer_type =
			|kind: Option<String>| kind.map(|kind| TransferType::parse(&kind, reserve)).transpose();
		let custom_xcm_on_dest = self
			.custom_xcm_on_dest
			.map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
			.transpose()?;
		Ok(TransferOptions {
			format: self.format,
			xcm_version: self.xcm_version,
			pays_with_fee_origin: self.pays_with_fee_origin,
			pays_with_fee_dest: self.pays_with_fee_dest,
			weight_limit: self.weight_limit,
			is_liquid_token_transfer: self.liquid_token,
			is_foreign_assets_transfer: self.foreign_assets,
			sender_address: self.sender,
			xcm_pallet_override: self.pallet,
			asset_transfer_type: transfer_type(self.assets_transfer_type)?,
			fees_transfer_type: transfer_type(self.fees_transfer_type)?,
			custom_xcm_on_dest,
			dry_run_call: self.dry_run,
			xcm_fee_asset: self.xcm_fee_asset,
			keep_alive: self.keep_alive,
			transfer_all: self.transfer_all,
		})
	}
}
