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

//! Entry points for building transfer transactions.

use crate::{
	account::Account,
	assets::{
		dest_native_location, fetch_asset_type, fetch_call_type, AssetContext, AssetLocator,
		CallTypeQuery, OriginChain, TransferAsset,
	},
	call::{claim_assets_call, resolve_call, CallArgs, CallRequest, RuntimeCall, XCM_PALLETS},
	client::{ChainClient, RuntimeCapabilities},
	config::Config,
	direction::{resolve_direction, ChainKind, Destination},
	dry_run::{
		destination_fees, dry_run_call, ChainConnector, DestinationFee, DryRunOutcome,
		EndpointConnector,
	},
	format::{self, construct, fee_asset_location, PayloadOptions},
	local::{single_asset, LocalAsset, LocalTransfer},
	types::{Direction, Format, TransferOptions, TxResult, XcmVersion},
	xcm::{creator_for, json_to_value, AssetAmount},
	Error, Junction, Location, LOG_TARGET,
};
use serde_json::Value as Json;
use std::{fmt::Display, sync::Arc};
use subxt::dynamic::Value;
use tokio::sync::OnceCell;
use xcm_asset_registry::Registry;

/// Builds transfer transactions for the chain `client` is connected to.
///
/// The registry is loaded on first use and shared by all later calls.
pub struct AssetTransferApi<C> {
	client: C,
	config: Config,
	registry: OnceCell<Registry>,
	connector: Option<Arc<dyn ChainConnector>>,
}

impl<C: ChainClient> AssetTransferApi<C> {
	/// Create an API over `client`. Destination fees are estimated when endpoints are configured.
	pub fn new(client: C, config: Config) -> Self {
		let connector = (!config.endpoints.is_empty()).then(|| {
			Arc::new(EndpointConnector::new(config.endpoints.clone())) as Arc<dyn ChainConnector>
		});
		Self { client, config, registry: OnceCell::new(), connector }
	}

	/// Use `connector` to reach the destinations of dry run messages.
	pub fn with_connector(mut self, connector: Arc<dyn ChainConnector>) -> Self {
		self.connector = Some(connector);
		self
	}

	/// Use `registry` instead of loading one.
	pub fn with_registry(self, registry: Registry) -> Self {
		Self { registry: OnceCell::new_with(Some(registry)), ..self }
	}

	pub fn client(&self) -> &C {
		&self.client
	}

	/// The registry, loaded and merged with the injected document on first use.
	pub async fn registry(&self) -> Result<&Registry, Error> {
		self.registry
			.get_or_try_init(|| async {
				let mut registry = self.config.registry.load().await?;
				if let Some(path) = &self.config.inject_registry {
					log::info!(target: LOG_TARGET, "Injecting registry from {}", path.display());
					let injected = xcm_asset_registry::RegistrySource::File(path.clone())
						.load()
						.await?;
					registry.merge(injected);
				}
				Ok::<_, Error>(registry)
			})
			.await
	}

	/// The connected chain, looked up in the registry by its spec name.
	pub async fn origin(&self) -> Result<OriginChain, Error> {
		let registry = self.registry().await?;
		let version = self.client.runtime_version().await?;
		let chain = registry.find_by_spec_name(&version.spec_name).ok_or_else(|| {
			Error::InvalidInput(format!("chain `{}` is not in the registry", version.spec_name))
		})?;
		Ok(OriginChain { relay: chain.relay, id: chain.id, info: chain.info.clone() })
	}

	/// Build a transaction sending `amounts` of `asset_ids` to `dest_addr` on `dest_chain_id`.
	///
	/// `dest_chain_id` is a chain id of the origin's relay network or, for bridged transfers, a
	/// JSON location naming the destination's consensus system.
	pub async fn create_transfer_transaction(
		&self,
		dest_chain_id: &str,
		dest_addr: &str,
		asset_ids: &[String],
		amounts: &[String],
		opts: &TransferOptions,
	) -> Result<TxResult, Error> {
		let registry = self.registry().await?;
		let origin = self.origin().await?;
		let dest = Destination::parse(dest_chain_id)?;
		let direction = resolve_direction(origin.id, &dest)?;
		let beneficiary = Account::parse(dest_addr)?;
		log::debug!(
			target: LOG_TARGET,
			"Building {direction} transfer from {} to {dest_chain_id}",
			origin.spec_name()
		);

		let capabilities = self.client.capabilities();
		if direction == Direction::Local {
			let request = (asset_ids, amounts);
			return self
				.local_transfer(registry, &origin, &capabilities, beneficiary, request, opts)
				.await
		}

		let version = self.xcm_version(&capabilities, opts.xcm_version).await?;
		let creator = creator_for(version);
		let context = asset_context(registry, &origin, &capabilities, opts);
		let assets = context.resolve_all(asset_ids, amounts)?;
		self.check_assets_exist(&context, &assets).await?;

		let asset_type = fetch_asset_type(direction, opts.is_foreign_assets_transfer);
		let dest_native = dest.chain_id().map(|id| dest_native_location(registry, &origin, id));
		let call_type = fetch_call_type(&CallTypeQuery {
			direction,
			asset_type,
			assets: &assets,
			origin: &origin,
			dest_native_location: dest_native.as_ref(),
		});
		log::debug!(
			target: LOG_TARGET,
			"{direction} transfer of {asset_type} assets by {call_type}"
		);

		let fee_asset = resolve_optional(&context, opts.pays_with_fee_dest.as_deref())?;
		let custom_xcm_on_dest = opts.custom_xcm_on_dest.as_ref().map(instructions).transpose()?;
		let amounts: Vec<AssetAmount> =
			assets.iter().map(|asset| (asset.location.clone(), asset.amount)).collect();
		let dest_location = dest.location(direction);
		let resolved = resolve_call(&CallRequest {
			capabilities: &capabilities,
			args: CallArgs {
				creator: creator.as_ref(),
				direction,
				dest: &dest_location,
				dest_chain: dest.chain_id(),
				beneficiary: beneficiary.junction(),
				assets: &amounts,
				fee_asset: fee_asset.as_ref(),
				weight_limit: opts.weight_limit,
			},
			call_type,
			pallet_override: opts.xcm_pallet_override.as_deref(),
			assets_transfer_type: opts.asset_transfer_type.clone(),
			fees_transfer_type: opts.fees_transfer_type.clone(),
			custom_xcm_on_dest,
		})?;

		let tx = self.construct(registry, &origin, &context, &resolved.call, opts).await?;
		let (dry_run, destination_fees) =
			self.simulate(&origin, &context, &resolved.call, version, opts).await?;
		let dest_name = match &dest {
			Destination::Chain(id) => registry
				.chain(origin.relay, *id)
				.map(|chain| chain.spec_name.clone())
				.unwrap_or_else(|| id.to_string()),
			Destination::Bridge(location) => location.to_string(),
		};
		Ok(TxResult {
			origin: origin.spec_name().to_string(),
			dest: dest_name,
			direction,
			method: resolved.call.method(),
			xcm_version: Some(version),
			format: opts.format,
			tx,
			dry_run,
			destination_fees,
		})
	}

	/// Build a `claim_assets` transaction recovering assets trapped on the connected chain.
	pub async fn claim_assets(
		&self,
		asset_ids: &[String],
		amounts: &[String],
		beneficiary: &str,
		opts: &TransferOptions,
	) -> Result<TxResult, Error> {
		let registry = self.registry().await?;
		let origin = self.origin().await?;
		let beneficiary = Account::parse(beneficiary)?;
		let capabilities = self.client.capabilities();
		let version = self.xcm_version(&capabilities, opts.xcm_version).await?;
		let creator = creator_for(version);
		let context = asset_context(registry, &origin, &capabilities, opts);
		let amounts: Vec<AssetAmount> = context
			.resolve_all(asset_ids, amounts)?
			.into_iter()
			.map(|asset| (asset.location, asset.amount))
			.collect();

		let pallet = capabilities
			.first_pallet(&XCM_PALLETS)
			.ok_or_else(|| Error::PalletNotFound(XCM_PALLETS.join(" or ")))?;
		if !capabilities.has_call(pallet, "claim_assets") {
			return Err(Error::RuntimeCallNotFound {
				pallet: pallet.to_string(),
				call: "claim_assets".into(),
			})
		}
		let call = claim_assets_call(pallet, creator.as_ref(), &amounts, &beneficiary.junction())?;
		let tx = self.construct(registry, &origin, &context, &call, opts).await?;
		Ok(TxResult {
			origin: origin.spec_name().to_string(),
			dest: origin.spec_name().to_string(),
			direction: Direction::Local,
			method: call.method(),
			xcm_version: Some(version),
			format: opts.format,
			tx,
			dry_run: None,
			destination_fees: None,
		})
	}

	/// Render a transaction built in `format` as a readable call.
	pub fn decode_extrinsic(&self, encoded: &str, format: Format) -> Result<String, Error> {
		format::decode_extrinsic(&self.client, encoded, format)
	}

	async fn local_transfer(
		&self,
		registry: &Registry,
		origin: &OriginChain,
		capabilities: &RuntimeCapabilities,
		beneficiary: Account,
		(asset_ids, amounts): (&[String], &[String]),
		opts: &TransferOptions,
	) -> Result<TxResult, Error> {
		let (asset_id, amount) = single_asset(asset_ids, amounts)?;
		let (asset, call) = LocalTransfer {
			capabilities,
			registry,
			origin,
			asset_id,
			amount,
			beneficiary,
			keep_alive: opts.keep_alive,
			transfer_all: opts.transfer_all,
			is_liquid_token_transfer: opts.is_liquid_token_transfer,
			is_foreign_assets_transfer: opts.is_foreign_assets_transfer,
		}
		.build()?;
		let context = asset_context(registry, origin, capabilities, opts);
		self.check_local_asset_exists(&context, &asset).await?;
		log::debug!(target: LOG_TARGET, "Local {} transfer of {asset:?}", asset.tx_type());

		let tx = self.construct(registry, origin, &context, &call, opts).await?;
		let dry_run = if opts.dry_run_call {
			let version = self.xcm_version(capabilities, opts.xcm_version).await?;
			self.simulate(origin, &context, &call, version, opts).await?.0
		} else {
			None
		};
		Ok(TxResult {
			origin: origin.spec_name().to_string(),
			dest: origin.spec_name().to_string(),
			direction: Direction::Local,
			method: call.method(),
			xcm_version: None,
			format: opts.format,
			tx,
			dry_run,
			destination_fees: None,
		})
	}

	/// The requested XCM version, else the chain's safe version, else the configured default.
	async fn xcm_version(
		&self,
		capabilities: &RuntimeCapabilities,
		requested: Option<u32>,
	) -> Result<XcmVersion, Error> {
		if let Some(version) = requested {
			return XcmVersion::try_from(version)
		}
		if let Some(pallet) = capabilities.first_pallet(&XCM_PALLETS) {
			let safe = self.client.storage(pallet, "SafeXcmVersion", vec![]).await?;
			if let Some(version) = safe.and_then(|value| value.as_u128()) {
				let version = u32::try_from(version)
					.map_err(|_| Error::InvalidXcmVersion(format!("safe version {version}")))?;
				// Chains may already run a version newer than the ones known here.
				return XcmVersion::try_from(version).or_else(|_| {
					log::warn!(
						target: LOG_TARGET,
						"Unsupported safe XCM version {version}, using v{}",
						self.config.default_xcm_version
					);
					XcmVersion::try_from(self.config.default_xcm_version)
				})
			}
		}
		XcmVersion::try_from(self.config.default_xcm_version)
	}

	/// Confirm chain-local assets exist on system chains.
	async fn check_assets_exist(
		&self,
		context: &AssetContext<'_>,
		assets: &[TransferAsset],
	) -> Result<(), Error> {
		if context.origin.kind() != ChainKind::System {
			return Ok(())
		}
		let v4 = creator_for(XcmVersion::V4);
		for asset in assets {
			let location = &asset.location;
			let key = match location.interior() {
				[Junction::PalletInstance(pallet), Junction::GeneralIndex(id)]
					if location.parents() == 0 && Some(*pallet) == context.assets_pallet =>
					Some(("Assets", Value::u128(*id))),
				_ if location.parents() > 0 &&
					*location != context.origin.relay_native_location() &&
					!in_foreign_registry(context, location) =>
					Some(("ForeignAssets", v4.location_value(location)?)),
				_ => None,
			};
			let Some((pallet, key)) = key else { continue };
			self.require_asset(context.origin, pallet, key, location).await?;
		}
		Ok(())
	}

	/// The on-chain counterpart of a local transfer's asset must exist. Foreign assets known to
	/// the registry are trusted, pool tokens are checked against the registry when resolved.
	async fn check_local_asset_exists(
		&self,
		context: &AssetContext<'_>,
		asset: &LocalAsset,
	) -> Result<(), Error> {
		match asset {
			LocalAsset::Asset(id) =>
				self.require_asset(context.origin, "Assets", Value::u128(*id), id).await,
			LocalAsset::Foreign(location) if !in_foreign_registry(context, location) => {
				let key = creator_for(XcmVersion::V4).location_value(location)?;
				self.require_asset(context.origin, "ForeignAssets", key, location).await
			},
			_ => Ok(()),
		}
	}

	/// Fail with `AssetNotFound` unless `pallet` holds an asset under `key`.
	async fn require_asset(
		&self,
		origin: &OriginChain,
		pallet: &str,
		key: Value,
		asset: impl Display,
	) -> Result<(), Error> {
		if self.client.storage(pallet, "Asset", vec![key]).await?.is_none() {
			return Err(Error::AssetNotFound(format!(
				"{asset} in {pallet} of {}",
				origin.spec_name()
			)))
		}
		Ok(())
	}

	async fn construct(
		&self,
		registry: &Registry,
		origin: &OriginChain,
		context: &AssetContext<'_>,
		call: &RuntimeCall,
		opts: &TransferOptions,
	) -> Result<String, Error> {
		let payload = match (opts.format, opts.sender_address.as_deref()) {
			(Format::Payload, Some(sender)) => {
				let requested = resolve_optional(context, opts.pays_with_fee_origin.as_deref())?;
				let fee_asset = match requested {
					Some(location) => fee_asset_location(registry, origin, &location)?,
					None => None,
				};
				Some(PayloadOptions { sender, mortal_period: self.config.mortal_period, fee_asset })
			},
			_ => None,
		};
		construct(&self.client, call, opts.format, payload).await
	}

	/// Dry run `call` when asked to, and price the forwarded messages on their destinations.
	async fn simulate(
		&self,
		origin: &OriginChain,
		context: &AssetContext<'_>,
		call: &RuntimeCall,
		version: XcmVersion,
		opts: &TransferOptions,
	) -> Result<(Option<DryRunOutcome>, Option<Vec<DestinationFee>>), Error> {
		if !opts.dry_run_call {
			return Ok((None, None))
		}
		let Some(sender) = opts.sender_address.as_deref() else {
			log::warn!(target: LOG_TARGET, "Skipping dry run, no sender address was given");
			return Ok((None, None))
		};
		let sender = Account::parse(sender)?;
		let fee_asset = resolve_optional(context, opts.xcm_fee_asset.as_deref())?;
		let outcome =
			dry_run_call(&self.client, call, &sender, version, fee_asset.as_ref()).await?;

		let fees = match &self.connector {
			Some(connector) if outcome.is_success() && !outcome.forwarded_xcms.is_empty() => {
				let fee_asset = fee_asset.unwrap_or_else(|| origin.relay_native_location());
				Some(
					destination_fees(connector.as_ref(), origin, &outcome, &fee_asset, version)
						.await?,
				)
			},
			_ => None,
		};
		Ok((Some(outcome), fees))
	}
}

fn asset_context<'a>(
	registry: &'a Registry,
	origin: &'a OriginChain,
	capabilities: &RuntimeCapabilities,
	opts: &TransferOptions,
) -> AssetContext<'a> {
	AssetContext {
		registry,
		origin,
		assets_pallet: capabilities.pallet("Assets").map(|pallet| pallet.index),
		pool_assets_pallet: capabilities.pallet("PoolAssets").map(|pallet| pallet.index),
		is_foreign_assets_transfer: opts.is_foreign_assets_transfer,
		is_liquid_token_transfer: opts.is_liquid_token_transfer,
	}
}

fn resolve_optional(context: &AssetContext, raw: Option<&str>) -> Result<Option<Location>, Error> {
	raw.map(|raw| context.resolve(&AssetLocator::parse(raw)?)).transpose()
}

fn in_foreign_registry(context: &AssetContext, location: &Location) -> bool {
	context
		.registry
		.chain(context.origin.relay, context.origin.id)
		.map(|chain| {
			chain.foreign_assets_info.values().any(|asset| {
				Location::from_json_str(&asset.multi_location)
					.map_or(false, |known| known == *location)
			})
		})
		.unwrap_or(false)
}

/// Instructions of a custom destination program: a JSON array, or a single instruction.
fn instructions(json: &Json) -> Result<Vec<Value>, Error> {
	match json {
		Json::Array(items) => items.iter().map(json_to_value).collect(),
		other => Ok(vec![json_to_value(other)?]),
	}
}
