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

//! End to end tests of [`AssetTransferApi`] against the in-memory chain client.

use crate::{
	dry_run::DestinationFee,
	mock::{MockClient, MockConnector},
	registry::Relay,
	AssetTransferApi, Config, Direction, Error, Format, Junction, Location, TransferOptions,
	TransferType, XcmVersion,
};
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use subxt::dynamic::Value;

const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
const BIFROST: &str = "2030";

fn init_logger() {
	let _ = env_logger::try_init_from_env(
		env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
	);
}

fn api(client: MockClient) -> AssetTransferApi<MockClient> {
	init_logger();
	AssetTransferApi::new(client, Config::default())
}

fn strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|item| item.to_string()).collect()
}

fn versioned_location(parents: u128, interior: Value) -> Value {
	Value::unnamed_variant(
		"V4",
		[Value::named_composite([("parents", Value::u128(parents)), ("interior", interior)])],
	)
}

fn bifrost_location() -> Value {
	versioned_location(
		1,
		Value::unnamed_variant(
			"X1",
			[Value::unnamed_composite([Value::unnamed_variant("Parachain", [Value::u128(2030)])])],
		),
	)
}

fn dry_run_effects(execution_result: Value) -> Value {
	forwarding_effects(execution_result, vec![Value::string("forwarded")])
}

fn forwarding_effects(execution_result: Value, messages: Vec<Value>) -> Value {
	Value::unnamed_variant(
		"Ok",
		[Value::named_composite([
			("execution_result", execution_result),
			("emitted_events", Value::unnamed_composite([])),
			("local_xcm", Value::unnamed_variant("None", [])),
			(
				"forwarded_xcms",
				Value::unnamed_composite([Value::unnamed_composite([
					bifrost_location(),
					Value::unnamed_composite(messages),
				])]),
			),
		])],
	)
}

fn dry_running_asset_hub() -> MockClient {
	MockClient::asset_hub().with_api_response(
		"DryRunApi",
		"dry_run_call",
		dry_run_effects(Value::unnamed_variant("Ok", [])),
	)
}

fn pricing_destination() -> MockClient {
	MockClient::parachain()
		.with_api_response(
			"XcmPaymentApi",
			"query_xcm_weight",
			Value::unnamed_variant(
				"Ok",
				[Value::named_composite([
					("ref_time", Value::u128(1_000_000)),
					("proof_size", Value::u128(4_096)),
				])],
			),
		)
		.with_api_response(
			"XcmPaymentApi",
			"query_weight_to_asset_fee",
			Value::unnamed_variant("Ok", [Value::u128(31_000_000)]),
		)
}

#[tokio::test]
async fn system_to_para_reserve_transfer() {
	let api = api(MockClient::asset_hub());
	let result = api
		.create_transfer_transaction(
			BIFROST,
			ALICE,
			&strings(&["USDt"]),
			&strings(&["1,000,000"]),
			&TransferOptions::default(),
		)
		.await
		.unwrap();
	assert_eq!(result.origin, "statemint");
	assert_eq!(result.dest, "bifrost_polkadot");
	assert_eq!(result.direction, Direction::SystemToPara);
	assert_eq!(result.method, "polkadotXcm::transfer_assets");
	assert_eq!(result.xcm_version, Some(XcmVersion::V4));
	// PolkadotXcm is pallet 31, transfer_assets its sixth call
	assert!(result.tx.starts_with("0x1f05"), "{}", result.tx);

	let json = serde_json::to_value(&result).unwrap();
	assert_eq!(json["direction"], "SystemToPara");
	assert_eq!(json["xcmVersion"], 4);
	assert_eq!(json["format"], "call");
	assert!(json.get("dryRun").is_none());
}

#[tokio::test]
async fn relay_to_system_uses_the_xcm_pallet_at_the_safe_version() {
	let api = api(MockClient::relay());
	let result = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&["DOT"]),
			&strings(&["10000000000"]),
			&TransferOptions::default(),
		)
		.await
		.unwrap();
	assert_eq!(result.direction, Direction::RelayToSystem);
	assert_eq!(result.method, "xcmPallet::transfer_assets");
	assert_eq!(result.xcm_version, Some(XcmVersion::V3));
	assert_eq!(result.dest, "statemint");
}

#[tokio::test]
async fn parachains_send_through_xtokens() {
	let api = api(MockClient::parachain());
	let result = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&["DOT"]),
			&strings(&["10000000000"]),
			&TransferOptions { xcm_version: Some(4), ..Default::default() },
		)
		.await
		.unwrap();
	assert_eq!(result.direction, Direction::ParaToSystem);
	assert_eq!(result.method, "xTokens::transfer_multiasset");

	let result = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&["DOT"]),
			&strings(&["10000000000"]),
			&TransferOptions {
				xcm_pallet_override: Some("polkadotXcm".into()),
				..Default::default()
			},
		)
		.await
		.unwrap();
	assert_eq!(result.method, "polkadotXcm::transfer_assets");
	// no safe version in storage, the configured default applies
	assert_eq!(result.xcm_version, Some(XcmVersion::V3));
}

#[tokio::test]
async fn xtokens_transfers_keep_every_asset() {
	let api = api(MockClient::parachain());
	let to_relay = api
		.create_transfer_transaction(
			"0",
			ALICE,
			&strings(&["DOT", "BNC", "USDT"]),
			&strings(&["1", "2", "3"]),
			&TransferOptions::default(),
		)
		.await;
	assert_matches!(to_relay, Err(Error::InvalidInput(_)));

	let with_fee = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&["USDT", "DOT"]),
			&strings(&["3", "1"]),
			&TransferOptions { pays_with_fee_dest: Some("DOT".into()), ..Default::default() },
		)
		.await
		.unwrap();
	assert_eq!(with_fee.method, "xTokens::transfer_multiasset_with_fee");

	let too_many = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&["USDT", "BNC", "DOT"]),
			&strings(&["3", "2", "1"]),
			&TransferOptions { pays_with_fee_dest: Some("DOT".into()), ..Default::default() },
		)
		.await;
	assert_matches!(too_many, Err(Error::InvalidInput(_)));
}

#[tokio::test]
async fn absent_pallets_and_assets_are_reported() {
	let api = api(MockClient::asset_hub());
	let api = &api;
	let transfer = move |asset: &'static str, opts: TransferOptions| async move {
		api.create_transfer_transaction(BIFROST, ALICE, &strings(&[asset]), &strings(&["1"]), &opts)
			.await
	};
	assert_matches!(
		transfer("USDt", TransferOptions {
			xcm_pallet_override: Some("xTokens".into()),
			..Default::default()
		})
		.await,
		Err(Error::PalletNotFound(_))
	);
	let unknown = transfer("FOO", TransferOptions::default()).await;
	assert_matches!(unknown, Err(Error::AssetNotFound(_)));
	// a numeric id the Assets pallet does not hold
	let missing = transfer("9999", TransferOptions::default()).await;
	assert_matches!(missing, Err(Error::AssetNotFound(_)));
	assert_matches!(
		transfer("USDt", TransferOptions { xcm_version: Some(6), ..Default::default() }).await,
		Err(Error::InvalidXcmVersion(_))
	);
}

#[tokio::test]
async fn mismatched_assets_and_amounts_are_rejected() {
	let api = api(MockClient::asset_hub());
	let result = api
		.create_transfer_transaction(
			BIFROST,
			ALICE,
			&strings(&["USDt", "USDC"]),
			&strings(&["1"]),
			&TransferOptions::default(),
		)
		.await;
	assert_matches!(result, Err(Error::InvalidInput(_)));

	let result = api
		.create_transfer_transaction(
			BIFROST,
			"not-an-address",
			&strings(&["USDt"]),
			&strings(&["1"]),
			&TransferOptions::default(),
		)
		.await;
	assert_matches!(result, Err(Error::InvalidInput(_)));
}

#[tokio::test]
async fn local_transfers_use_the_asset_pallet() {
	let api = api(MockClient::asset_hub());
	let result = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&["USDt"]),
			&strings(&["1000"]),
			&TransferOptions { keep_alive: true, ..Default::default() },
		)
		.await
		.unwrap();
	assert_eq!(result.direction, Direction::Local);
	assert_eq!(result.method, "assets::transfer_keep_alive");
	assert_eq!(result.xcm_version, None);

	let result = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&[],
			&strings(&["1000"]),
			&TransferOptions::default(),
		)
		.await
		.unwrap();
	assert_eq!(result.method, "balances::transfer_allow_death");

	let result = api
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&["USDt", "USDC"]),
			&strings(&["1", "2"]),
			&TransferOptions::default(),
		)
		.await;
	assert_matches!(result, Err(Error::InvalidInput(_)));
}

#[tokio::test]
async fn local_assets_must_exist_on_chain() {
	let api = api(MockClient::asset_hub());
	let api = &api;
	let transfer = move |asset: &'static str| async move {
		api.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&[asset]),
			&strings(&["1"]),
			&TransferOptions::default(),
		)
		.await
	};
	assert_matches!(transfer("9999").await, Err(Error::AssetNotFound(_)));
	assert_matches!(
		transfer(r#"{"parents":1,"interior":{"X1":{"Parachain":4242}}}"#).await,
		Err(Error::AssetNotFound(_))
	);
	assert_matches!(transfer("FOO").await, Err(Error::AssetNotFound(_)));
	// known to the registry, no storage lookup needed
	assert_eq!(transfer("MYTH").await.unwrap().method, "foreignAssets::transfer");
	assert_eq!(
		transfer(r#"{"parents":1,"interior":"Here"}"#).await.unwrap().method,
		"balances::transfer_allow_death"
	);

	let on_chain = MockClient::asset_hub().with_storage(
		"ForeignAssets",
		"Asset",
		vec![crate::xcm::creator_for(XcmVersion::V4)
			.location_value(&Location::new(1, vec![Junction::Parachain(4242)]))
			.unwrap()],
		Value::unnamed_composite([]),
	);
	let result = self::api(on_chain)
		.create_transfer_transaction(
			"1000",
			ALICE,
			&strings(&[r#"{"parents":1,"interior":{"X1":{"Parachain":4242}}}"#]),
			&strings(&["1"]),
			&TransferOptions::default(),
		)
		.await
		.unwrap();
	assert_eq!(result.method, "foreignAssets::transfer");
}

#[tokio::test]
async fn payloads_carry_the_signed_extensions() {
	let api = api(MockClient::asset_hub());
	let api = &api;
	let transfer = move |opts: TransferOptions| async move {
		let (assets, amounts) = (strings(&["USDt"]), strings(&["1000"]));
		api.create_transfer_transaction(BIFROST, ALICE, &assets, &amounts, &opts).await
	};

	let missing_sender = TransferOptions { format: Format::Payload, ..Default::default() };
	assert_matches!(transfer(missing_sender).await, Err(Error::InvalidInput(_)));

	let result = transfer(TransferOptions {
		format: Format::Payload,
		sender_address: Some(ALICE.into()),
		..Default::default()
	})
	.await
	.unwrap();
	// era(64 from block 100), nonce 5, tip 0, native fee, metadata hash disabled
	let extra = "4502140000".to_string() + "00";
	let additional = format!(
		"c9550f000f000000{}{}00",
		hex::encode([7u8; 32]),
		hex::encode([9u8; 32])
	);
	assert!(result.tx.ends_with(&(extra + &additional)), "{}", result.tx);
	assert_eq!(result.format, Format::Payload);

	let pooled = transfer(TransferOptions {
		format: Format::Payload,
		sender_address: Some(ALICE.into()),
		pays_with_fee_origin: Some("USDt".into()),
		..Default::default()
	})
	.await
	.unwrap();
	assert!(pooled.tx.len() > result.tx.len());

	let unpooled = transfer(TransferOptions {
		format: Format::Payload,
		sender_address: Some(ALICE.into()),
		pays_with_fee_origin: Some("DED".into()),
		..Default::default()
	})
	.await;
	assert_matches!(unpooled, Err(Error::NoFeeAssetLpFound(_)));
}

#[tokio::test]
async fn submittable_transactions_decode_back_to_their_call() {
	let api = api(MockClient::asset_hub());
	let result = api
		.create_transfer_transaction(
			BIFROST,
			ALICE,
			&strings(&["USDt"]),
			&strings(&["1000"]),
			&TransferOptions { format: Format::Submittable, ..Default::default() },
		)
		.await
		.unwrap();
	let decoded = api.decode_extrinsic(&result.tx, Format::Submittable).unwrap();
	assert!(decoded.contains("PolkadotXcm"), "{decoded}");
	assert!(decoded.contains("transfer_assets"), "{decoded}");

	assert_matches!(api.decode_extrinsic("0xzz", Format::Call), Err(Error::InvalidInput(_)));
}

#[tokio::test]
async fn bridged_transfers() {
	let api = api(MockClient::asset_hub());
	let kusama = r#"{"parents":"2","interior":{"X1":{"GlobalConsensus":"Kusama"}}}"#;
	let api = &api;
	let transfer = move |opts: TransferOptions| async move {
		let (assets, amounts) = (strings(&["DOT"]), strings(&["1000"]));
		api.create_transfer_transaction(kusama, ALICE, &assets, &amounts, &opts).await
	};

	let result = transfer(TransferOptions::default()).await.unwrap();
	assert_eq!(result.direction, Direction::SystemToBridge);
	assert_eq!(result.method, "polkadotXcm::transfer_assets");

	let result = transfer(TransferOptions {
		asset_transfer_type: Some(TransferType::LocalReserve),
		fees_transfer_type: Some(TransferType::LocalReserve),
		..Default::default()
	})
	.await
	.unwrap();
	assert_eq!(result.method, "polkadotXcm::transfer_assets_using_type_and_then");

	assert_matches!(
		transfer(TransferOptions { xcm_version: Some(2), ..Default::default() }).await,
		Err(Error::InvalidXcmVersion(_))
	);
}

#[tokio::test]
async fn dry_run_prices_forwarded_messages_on_their_destination() {
	let connector = Arc::new(MockConnector::new(pricing_destination()));
	let api = api(dry_running_asset_hub()).with_connector(connector.clone());
	let result = api
		.create_transfer_transaction(
			BIFROST,
			ALICE,
			&strings(&["USDt"]),
			&strings(&["1000"]),
			&TransferOptions {
				dry_run_call: true,
				sender_address: Some(ALICE.into()),
				..Default::default()
			},
		)
		.await
		.unwrap();

	let dry_run = result.dry_run.unwrap();
	assert!(dry_run.is_success());
	assert_eq!(dry_run.forwarded_xcms.len(), 1);
	assert_eq!(
		result.destination_fees,
		Some(vec![DestinationFee {
			destination: Location::new(1, vec![Junction::Parachain(2030)]),
			fee: Some(31_000_000),
		}])
	);
	assert_eq!(*connector.connections.lock().unwrap(), vec![(Relay::Polkadot, 2030)]);
	assert_eq!(connector.client.disconnects(), 1);
	// only the connector's own copy is left, the connected client was released
	assert_eq!(connector.client.live_handles(), 1);
	assert_eq!(
		connector.client.api_calls(),
		vec![
			("XcmPaymentApi".to_string(), "query_xcm_weight".to_string()),
			("XcmPaymentApi".to_string(), "query_weight_to_asset_fee".to_string()),
		]
	);
	assert_eq!(
		api.client().api_calls(),
		vec![("DryRunApi".to_string(), "dry_run_call".to_string())]
	);
}

#[tokio::test]
async fn every_forwarded_message_is_priced() {
	let connector = Arc::new(MockConnector::new(pricing_destination()));
	let messages = vec![Value::string("first"), Value::string("second")];
	let client = MockClient::asset_hub().with_api_response(
		"DryRunApi",
		"dry_run_call",
		forwarding_effects(Value::unnamed_variant("Ok", []), messages),
	);
	let api = api(client).with_connector(connector.clone());
	let opts = TransferOptions {
		dry_run_call: true,
		sender_address: Some(ALICE.into()),
		..Default::default()
	};
	let result = api
		.create_transfer_transaction(BIFROST, ALICE, &strings(&["USDt"]), &strings(&["1"]), &opts)
		.await
		.unwrap();
	let fees = result.destination_fees.unwrap();
	assert_eq!(fees[0].fee, Some(62_000_000));
	assert_eq!(connector.client.api_calls().len(), 4);
	assert_eq!(connector.client.disconnects(), 1);

	let client = MockClient::asset_hub().with_api_response(
		"DryRunApi",
		"dry_run_call",
		forwarding_effects(Value::unnamed_variant("Ok", []), vec![]),
	);
	let api = self::api(client).with_connector(connector.clone());
	let result = api
		.create_transfer_transaction(BIFROST, ALICE, &strings(&["USDt"]), &strings(&["1"]), &opts)
		.await
		.unwrap();
	assert_eq!(
		result.destination_fees,
		Some(vec![DestinationFee {
			destination: Location::new(1, vec![Junction::Parachain(2030)]),
			fee: None,
		}])
	);
	// nothing to price, no connection opened
	assert_eq!(connector.connections.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_destination_queries_still_disconnect() {
	// the destination answers no runtime API calls
	let connector = Arc::new(MockConnector::new(MockClient::parachain()));
	let api = api(dry_running_asset_hub()).with_connector(connector.clone());
	let result = api
		.create_transfer_transaction(
			BIFROST,
			ALICE,
			&strings(&["USDt"]),
			&strings(&["1000"]),
			&TransferOptions {
				dry_run_call: true,
				sender_address: Some(ALICE.into()),
				..Default::default()
			},
		)
		.await;
	assert_matches!(result, Err(Error::Internal(_)));
	assert_eq!(connector.client.disconnects(), 1);
	// only the connector's own copy is left, the connected client was released
	assert_eq!(connector.client.live_handles(), 1);
}

#[tokio::test]
async fn dry_run_failures_are_reported_in_the_result() {
	let client = MockClient::asset_hub().with_api_response(
		"DryRunApi",
		"dry_run_call",
		dry_run_effects(Value::unnamed_variant(
			"Err",
			[Value::named_composite([
				("post_info", Value::unnamed_composite([])),
				(
					"error",
					Value::unnamed_variant(
						"Token",
						[Value::unnamed_variant("FundsUnavailable", [])],
					),
				),
			])],
		)),
	);
	let connector = Arc::new(MockConnector::new(pricing_destination()));
	let api = api(client).with_connector(connector.clone());
	let opts = TransferOptions {
		dry_run_call: true,
		sender_address: Some(ALICE.into()),
		..Default::default()
	};
	let result = api
		.create_transfer_transaction(BIFROST, ALICE, &strings(&["USDt"]), &strings(&["1"]), &opts)
		.await
		.unwrap();
	let dry_run = result.dry_run.unwrap();
	assert!(!dry_run.is_success());
	assert_eq!(result.destination_fees, None);
	assert!(connector.connections.lock().unwrap().is_empty());

	let json = serde_json::to_value(&dry_run).unwrap();
	assert_eq!(json["executionResult"]["result"], "failure");
}

#[tokio::test]
async fn dry_run_is_skipped_without_a_sender() {
	let api = api(MockClient::asset_hub());
	let result = api
		.create_transfer_transaction(
			BIFROST,
			ALICE,
			&strings(&["USDt"]),
			&strings(&["1000"]),
			&TransferOptions { dry_run_call: true, ..Default::default() },
		)
		.await
		.unwrap();
	assert!(result.dry_run.is_none());
	assert!(api.client().api_calls().is_empty());
}

#[tokio::test]
async fn claim_assets_needs_xcm_v3() {
	let api = api(MockClient::asset_hub());
	let result = api
		.claim_assets(&strings(&["DOT"]), &strings(&["1000"]), ALICE, &TransferOptions::default())
		.await
		.unwrap();
	assert_eq!(result.method, "polkadotXcm::claim_assets");
	assert_eq!(result.direction, Direction::Local);
	assert_eq!(result.dest, "statemint");

	let result = api
		.claim_assets(
			&strings(&["DOT"]),
			&strings(&["1000"]),
			ALICE,
			&TransferOptions { xcm_version: Some(2), ..Default::default() },
		)
		.await;
	assert_matches!(result, Err(Error::InvalidXcmVersion(_)));

	let client = MockClient::asset_hub().with_pallet("PolkadotXcm", 31, ["transfer_assets"]);
	let api = self::api(client);
	let result = api
		.claim_assets(&strings(&["DOT"]), &strings(&["1000"]), ALICE, &TransferOptions::default())
		.await;
	assert_matches!(result, Err(Error::RuntimeCallNotFound { .. }));
}

#[tokio::test]
async fn registry_is_loaded_once() {
	let api = api(MockClient::asset_hub());
	let first = api.registry().await.unwrap() as *const _;
	let second = api.registry().await.unwrap() as *const _;
	assert_eq!(first, second);

	let api = self::api(MockClient::new("unknown-chain"));
	assert_matches!(api.origin().await, Err(Error::InvalidInput(_)));
}
