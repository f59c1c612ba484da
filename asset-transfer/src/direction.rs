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

//! Classification of the path between origin and destination.

use crate::{
	types::{ChainTopology, Direction},
	Error, Junction, Location, NetworkId,
};

const LOG_TARGET: &str = "xcm-transfer::direction";

/// Parachain ids below this value belong to system chains.
pub const LOWEST_GENERAL_PARA_ID: u32 = 2000;

/// The role of a chain within its relay network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
	Relay,
	System,
	General,
}

impl ChainKind {
	/// Classify a chain by id; `0` is the relay chain.
	pub fn of(id: u32) -> Self {
		match id {
			0 => ChainKind::Relay,
			id if id < LOWEST_GENERAL_PARA_ID => ChainKind::System,
			_ => ChainKind::General,
		}
	}
}

/// Where a transfer is headed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
	/// A chain of the origin's relay network, by id.
	Chain(u32),
	/// A location in another consensus system.
	Bridge(Location),
}

impl Destination {
	/// Parse a destination: a chain id, or a JSON location naming a global consensus system.
	pub fn parse(dest_id: &str) -> Result<Self, Error> {
		let dest_id = dest_id.trim();
		if dest_id.starts_with('{') {
			let location = Location::from_json_str(dest_id)?;
			if !location.contains_global_consensus() {
				return Err(Error::InvalidInput(format!(
					"destination location {location} does not name a consensus system"
				)))
			}
			return Ok(Destination::Bridge(location))
		}
		let digits: String = dest_id.chars().filter(|c| *c != ',').collect();
		digits
			.parse()
			.map(Destination::Chain)
			.map_err(|_| Error::InvalidInput(format!("`{dest_id}` is not a valid destination")))
	}

	/// The chain id, for destinations within the relay network.
	pub fn chain_id(&self) -> Option<u32> {
		match self {
			Destination::Chain(id) => Some(*id),
			Destination::Bridge(_) => None,
		}
	}

	/// Topology flags for a transfer from a chain of `origin` kind to this destination.
	pub fn topology(&self, origin: ChainKind) -> ChainTopology {
		let mut topology = ChainTopology {
			is_origin_relay: origin == ChainKind::Relay,
			is_origin_system_chain: origin == ChainKind::System,
			is_origin_general_chain: origin == ChainKind::General,
			..Default::default()
		};
		match self {
			Destination::Chain(id) => match ChainKind::of(*id) {
				ChainKind::Relay => topology.is_dest_relay = true,
				ChainKind::System => topology.is_dest_system_chain = true,
				ChainKind::General => topology.is_dest_general_chain = true,
			},
			Destination::Bridge(location) => {
				topology.is_dest_bridge = true;
				topology.is_dest_ethereum =
					matches!(location.global_consensus(), Some(NetworkId::Ethereum { .. }));
			},
		}
		topology
	}

	/// The destination as seen from the origin.
	pub fn location(&self, direction: Direction) -> Location {
		match self {
			Destination::Bridge(location) => location.clone(),
			Destination::Chain(_) if direction == Direction::Local => Location::here(),
			Destination::Chain(0) => Location::parent(),
			Destination::Chain(id) => {
				let parents = match direction {
					Direction::RelayToSystem | Direction::RelayToPara => 0,
					_ => 1,
				};
				Location::new(parents, vec![Junction::Parachain(*id)])
			},
		}
	}
}

/// Determine the direction of a transfer from `origin_id` to `dest`.
///
/// A destination equal to the origin is a local transfer.
pub fn resolve_direction(origin_id: u32, dest: &Destination) -> Result<Direction, Error> {
	if dest.chain_id() == Some(origin_id) {
		return Ok(Direction::Local)
	}
	classify(&dest.topology(ChainKind::of(origin_id)))
}

/// Map topology flags to a direction. Rules are evaluated in order; the first match wins.
pub fn classify(topology: &ChainTopology) -> Result<Direction, Error> {
	let t = topology;
	let direction = if t.is_origin_system_chain && t.is_dest_relay {
		Direction::SystemToRelay
	} else if t.is_origin_system_chain && t.is_dest_system_chain {
		Direction::SystemToSystem
	} else if t.is_origin_system_chain && t.is_dest_general_chain {
		Direction::SystemToPara
	} else if t.is_origin_system_chain && t.is_dest_bridge {
		Direction::SystemToBridge
	} else if t.is_origin_relay && t.is_dest_system_chain {
		Direction::RelayToSystem
	} else if t.is_origin_relay && t.is_dest_general_chain {
		Direction::RelayToPara
	} else if t.is_origin_relay && t.is_dest_bridge {
		Direction::RelayToBridge
	} else if t.is_origin_general_chain && t.is_dest_ethereum {
		Direction::ParaToEthereum
	} else if t.is_origin_general_chain && t.is_dest_relay {
		Direction::ParaToRelay
	} else if t.is_origin_general_chain && t.is_dest_system_chain {
		Direction::ParaToSystem
	} else if t.is_origin_general_chain && t.is_dest_general_chain {
		Direction::ParaToPara
	} else {
		return Err(Error::Internal(format!("no transfer direction matches {topology:?}")))
	};
	log::debug!(target: LOG_TARGET, "Classified {topology:?} as {direction}");
	Ok(direction)
}
