use std::collections::BTreeMap;

use crate::DecodeStats;
use crate::pipeline::{DecodeStatus, Truncation, Unsupported};
use crate::protocols::LayerKind;
use crate::registry::Protocol;

/// Running counters folded into `DecodeStats` at the end of a run.
#[derive(Debug, Default)]
pub(super) struct StatsBuilder {
    complete: u64,
    truncated: u64,
    invalid_first_layer: u64,
    ipv4_checksum_failures: u64,
    non_ethernet_skipped: u64,
    layers: BTreeMap<LayerKind, u64>,
    unsupported_ether_types: BTreeMap<u16, u64>,
    unsupported_protocols: BTreeMap<u8, u64>,
}

impl StatsBuilder {
    pub(super) fn record(
        &mut self,
        status: &DecodeStatus,
        layers: impl Iterator<Item = LayerKind>,
        ipv4_checksum_ok: Option<bool>,
    ) {
        for kind in layers {
            *self.layers.entry(kind).or_default() += 1;
        }
        if ipv4_checksum_ok == Some(false) {
            self.ipv4_checksum_failures += 1;
        }
        match status {
            DecodeStatus::Complete => self.complete += 1,
            DecodeStatus::InvalidFirstLayer(_) => self.invalid_first_layer += 1,
            DecodeStatus::Truncated(truncation) => {
                self.truncated += 1;
                match truncation {
                    Truncation::Unsupported(Unsupported::EtherType(ether_type)) => {
                        *self
                            .unsupported_ether_types
                            .entry(ether_type.raw())
                            .or_default() += 1;
                    }
                    Truncation::Unsupported(Unsupported::Protocol { number, .. }) => {
                        *self.unsupported_protocols.entry(*number).or_default() += 1;
                    }
                    Truncation::Failed(_) => {}
                }
            }
        }
    }

    pub(super) fn record_skipped(&mut self) {
        self.non_ethernet_skipped += 1;
    }

    pub(super) fn finish(self) -> DecodeStats {
        let unsupported_ether_types = self
            .unsupported_ether_types
            .into_iter()
            .map(|(raw, count)| (format!("0x{raw:04x}"), count))
            .collect();
        let unsupported_protocols = self
            .unsupported_protocols
            .into_iter()
            .map(|(number, count)| (format!("{number} ({})", Protocol::from_number(number)), count))
            .collect();

        DecodeStats {
            complete: self.complete,
            truncated: self.truncated,
            invalid_first_layer: self.invalid_first_layer,
            ipv4_checksum_failures: self.ipv4_checksum_failures,
            non_ethernet_skipped: self.non_ethernet_skipped,
            layers: self.layers,
            unsupported_ether_types,
            unsupported_protocols,
        }
    }
}
