use std::cmp::Ordering;

use crate::beam::{select_best_beam, BeamSelection};
use crate::group::{group_responders, Adjacent};
use crate::scan::{ResponderResult, ScanOutcome, StatusCode};

/// One responder as it appears inside a device row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderRow {
    pub address: String,
    pub selection: BeamSelection,
    pub location: Option<String>,
    pub adjacent_addresses: Vec<String>,
}

impl ResponderRow {
    pub fn from_result(result: &ResponderResult) -> Self {
        Self {
            address: result.address.clone(),
            selection: select_best_beam(&result.beam_matrix),
            location: result.position.map(|p| p.format()),
            adjacent_addresses: result.adjacent_addresses.clone(),
        }
    }
}

impl Adjacent for ResponderRow {
    fn address(&self) -> &str {
        &self.address
    }

    fn adjacent_addresses(&self) -> &[String] {
        &self.adjacent_addresses
    }
}

/// One inferred physical device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    /// 1-based, in group creation order.
    pub ordinal: usize,
    pub members: Vec<ResponderRow>,
    /// Neighbors reported by members that did not answer the scan themselves.
    pub extra_adjacencies: Vec<String>,
}

impl DeviceRow {
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.address.as_str())
    }

    pub fn best_snr_db(&self) -> Option<f64> {
        self.members
            .iter()
            .filter_map(|m| m.selection.best_snr_db)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanReport {
    /// Firmware reported something other than COMPLETE.
    Failed { status: StatusCode },
    /// Scan completed but nobody answered.
    NoResponses,
    Devices {
        initiator: String,
        responder_count: usize,
        rows: Vec<DeviceRow>,
    },
}

impl ScanReport {
    pub fn footer(&self) -> Option<String> {
        match self {
            ScanReport::Devices {
                initiator,
                responder_count,
                rows,
            } => Some(format!(
                "Scan from {} - {} responder(s), {} node(s)",
                initiator,
                responder_count,
                rows.len()
            )),
            _ => None,
        }
    }
}

/// Strongest first; a row without signal ranks as 0 dB. The sort is stable.
fn by_snr_descending(a: &ResponderRow, b: &ResponderRow) -> Ordering {
    let x = a.selection.best_snr_db.unwrap_or(0.0);
    let y = b.selection.best_snr_db.unwrap_or(0.0);
    y.partial_cmp(&x).unwrap_or(Ordering::Equal)
}

/// Turn a raw scan outcome into one row per inferred device.
pub fn present(outcome: &ScanOutcome) -> ScanReport {
    if !outcome.completion_status.is_complete() {
        log::debug!(
            "Scan from {} failed: {}",
            outcome.initiator_address,
            outcome.completion_status
        );
        return ScanReport::Failed {
            status: outcome.completion_status,
        };
    }

    if outcome.responders.is_empty() {
        return ScanReport::NoResponses;
    }

    let mut responders: Vec<ResponderRow> =
        outcome.responders.iter().map(ResponderRow::from_result).collect();
    responders.sort_by(by_snr_descending);

    let responder_count = responders.len();
    let grouping = group_responders(responders);

    let rows = grouping
        .groups
        .iter()
        .enumerate()
        .map(|(idx, members)| {
            let mut extra_adjacencies: Vec<String> = Vec::new();
            for adj in members.iter().flat_map(|m| m.adjacent_addresses.iter()) {
                if !grouping.is_known(adj) && !extra_adjacencies.contains(adj) {
                    extra_adjacencies.push(adj.clone());
                }
            }

            DeviceRow {
                ordinal: idx + 1,
                members: members.clone(),
                extra_adjacencies,
            }
        })
        .collect();

    ScanReport::Devices {
        initiator: outcome.initiator_address.clone(),
        responder_count,
        rows,
    }
}
