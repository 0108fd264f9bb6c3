use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Transmit beam index -> receive beam index -> raw link quality metric.
///
/// Keys arrive as decimal strings on the wire and iterate in ascending
/// numeric order.
pub type BeamQualityMatrix = BTreeMap<i32, BTreeMap<i32, i32>>;

/// Completion status reported by firmware for a scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFwStatus {
    Complete,
    InvalidType,
    InvalidStartTsf,
    InvalidSta,
    AwvInProg,
    StaNotAssoc,
    ReqBufferFull,
    LinkShutDown,
    UnspecifiedError,
    UnexpectedError,
    ExpiredTsf,
    IncomplRtcalBeamsForVbs,
}

impl ScanFwStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        let status = match code {
            0 => ScanFwStatus::Complete,
            1 => ScanFwStatus::InvalidType,
            2 => ScanFwStatus::InvalidStartTsf,
            3 => ScanFwStatus::InvalidSta,
            4 => ScanFwStatus::AwvInProg,
            5 => ScanFwStatus::StaNotAssoc,
            6 => ScanFwStatus::ReqBufferFull,
            7 => ScanFwStatus::LinkShutDown,
            8 => ScanFwStatus::UnspecifiedError,
            9 => ScanFwStatus::UnexpectedError,
            10 => ScanFwStatus::ExpiredTsf,
            11 => ScanFwStatus::IncomplRtcalBeamsForVbs,
            _ => return None,
        };
        Some(status)
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Symbolic name, as firmware spells it.
    pub fn name(&self) -> &'static str {
        match self {
            ScanFwStatus::Complete => "COMPLETE",
            ScanFwStatus::InvalidType => "INVALID_TYPE",
            ScanFwStatus::InvalidStartTsf => "INVALID_START_TSF",
            ScanFwStatus::InvalidSta => "INVALID_STA",
            ScanFwStatus::AwvInProg => "AWV_IN_PROG",
            ScanFwStatus::StaNotAssoc => "STA_NOT_ASSOC",
            ScanFwStatus::ReqBufferFull => "REQ_BUFFER_FULL",
            ScanFwStatus::LinkShutDown => "LINK_SHUT_DOWN",
            ScanFwStatus::UnspecifiedError => "UNSPECIFIED_ERROR",
            ScanFwStatus::UnexpectedError => "UNEXPECTED_ERROR",
            ScanFwStatus::ExpiredTsf => "EXPIRED_TSF",
            ScanFwStatus::IncomplRtcalBeamsForVbs => "INCOMPL_RTCAL_BEAMS_FOR_VBS",
        }
    }
}

/// Raw status code as delivered, which may fall outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub fn status(&self) -> Option<ScanFwStatus> {
        ScanFwStatus::from_code(self.0)
    }

    pub fn is_complete(&self) -> bool {
        self.status() == Some(ScanFwStatus::Complete)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) => f.write_str(status.name()),
            None => write!(f, "code {}", self.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl Position {
    /// Formats as `37.48° N 122.14° W`.
    pub fn format(&self) -> String {
        let lat = if self.latitude >= 0.0 {
            format!("{}\u{B0} N", self.latitude)
        } else {
            format!("{}\u{B0} S", -self.latitude)
        };
        let lon = if self.longitude >= 0.0 {
            format!("{}\u{B0} E", self.longitude)
        } else {
            format!("{}\u{B0} W", -self.longitude)
        };
        format!("{} {}", lat, lon)
    }
}

/// One radio's answer to a topology scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponderResult {
    #[serde(rename = "addr")]
    pub address: String,
    #[serde(rename = "itorLqmMat", default)]
    pub beam_matrix: BeamQualityMatrix,
    #[serde(rename = "pos", default)]
    pub position: Option<Position>,
    #[serde(rename = "adjs", default)]
    pub adjacent_addresses: Vec<String>,
}

impl ResponderResult {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            beam_matrix: BeamQualityMatrix::new(),
            position: None,
            adjacent_addresses: Vec::new(),
        }
    }

    pub fn with_adjacent(mut self, addresses: &[&str]) -> Self {
        self.adjacent_addresses = addresses.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_lqm(mut self, tx_beam: i32, rx_beam: i32, lqm: i32) -> Self {
        self.beam_matrix.entry(tx_beam).or_default().insert(rx_beam, lqm);
        self
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.position = Some(Position {
            latitude,
            longitude,
            altitude: None,
            accuracy: None,
        });
        self
    }
}

#[derive(Deserialize)]
struct ScanOutcomeWire {
    #[serde(rename = "radioMac", default)]
    radio_mac: String,
    status: i32,
    #[serde(rename = "topoResps", default)]
    topo_resps: Option<BTreeMap<u32, ResponderResult>>,
}

/// A complete scan response, responders in encounter order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ScanOutcomeWire")]
pub struct ScanOutcome {
    pub initiator_address: String,
    pub completion_status: StatusCode,
    pub responders: Vec<ResponderResult>,
}

impl From<ScanOutcomeWire> for ScanOutcome {
    fn from(wire: ScanOutcomeWire) -> Self {
        Self {
            initiator_address: wire.radio_mac,
            completion_status: StatusCode(wire.status),
            responders: wire
                .topo_resps
                .map(|resps| resps.into_values().collect())
                .unwrap_or_default(),
        }
    }
}

impl ScanOutcome {
    pub fn new(initiator: &str, status: ScanFwStatus, responders: Vec<ResponderResult>) -> Self {
        Self {
            initiator_address: initiator.to_string(),
            completion_status: StatusCode(status.code()),
            responders,
        }
    }
}
