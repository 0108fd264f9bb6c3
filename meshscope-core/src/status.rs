use std::collections::BTreeMap;

use serde::Deserialize;

/// Text shown for unknown or missing fields.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Cn,
    Dn,
}

impl NodeType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(NodeType::Cn),
            2 => Some(NodeType::Dn),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Cn => "CN",
            NodeType::Dn => "DN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatusType {
    Offline,
    Online,
    OnlineInitiator,
}

impl NodeStatusType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(NodeStatusType::Offline),
            2 => Some(NodeStatusType::Online),
            3 => Some(NodeStatusType::OnlineInitiator),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeStatusType::Offline => "OFFLINE",
            NodeStatusType::Online => "ONLINE",
            NodeStatusType::OnlineInitiator => "ONLINE_INITIATOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatusType {
    LinkUp,
    LinkDown,
}

impl LinkStatusType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(LinkStatusType::LinkUp),
            2 => Some(LinkStatusType::LinkDown),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LinkStatusType::LinkUp => "LINK_UP",
            LinkStatusType::LinkDown => "LINK_DOWN",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioStatus {
    pub initialized: bool,
    pub gps_sync: bool,
    pub node_params_set: bool,
}

impl RadioStatus {
    pub fn state(&self) -> &'static str {
        if self.node_params_set {
            "configured"
        } else if self.initialized {
            "initialized"
        } else {
            "n/a"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BgpRoute {
    pub network: String,
    pub next_hop: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BgpInfo {
    pub online: bool,
    pub up_down_time: String,
    pub state_or_pfx_rcd: String,
    pub advertised_routes: Vec<BgpRoute>,
    pub received_routes: Vec<BgpRoute>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusReport {
    pub status: Option<i32>,
    pub ipv6_address: Option<String>,
    pub node_type: Option<i32>,
    pub hardware_board_id: Option<String>,
    pub hardware_model: Option<String>,
    pub version: Option<String>,
    pub uboot_version: Option<String>,
    pub firmware_version: Option<String>,
    pub radio_status: BTreeMap<String, RadioStatus>,
    pub network_interface_macs: BTreeMap<String, String>,
    pub bgp_status: BTreeMap<String, BgpInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkStatus {
    pub ifname: String,
    pub radio_mac: String,
    pub link_status_type: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkDump {
    /// Keyed by responder MAC.
    pub link_status_dump: BTreeMap<String, LinkStatus>,
}

fn or_unknown(value: &Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => UNKNOWN.to_string(),
    }
}

impl StatusReport {
    /// Label/value pairs for the general summary.
    pub fn general(&self) -> Vec<(&'static str, String)> {
        let status = self
            .status
            .and_then(NodeStatusType::from_code)
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let node_type = self
            .node_type
            .and_then(NodeType::from_code)
            .map(|t| t.name().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        vec![
            ("E2E Status:", status),
            ("IPv6 Addr:", or_unknown(&self.ipv6_address)),
            ("Node Type:", node_type),
            ("Board ID:", or_unknown(&self.hardware_board_id)),
            ("Model:", or_unknown(&self.hardware_model)),
        ]
    }

    /// `[mac, state, gps sync]` per radio.
    pub fn radio_rows(&self) -> Vec<[String; 3]> {
        self.radio_status
            .iter()
            .map(|(mac, status)| {
                [
                    if mac.is_empty() { UNKNOWN.to_string() } else { mac.clone() },
                    status.state().to_string(),
                    if status.gps_sync { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect()
    }

    pub fn version_rows(&self) -> Vec<[String; 2]> {
        [
            ("Software", &self.version),
            ("U-Boot", &self.uboot_version),
            ("Firmware", &self.firmware_version),
        ]
        .iter()
        .map(|(name, value)| [name.to_string(), or_unknown(value)])
        .collect()
    }

    /// `[interface, mac]`, sorted by interface name.
    pub fn interface_rows(&self) -> Vec<[String; 2]> {
        self.network_interface_macs
            .iter()
            .map(|(name, mac)| [name.clone(), mac.clone()])
            .collect()
    }

    pub fn radio_macs(&self) -> Vec<&str> {
        self.radio_status.keys().map(String::as_str).collect()
    }

    pub fn has_radios(&self) -> bool {
        !self.radio_status.is_empty()
    }
}

impl BgpInfo {
    pub fn status_name(&self) -> &'static str {
        if self.online {
            "Established"
        } else {
            "Disconnected"
        }
    }

    pub fn uptime_label(&self) -> &'static str {
        if self.online {
            "Uptime:"
        } else {
            "Downtime:"
        }
    }

    /// The field holds either a prefix count or a session state name.
    pub fn state_label(&self) -> &'static str {
        if self.state_or_pfx_rcd.trim().parse::<f64>().is_ok() {
            "Received Prefixes:"
        } else {
            "State:"
        }
    }
}

impl BgpRoute {
    pub fn describe(&self) -> String {
        format!("{} \u{2192} {}", self.network, self.next_hop)
    }
}

impl LinkDump {
    /// `[interface, radio mac, responder mac, status]` per link.
    pub fn link_rows(&self) -> Vec<[String; 4]> {
        self.link_status_dump
            .iter()
            .map(|(responder, info)| {
                [
                    info.ifname.clone(),
                    info.radio_mac.clone(),
                    responder.clone(),
                    info.link_status_type
                        .and_then(LinkStatusType::from_code)
                        .map(|s| s.name().to_string())
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                ]
            })
            .collect()
    }

    pub fn has_links(&self) -> bool {
        !self.link_status_dump.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "status": 3,
        "ipv6Address": "2001::1",
        "nodeType": 2,
        "hardwareModel": "NXP TG Board LS1048A (PUMA)",
        "version": "Facebook Terragraph Release RELEASE_M80",
        "radioStatus": {
            "04:ce:14:fe:a5:2f": { "initialized": true, "gpsSync": true, "nodeParamsSet": true },
            "04:ce:14:fe:a5:2e": { "initialized": true, "gpsSync": false }
        },
        "networkInterfaceMacs": { "nic1": "aa:00:00:00:00:01", "eth0": "aa:00:00:00:00:00" },
        "bgpStatus": {
            "2001::2": {
                "online": true,
                "upDownTime": "01:02:03",
                "stateOrPfxRcd": "4",
                "advertisedRoutes": [ { "network": "2001:0:0:1::/64", "nextHop": "::" } ],
                "receivedRoutes": []
            }
        }
    }"#;

    #[test]
    fn test_general_summary() {
        let report: StatusReport = serde_json::from_str(REPORT).expect("decoded report");
        let general = report.general();

        assert_eq!(general[0], ("E2E Status:", "ONLINE_INITIATOR".to_string()));
        assert_eq!(general[2], ("Node Type:", "DN".to_string()));
        assert_eq!(general[3], ("Board ID:", UNKNOWN.to_string()));
    }

    #[test]
    fn test_radio_rows() {
        let report: StatusReport = serde_json::from_str(REPORT).expect("decoded report");

        assert_eq!(
            report.radio_rows(),
            vec![
                ["04:ce:14:fe:a5:2e".to_string(), "initialized".to_string(), "no".to_string()],
                ["04:ce:14:fe:a5:2f".to_string(), "configured".to_string(), "yes".to_string()],
            ]
        );
        assert_eq!(RadioStatus::default().state(), "n/a");
    }

    #[test]
    fn test_versions_and_interfaces() {
        let report: StatusReport = serde_json::from_str(REPORT).expect("decoded report");

        let versions = report.version_rows();
        assert_eq!(versions[0][1], "Facebook Terragraph Release RELEASE_M80");
        assert_eq!(versions[1], ["U-Boot".to_string(), UNKNOWN.to_string()]);

        let interfaces = report.interface_rows();
        assert_eq!(interfaces[0][0], "eth0");
        assert_eq!(interfaces[1][0], "nic1");
    }

    #[test]
    fn test_bgp_labels() {
        let report: StatusReport = serde_json::from_str(REPORT).expect("decoded report");
        let info = &report.bgp_status["2001::2"];

        assert_eq!(info.status_name(), "Established");
        assert_eq!(info.state_label(), "Received Prefixes:");
        assert_eq!(info.advertised_routes[0].describe(), "2001:0:0:1::/64 \u{2192} ::");

        let idle = BgpInfo {
            state_or_pfx_rcd: "Active".to_string(),
            ..Default::default()
        };
        assert_eq!(idle.state_label(), "State:");
        assert_eq!(idle.uptime_label(), "Downtime:");
    }

    #[test]
    fn test_empty_report() {
        let report: StatusReport = serde_json::from_str("{}").expect("decoded report");

        assert!(!report.has_radios());
        assert!(report.radio_rows().is_empty());
        assert_eq!(report.general()[0].1, UNKNOWN);
    }

    #[test]
    fn test_link_rows() {
        let dump: LinkDump = serde_json::from_str(
            r#"{"linkStatusDump": {
                "04:ce:14:fe:a5:99": { "ifname": "terra0", "radioMac": "04:ce:14:fe:a5:2f", "linkStatusType": 1 },
                "04:ce:14:fe:a5:98": { "ifname": "terra1", "radioMac": "04:ce:14:fe:a5:2e", "linkStatusType": 7 }
            }}"#,
        )
        .expect("decoded link dump");

        let rows = dump.link_rows();
        assert_eq!(rows[0][2], "04:ce:14:fe:a5:98");
        assert_eq!(rows[0][3], UNKNOWN);
        assert_eq!(rows[1][3], "LINK_UP");
        assert!(dump.has_links());
        assert!(!LinkDump::default().has_links());
    }
}
