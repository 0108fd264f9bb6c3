pub mod beam;
pub mod group;
pub mod ignition;
pub mod mac;
pub mod node_config;
pub mod presenter;
pub mod scan;
pub mod status;
pub mod telemetry;

pub use beam::{select_best_beam, BeamSelection};
pub use group::{group_responders, Adjacent, DeviceGroup, Grouping};
pub use presenter::{present, DeviceRow, ResponderRow, ScanReport};
pub use scan::{BeamQualityMatrix, ResponderResult, ScanFwStatus, ScanOutcome, StatusCode};
pub use telemetry::{SeriesPalette, TelemetryRingBuffer, TelemetrySample};

#[cfg(test)]
mod tests {

    use crate::{present, ScanOutcome, ScanReport};

    #[test]
    fn test_scan_json_to_report() {
        let json = r#"{
            "radioMac": "00:00:00:10:0d:40",
            "status": 0,
            "topoResps": {
                "0": {
                    "addr": "aa:00:00:00:00:01",
                    "itorLqmMat": { "10": { "20": 300 }, "11": { "20": 280 } },
                    "adjs": []
                },
                "1": {
                    "addr": "bb:00:00:00:00:02",
                    "itorLqmMat": { "5": { "5": 200 } },
                    "adjs": ["aa:00:00:00:00:01", "ee:00:00:00:00:09"]
                },
                "2": {
                    "addr": "cc:00:00:00:00:03",
                    "itorLqmMat": { "0": { "0": 0 } }
                }
            }
        }"#;

        let outcome: ScanOutcome = serde_json::from_str(json).expect("decoded scan");

        let ScanReport::Devices { rows, responder_count, .. } = present(&outcome) else {
            panic!("expected device rows");
        };

        assert_eq!(responder_count, 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].addresses().collect::<Vec<_>>(),
            vec!["aa:00:00:00:00:01", "bb:00:00:00:00:02"]
        );
        assert_eq!(rows[0].extra_adjacencies, vec!["ee:00:00:00:00:09".to_string()]);
        assert_eq!(rows[1].members[0].selection.best_snr_db, None);
    }
}
