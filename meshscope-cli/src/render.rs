use std::fmt::Write;

use meshscope_core::presenter::{DeviceRow, ScanReport};
use meshscope_core::status::{LinkDump, StatusReport};
use meshscope_core::telemetry::{SeriesPalette, TelemetryRingBuffer, TelemetrySample};

const NOT_AVAILABLE: &str = "n/a";

const SCAN_HEADERS: [&str; 7] = [
    "Node",
    "MAC Addrs",
    "SNR (dB)",
    "Tx Angle",
    "Rx Angle",
    "Location",
    "Adjacencies",
];

/// Left-aligned columns, two spaces apart, padded to the widest cell.
fn table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut line = |cells: Vec<&str>| {
        let mut text = String::new();
        for (cell, width) in cells.iter().zip(widths.iter()) {
            let _ = write!(text, "{:<width$}  ", cell, width = width);
        }
        out.push_str(text.trim_end());
        out.push('\n');
    };

    line(headers.to_vec());
    for row in rows {
        line(row.iter().map(String::as_str).collect());
    }
    out
}

fn format_snr(snr: Option<f64>) -> String {
    snr.map(|s| s.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_angle(angle: Option<f64>) -> String {
    angle
        .map(|a| format!("{}\u{B0}", a))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// One line per member; the ordinal and extra adjacencies sit on the first.
fn device_lines(device: &DeviceRow) -> Vec<[String; 7]> {
    device
        .members
        .iter()
        .enumerate()
        .map(|(idx, member)| {
            let first = idx == 0;
            [
                if first { device.ordinal.to_string() } else { String::new() },
                member.address.clone(),
                format_snr(member.selection.best_snr_db),
                format_angle(member.selection.best_tx_angle_deg),
                format_angle(member.selection.best_rx_angle_deg),
                member.location.clone().unwrap_or_default(),
                if first { device.extra_adjacencies.join(", ") } else { String::new() },
            ]
        })
        .collect()
}

pub fn render_scan(report: &ScanReport) -> String {
    match report {
        ScanReport::Failed { status } => format!("Scan failed: {}\n", status),
        ScanReport::NoResponses => "No responses received.\n".to_string(),
        ScanReport::Devices { rows, .. } => {
            let lines: Vec<[String; 7]> = rows.iter().flat_map(device_lines).collect();
            let mut out = table(SCAN_HEADERS, &lines);
            if let Some(footer) = report.footer() {
                out.push('\n');
                out.push_str(&footer);
                out.push('\n');
            }
            out
        }
    }
}

pub fn render_status(report: &StatusReport) -> String {
    let mut out = String::new();

    for (label, value) in report.general() {
        let _ = writeln!(out, "{:<12} {}", label, value);
    }

    out.push_str("\nRadios\n");
    if report.has_radios() {
        out.push_str(&table(["MAC", "Status", "GPS Sync"], &report.radio_rows()));
    } else {
        let _ = writeln!(out, "{}", NOT_AVAILABLE);
    }

    out.push_str("\nVersions\n");
    out.push_str(&table(["Component", "Version"], &report.version_rows()));

    out.push_str("\nInterfaces\n");
    let interfaces = report.interface_rows();
    if interfaces.is_empty() {
        let _ = writeln!(out, "{}", NOT_AVAILABLE);
    } else {
        out.push_str(&table(["Interface", "MAC"], &interfaces));
    }

    out.push_str("\nBGP Peers\n");
    if report.bgp_status.is_empty() {
        let _ = writeln!(out, "{}", NOT_AVAILABLE);
    }
    for (peer, info) in &report.bgp_status {
        let _ = writeln!(out, "{} ({})", peer, info.status_name());
        let _ = writeln!(out, "  {} {}", info.uptime_label(), info.up_down_time);
        let _ = writeln!(out, "  {} {}", info.state_label(), info.state_or_pfx_rcd);
        for route in &info.advertised_routes {
            let _ = writeln!(out, "  advertised {}", route.describe());
        }
        for route in &info.received_routes {
            let _ = writeln!(out, "  received {}", route.describe());
        }
    }

    out
}

pub fn render_links(dump: &LinkDump) -> String {
    if !dump.has_links() {
        return format!("{}\n", NOT_AVAILABLE);
    }
    table(
        ["Interface", "Radio MAC", "Responder MAC", "Status"],
        &dump.link_rows(),
    )
}

fn format_timestamp(micros: i64) -> String {
    chrono::DateTime::from_timestamp_micros(micros)
        .map(|t| t.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| micros.to_string())
}

pub fn render_sample(sample: &TelemetrySample) -> String {
    format!(
        "{}  {}  {} = {}",
        format_timestamp(sample.timestamp_micros),
        sample.link_name(),
        sample.metric_key,
        sample.value
    )
}

/// Per metric, one line per link with its color and last/min/max values.
pub fn render_stats_summary(buffer: &TelemetryRingBuffer, palette: &mut SeriesPalette) -> String {
    let mut out = String::new();
    let links = buffer.link_names();

    for key in buffer.metric_keys() {
        let _ = writeln!(out, "{}", key);
        for (link, points) in buffer.series(&key) {
            let index = links.iter().position(|l| *l == link).unwrap_or_default();
            let values = points.iter().map(|(_, v)| *v);
            let min = values.clone().fold(f64::INFINITY, f64::min);
            let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
            let last = values.last().unwrap_or_default();
            let _ = writeln!(
                out,
                "  {} {}  n={} last={} min={} max={}",
                palette.color(index).hex(),
                link,
                points.len(),
                last,
                min,
                max
            );
        }
    }

    if out.is_empty() {
        out.push_str("No link stats received.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshscope_core::presenter::present;
    use meshscope_core::scan::{ResponderResult, ScanFwStatus, ScanOutcome};

    #[test]
    fn test_render_scan_rows() {
        let outcome = ScanOutcome::new(
            "00:00:00:10:0d:40",
            ScanFwStatus::Complete,
            vec![
                ResponderResult::new("aa:00:00:00:00:01")
                    .with_lqm(10, 20, 300)
                    .with_adjacent(&["ee:00:00:00:00:09"]),
                ResponderResult::new("bb:00:00:00:00:02").with_adjacent(&["aa:00:00:00:00:01"]),
            ],
        );

        let text = render_scan(&present(&outcome));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Node  MAC Addrs"));
        assert!(lines[1].starts_with("1     aa:00:00:00:00:01  5.5"));
        assert!(lines[1].contains("-30\u{B0}"));
        assert!(lines[1].ends_with("ee:00:00:00:00:09"));
        assert!(lines[2].contains("bb:00:00:00:00:02  n/a"));
        assert_eq!(
            lines.last().copied(),
            Some("Scan from 00:00:00:10:0d:40 - 2 responder(s), 1 node(s)")
        );
    }

    #[test]
    fn test_render_scan_failure() {
        let outcome = ScanOutcome::new("00:00:00:10:0d:40", ScanFwStatus::StaNotAssoc, Vec::new());
        assert_eq!(render_scan(&present(&outcome)), "Scan failed: STA_NOT_ASSOC\n");

        let empty = ScanOutcome::new("00:00:00:10:0d:40", ScanFwStatus::Complete, Vec::new());
        assert_eq!(render_scan(&present(&empty)), "No responses received.\n");
    }

    #[test]
    fn test_render_empty_status() {
        let text = render_status(&StatusReport::default());

        assert!(text.starts_with("E2E Status:  unknown\n"));
        assert!(text.contains("Radios\nn/a\n"));
        assert!(text.contains("BGP Peers\nn/a\n"));
        assert_eq!(render_links(&LinkDump::default()), "n/a\n");
    }

    #[test]
    fn test_render_stats_summary() {
        let mut buffer = TelemetryRingBuffer::new(10);
        for (ts, value) in [(1, 12.0), (2, 15.0), (3, 13.5)] {
            buffer.push(TelemetrySample {
                metric_key: "snr".to_string(),
                timestamp_micros: ts,
                value,
                link_initiator_mac: "aa:00:00:00:00:01".to_string(),
                link_responder_mac: "bb:00:00:00:00:02".to_string(),
            });
        }
        let mut palette = SeriesPalette::new(7);
        let color = palette.clone().color(0).hex();

        let text = render_stats_summary(&buffer, &mut palette);

        assert_eq!(
            text,
            format!(
                "snr\n  {} aa:00:00:00:00:01 \u{21C6} bb:00:00:00:00:02  n=3 last=13.5 min=12 max=15\n",
                color
            )
        );
        assert_eq!(
            render_stats_summary(&TelemetryRingBuffer::default(), &mut palette),
            "No link stats received.\n"
        );
    }

    #[test]
    fn test_render_sample_timestamp() {
        let sample = TelemetrySample {
            metric_key: "mcs".to_string(),
            timestamp_micros: 3_723_004_000,
            value: 9.0,
            link_initiator_mac: "aa:00:00:00:00:01".to_string(),
            link_responder_mac: "bb:00:00:00:00:02".to_string(),
        };

        assert_eq!(
            render_sample(&sample),
            "01:02:03.004  aa:00:00:00:00:01 \u{21C6} bb:00:00:00:00:02  mcs = 9"
        );
    }
}
