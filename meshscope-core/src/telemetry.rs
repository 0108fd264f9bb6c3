use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

/// Capacity used by the statistics view: 25 points for each of three metrics.
pub const DEFAULT_CAPACITY: usize = 25 * 3;

/// One pushed link statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(rename = "key")]
    pub metric_key: String,
    #[serde(rename = "timestamp", alias = "ts", default)]
    pub timestamp_micros: i64,
    pub value: f64,
    #[serde(rename = "radioMac")]
    pub link_initiator_mac: String,
    #[serde(rename = "responderMac")]
    pub link_responder_mac: String,
}

impl TelemetrySample {
    /// Label of the link this sample belongs to.
    pub fn link_name(&self) -> String {
        format!("{} \u{21C6} {}", self.link_initiator_mac, self.link_responder_mac)
    }
}

/// Fixed-capacity FIFO of samples; the oldest sample is evicted first.
#[derive(Debug, Clone)]
pub struct TelemetryRingBuffer {
    capacity: usize,
    samples: VecDeque<TelemetrySample>,
}

impl TelemetryRingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: TelemetrySample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Unique metric keys, sorted.
    pub fn metric_keys(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(|s| s.metric_key.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unique link labels, sorted.
    pub fn link_names(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(TelemetrySample::link_name)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Points of one metric, split per link, in buffer order.
    pub fn series(&self, metric_key: &str) -> BTreeMap<String, Vec<(i64, f64)>> {
        let mut series: BTreeMap<String, Vec<(i64, f64)>> = BTreeMap::new();
        for sample in self.samples.iter().filter(|s| s.metric_key == metric_key) {
            series
                .entry(sample.link_name())
                .or_default()
                .push((sample.timestamp_micros, sample.value));
        }
        series
    }
}

impl Default for TelemetryRingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

/// Series index -> color. Colors are derived from the seed and cached, so
/// the same palette always hands out the same color for an index.
#[derive(Debug, Clone)]
pub struct SeriesPalette {
    seed: u64,
    colors: Vec<Rgb>,
}

impl SeriesPalette {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            colors: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn color(&mut self, index: usize) -> Rgb {
        while self.colors.len() <= index {
            let next = self.colors.len();
            self.colors.push(self.generate(next));
        }
        self.colors[index]
    }

    fn generate(&self, index: usize) -> Rgb {
        let start = (self.seed as f64 * GOLDEN_RATIO_CONJUGATE).fract();
        let hue = (start + index as f64 * GOLDEN_RATIO_CONJUGATE).fract();
        hsv_to_rgb(hue, 0.65, 0.85)
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector as i32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let scale = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(scale(r), scale(g), scale(b))
}
