//! Minimal metrics registry for the gateway.
//!
//! Counter/gauge/histogram types with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. Histogram buckets are fixed in microseconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use likes_core::LikesError;

type LabelKey = Vec<(String, String)>;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn series(name: &str, key: &LabelKey) -> String {
    if key.is_empty() {
        name.to_string()
    } else {
        format!("{}{{{}}}", name, label_str(key))
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", series(name, r.key()), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }
    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", series(name, r.key()), val);
        }
    }
}

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
const BUCKETS_MICROS: [u64; 9] = [
    100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = duration.as_micros() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let key = r.key();
            let hist = r.value();

            let labels = label_str(key);
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };

            // `le` stays in integer micros; the metric name carries the unit.
            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_sum"), key), sum);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_count"), key), count);
        }
    }
}

#[derive(Default)]
pub struct LikesMetrics {
    pub requests: CounterVec,
    pub requests_inflight: GaugeVec,
    pub store_duration: HistogramVec, // In Microseconds
    draining: AtomicBool,
}

impl LikesMetrics {
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Record one counter operation (`get` / `increment`) and its outcome.
    pub fn observe_op<T>(&self, op: &str, elapsed: Duration, res: &Result<T, LikesError>) {
        let outcome = match res {
            Ok(_) => "ok",
            Err(e) => e.client_code().as_str(),
        };
        self.requests.inc(&[("op", op), ("outcome", outcome)]);
        self.store_duration.observe(&[("op", op)], elapsed);
    }

    /// Render all registered metrics plus caller-supplied gauges.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.requests.render("likes_requests_total", &mut out);
        self.requests_inflight.render("likes_requests_inflight", &mut out);
        self.store_duration
            .render("likes_store_duration_micros", &mut out);

        let _ = writeln!(
            out,
            "# TYPE likes_draining gauge\nlikes_draining {}",
            if self.is_draining() { 1 } else { 0 }
        );
        for (k, v) in extra {
            let _ = writeln!(out, "# TYPE {} gauge\n{} {}", k, k, v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_labelled_by_client_code() {
        let m = LikesMetrics::default();
        m.observe_op("increment", Duration::from_micros(250), &Ok::<u64, LikesError>(1));
        m.observe_op(
            "increment",
            Duration::from_micros(250),
            &Err::<u64, _>(LikesError::StoreUnavailable("down".into())),
        );

        assert_eq!(m.requests.get(&[("op", "increment"), ("outcome", "ok")]), 1);
        assert_eq!(
            m.requests.get(&[("outcome", "STORE_UNAVAILABLE"), ("op", "increment")]),
            1
        );
        assert_eq!(m.store_duration.count(&[("op", "increment")]), 2);
    }

    #[test]
    fn render_uses_cumulative_buckets() {
        let m = LikesMetrics::default();
        m.store_duration
            .observe(&[("op", "get")], Duration::from_micros(700));

        let out = m.render(&[]);
        assert!(out.contains("likes_store_duration_micros_bucket{op=\"get\",le=\"500\"} 0"));
        assert!(out.contains("likes_store_duration_micros_bucket{op=\"get\",le=\"1000\"} 1"));
        assert!(out.contains("likes_store_duration_micros_bucket{op=\"get\",le=\"+Inf\"} 1"));
        assert!(out.contains("likes_store_duration_micros_sum{op=\"get\"} 700"));
        assert!(out.contains("likes_draining 0"));
    }

    #[test]
    fn extra_values_render_as_typed_gauges() {
        let m = LikesMetrics::default();
        let out = m.render(&[("likes_max_slug_len", 256)]);
        assert!(out.contains("# TYPE likes_max_slug_len gauge\nlikes_max_slug_len 256\n"));
    }

    #[test]
    fn unlabelled_gauge_renders_bare_name() {
        let m = LikesMetrics::default();
        m.requests_inflight.inc(&[]);
        m.requests_inflight.inc(&[]);
        m.requests_inflight.dec(&[]);
        assert!(m.render(&[]).contains("\nlikes_requests_inflight 1\n"));
    }
}
