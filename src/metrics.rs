//! Request counters and inference latency tracking for the service.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept before the oldest half is dropped
const LATENCY_WINDOW: usize = 10_000;

/// Metrics collector for the prediction service
pub struct ServiceMetrics {
    /// Predictions returned to a client
    pub predictions_served: AtomicU64,
    /// Requests rejected by range validation
    pub validation_rejections: AtomicU64,
    /// Form submissions that could not be parsed
    pub invalid_forms: AtomicU64,
    /// Classifier calls that failed
    pub inference_failures: AtomicU64,
    /// Inference times (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Predictions per crop label
    crops: RwLock<HashMap<String, u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            validation_rejections: AtomicU64::new(0),
            invalid_forms: AtomicU64::new(0),
            inference_failures: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            crops: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, crop: &str, latency: Duration) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.latencies.write() {
            times.push(latency.as_micros() as u64);
            if times.len() > LATENCY_WINDOW {
                times.drain(0..LATENCY_WINDOW / 2);
            }
        }

        if let Ok(mut crops) = self.crops.write() {
            *crops.entry(crop.to_string()).or_insert(0) += 1;
        }
    }

    /// Record a request that failed range validation
    pub fn record_rejection(&self) {
        self.validation_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a form that could not be parsed
    pub fn record_invalid_form(&self) {
        self.invalid_forms.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a classifier failure
    pub fn record_inference_failure(&self) {
        self.inference_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get inference latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        let Ok(times) = self.latencies.read() else {
            return LatencyStats::default();
        };
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Get prediction counts per crop, sorted by name
    pub fn crop_counts(&self) -> BTreeMap<String, u64> {
        self.crops
            .read()
            .map(|crops| crops.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }

    /// Get current throughput (predictions per second)
    pub fn throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Point-in-time copy of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            predictions_served: self.predictions_served.load(Ordering::Relaxed),
            validation_rejections: self.validation_rejections.load(Ordering::Relaxed),
            invalid_forms: self.invalid_forms.load(Ordering::Relaxed),
            inference_failures: self.inference_failures.load(Ordering::Relaxed),
            throughput: self.throughput(),
            latency: self.latency_stats(),
            crops: self.crop_counts(),
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║          CROP RECOMMENDATION SERVICE - METRICS SUMMARY        ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Predictions Served: {:>8}  │  Throughput: {:>8.2} req/s ║",
            snapshot.predictions_served, snapshot.throughput
        );
        info!(
            "║ Rejected: {:>6}  │  Bad Forms: {:>6}  │  Failures: {:>6}   ║",
            snapshot.validation_rejections, snapshot.invalid_forms, snapshot.inference_failures
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Inference Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            snapshot.latency.mean_us,
            snapshot.latency.p50_us,
            snapshot.latency.p95_us,
            snapshot.latency.p99_us
        );

        if !snapshot.crops.is_empty() {
            info!("╠══════════════════════════════════════════════════════════════╣");
            info!("║ Predictions by Crop:                                         ║");
            for (crop, count) in &snapshot.crops {
                let pct = (*count as f64 / snapshot.predictions_served.max(1) as f64) * 100.0;
                info!("║   {:12}: {:>6} ({:>5.1}%)", crop, count, pct);
            }
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference latency statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable view of [`ServiceMetrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub predictions_served: u64,
    pub validation_rejections: u64,
    pub invalid_forms: u64,
    pub inference_failures: u64,
    pub throughput: f64,
    pub latency: LatencyStats,
    pub crops: BTreeMap<String, u64>,
}

/// Periodic metrics reporter that logs summaries
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    /// Create a reporter that logs a summary every `interval_secs`
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let period = Duration::from_secs(self.interval_secs);
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
