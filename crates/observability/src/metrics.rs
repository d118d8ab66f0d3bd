//! Wire / validation metrics
//!
//! Counters go through the global `metrics` recorder (a no-op until one is installed);
//! [`TransportStatsAggregator`] keeps an in-memory summary for command-line reports.

use std::collections::BTreeMap;

use contracts::{CodecError, RecordType, SensorKind, ValidationReport};
use metrics::{counter, histogram};

/// 记录一次成功编码
pub fn record_encoded(kind: SensorKind, record: RecordType, bytes: usize) {
    counter!(
        "obsidian_wire_encoded_total",
        "kind" => kind.heading(),
        "record" => record.name()
    )
    .increment(1);

    histogram!(
        "obsidian_wire_payload_bytes",
        "kind" => kind.heading(),
        "record" => record.name()
    )
    .record(bytes as f64);
}

/// 记录一次成功解码
pub fn record_decoded(kind: SensorKind, record: RecordType) {
    counter!(
        "obsidian_wire_decoded_total",
        "kind" => kind.heading(),
        "record" => record.name()
    )
    .increment(1);
}

/// 记录解码失败
pub fn record_decode_error(kind: SensorKind, error: &CodecError) {
    counter!(
        "obsidian_wire_decode_errors_total",
        "kind" => kind.heading(),
        "reason" => error.reason()
    )
    .increment(1);
}

/// 记录校验结果
pub fn record_validation(kind: SensorKind, report: &ValidationReport) {
    counter!("obsidian_validation_runs_total", "kind" => kind.heading()).increment(1);
    if !report.is_valid() {
        counter!(
            "obsidian_validation_diagnostics_total",
            "kind" => kind.heading()
        )
        .increment(report.len() as u64);
    }
}

/// In-memory transport statistics, keyed by kind and record
#[derive(Debug, Clone, Default)]
pub struct TransportStatsAggregator {
    payloads: BTreeMap<(SensorKind, &'static str), RunningStats>,
    failures: u64,
}

impl TransportStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次往返的载荷大小
    pub fn record_round_trip(&mut self, kind: SensorKind, record: RecordType, bytes: usize) {
        self.payloads
            .entry((kind, record.name()))
            .or_default()
            .push(bytes as f64);
    }

    /// 合并另一个聚合器（例如各 worker 的结果）
    pub fn merge(&mut self, other: TransportStatsAggregator) {
        for (key, stats) in other.payloads {
            self.payloads.entry(key).or_default().merge(&stats);
        }
        self.failures += other.failures;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn round_trips(&self) -> u64 {
        self.payloads.values().map(RunningStats::count).sum()
    }

    /// 生成摘要报告
    pub fn summary(&self) -> TransportSummary {
        TransportSummary {
            round_trips: self.round_trips(),
            failures: self.failures,
            payload_bytes: self
                .payloads
                .iter()
                .map(|((kind, record), stats)| (format!("{kind}.{record}"), stats.into()))
                .collect(),
        }
    }
}

/// 传输摘要
#[derive(Debug, Clone, Default)]
pub struct TransportSummary {
    pub round_trips: u64,
    pub failures: u64,
    pub payload_bytes: BTreeMap<String, StatsSummary>,
}

impl std::fmt::Display for TransportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Transport Summary ===")?;
        writeln!(f, "Round trips: {}", self.round_trips)?;
        writeln!(f, "Failures: {}", self.failures)?;
        if !self.payload_bytes.is_empty() {
            writeln!(f, "Payload bytes:")?;
            for (name, stats) in &self.payload_bytes {
                writeln!(f, "  {}: {}", name, stats)?;
            }
        }
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1} (n={})",
                self.min, self.max, self.mean, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 合并两组统计 (Chan et al. 并行算法)
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        self.mean += delta * other.count as f64 / count as f64;
        self.m2 += other.m2 + delta * delta * (self.count as f64 * other.count as f64) / count as f64;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count = count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }
}
