use crate::prelude::{ConditionError, ConditionResult};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Margin kept on both sides of the requested window during load, in seconds.
pub const WINDOW_GUARD_SECS: f64 = 100.0;

/// Body-attitude sample: unit quaternion, vector part first, scalar last.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttitudeSample {
    pub t: f64,
    pub q: [f64; 4],
}

/// Platform position sample, optionally carrying velocity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionSample {
    pub t: f64,
    pub pos: [f64; 3],
    pub vel: Option<[f64; 3]>,
}

/// Span of interest in the telemetry time scale.
///
/// Converting calendar epochs into this flat continuous-seconds scale,
/// including any mission-specific epoch offsets, is the caller's job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    fn keeps(&self, t: f64) -> bool {
        t > self.start - WINDOW_GUARD_SECS && t < self.end + WINDOW_GUARD_SECS
    }
}

/// Immutable, time-sorted attitude telemetry.
///
/// Built once by `load`/`from_samples`; queries take `&self`, so a loaded
/// series can be read concurrently without synchronization.
#[derive(Debug)]
pub struct AttitudeSeries {
    pub(crate) samples: Vec<AttitudeSample>,
    pub(crate) metrics: MetricsRecorder,
}

impl AttitudeSeries {
    /// Reads whitespace-separated `t q1 q2 q3 q4` lines, keeps samples inside
    /// the guarded window, and sorts them by time.
    ///
    /// An unreadable file or any malformed line fails the whole load.
    pub fn load<P: AsRef<Path>>(path: P, window: &TimeWindow) -> ConditionResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let samples = parse_attitude(&text)?;
        let series = Self::from_samples(samples, window);
        LogManager::new("kinematics").record(&format!(
            "loaded {} attitude samples from {}",
            series.len(),
            path.display()
        ));
        Ok(series)
    }

    pub fn from_samples(samples: Vec<AttitudeSample>, window: &TimeWindow) -> Self {
        let mut kept: Vec<AttitudeSample> =
            samples.into_iter().filter(|s| window.keeps(s.t)).collect();
        kept.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self {
            samples: kept,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[AttitudeSample] {
        &self.samples
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Immutable, time-sorted position telemetry.
#[derive(Debug)]
pub struct PositionSeries {
    pub(crate) samples: Vec<PositionSample>,
    pub(crate) has_velocity: bool,
    pub(crate) metrics: MetricsRecorder,
}

impl PositionSeries {
    /// Reads whitespace-separated `t x y z [vx vy vz]` lines, keeps samples
    /// inside the guarded window, and sorts them by time.
    ///
    /// All records of one file must agree on whether they carry velocity;
    /// a mix is treated as corruption, as are short lines and unparseable
    /// numbers.
    pub fn load<P: AsRef<Path>>(path: P, window: &TimeWindow) -> ConditionResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let samples = parse_position(&text)?;
        let series = Self::from_samples(samples, window);
        LogManager::new("kinematics").record(&format!(
            "loaded {} position samples from {}",
            series.len(),
            path.display()
        ));
        Ok(series)
    }

    pub fn from_samples(samples: Vec<PositionSample>, window: &TimeWindow) -> Self {
        let mut kept: Vec<PositionSample> =
            samples.into_iter().filter(|s| window.keeps(s.t)).collect();
        kept.sort_by(|a, b| a.t.total_cmp(&b.t));
        let has_velocity = !kept.is_empty() && kept.iter().all(|s| s.vel.is_some());
        Self {
            samples: kept,
            has_velocity,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    pub fn has_velocity(&self) -> bool {
        self.has_velocity
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

fn parse_attitude(text: &str) -> ConditionResult<Vec<AttitudeSample>> {
    let mut samples = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_fields(line, 5, lineno)?;
        samples.push(AttitudeSample {
            t: fields[0],
            q: [fields[1], fields[2], fields[3], fields[4]],
        });
    }
    Ok(samples)
}

fn parse_position(text: &str) -> ConditionResult<Vec<PositionSample>> {
    let mut samples = Vec::new();
    let mut with_velocity: Option<bool> = None;

    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_fields(line, 4, lineno)?;
        let vel = if fields.len() >= 7 {
            Some([fields[4], fields[5], fields[6]])
        } else {
            None
        };

        match with_velocity {
            None => with_velocity = Some(vel.is_some()),
            Some(expected) if expected != vel.is_some() => {
                return Err(ConditionError::CorruptTelemetry(format!(
                    "line {}: velocity columns differ from earlier records",
                    lineno + 1
                )));
            }
            Some(_) => {}
        }

        samples.push(PositionSample {
            t: fields[0],
            pos: [fields[1], fields[2], fields[3]],
            vel,
        });
    }
    Ok(samples)
}

fn parse_fields(line: &str, want: usize, lineno: usize) -> ConditionResult<Vec<f64>> {
    let mut fields = Vec::with_capacity(want);
    for token in line.split_whitespace() {
        let value = token.parse::<f64>().map_err(|_| {
            ConditionError::CorruptTelemetry(format!(
                "line {}: unparseable field '{}'",
                lineno + 1,
                token
            ))
        })?;
        fields.push(value);
    }
    if fields.len() < want {
        return Err(ConditionError::CorruptTelemetry(format!(
            "line {}: {} fields, record needs {}",
            lineno + 1,
            fields.len(),
            want
        )));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ConditionError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn window_filter_applies_guard_margin_and_sorts() {
        let samples = vec![
            AttitudeSample {
                t: 500.0,
                q: [0.0, 0.0, 0.0, 1.0],
            },
            AttitudeSample {
                t: 120.0,
                q: [0.0, 0.0, 0.0, 1.0],
            },
            AttitudeSample {
                t: 301.0,
                q: [0.0, 0.0, 0.0, 1.0],
            },
            AttitudeSample {
                t: 99.0,
                q: [0.0, 0.0, 0.0, 1.0],
            },
        ];
        let series = AttitudeSeries::from_samples(samples, &TimeWindow::new(200.0, 300.0));

        // 500.0 falls outside end + 100; the rest stay, time-ordered.
        let times: Vec<f64> = series.samples().iter().map(|s| s.t).collect();
        assert_eq!(times, vec![120.0, 301.0]);
    }

    #[test]
    fn attitude_load_reads_five_column_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.0 0.0 0.0 0.0 1.0").unwrap();
        writeln!(file, "11.0 0.0 0.0 0.1 0.995").unwrap();
        let series = AttitudeSeries::load(file.path(), &TimeWindow::new(0.0, 20.0)).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.samples()[1].q[2], 0.1);
    }

    #[test]
    fn attitude_load_rejects_short_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.0 0.0 0.0 0.0 1.0").unwrap();
        writeln!(file, "11.0 0.0 0.0").unwrap();
        let err = AttitudeSeries::load(file.path(), &TimeWindow::new(0.0, 20.0)).unwrap_err();
        assert!(matches!(err, ConditionError::CorruptTelemetry(_)));
    }

    #[test]
    fn attitude_load_rejects_unparseable_numbers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.0 0.0 zero 0.0 1.0").unwrap();
        let err = AttitudeSeries::load(file.path(), &TimeWindow::new(0.0, 20.0)).unwrap_err();
        assert!(matches!(err, ConditionError::CorruptTelemetry(_)));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = AttitudeSeries::load("/no/such/telemetry.att", &TimeWindow::new(0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, ConditionError::Io(_)));
    }

    #[test]
    fn position_load_accepts_velocity_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1.0 7000.0 0.0 0.0 0.0 7.5 0.0").unwrap();
        writeln!(file, "2.0 7000.0 7.5 0.0 0.0 7.5 0.0").unwrap();
        let series = PositionSeries::load(file.path(), &TimeWindow::new(0.0, 10.0)).unwrap();
        assert!(series.has_velocity());
        assert_eq!(series.samples()[0].vel, Some([0.0, 7.5, 0.0]));
    }

    #[test]
    fn position_load_rejects_mixed_velocity_layout() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1.0 7000.0 0.0 0.0 0.0 7.5 0.0").unwrap();
        writeln!(file, "2.0 7000.0 7.5 0.0").unwrap();
        let err = PositionSeries::load(file.path(), &TimeWindow::new(0.0, 10.0)).unwrap_err();
        assert!(matches!(err, ConditionError::CorruptTelemetry(_)));
    }
}
