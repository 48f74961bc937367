//! Joint trajectories and their CSV forms.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::TrajectoryError;

// ---------------------------------------------------------------------------
// JointStateSample / Trajectory
// ---------------------------------------------------------------------------

/// Joint values at one instant. Values are in input units.
#[derive(Debug, Clone, PartialEq)]
pub struct JointStateSample {
    /// Seconds from the start of the trajectory.
    pub time: f32,
    pub values: Vec<(String, f32)>,
}

impl JointStateSample {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, joint: impl Into<String>, value: f32) -> Self {
        self.values.push((joint.into(), value));
        self
    }

    pub fn value(&self, joint: &str) -> Option<f32> {
        self.values
            .iter()
            .find(|(name, _)| name == joint)
            .map(|(_, v)| *v)
    }
}

/// Time-ascending sequence of samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<JointStateSample>,
}

impl Trajectory {
    /// Build a trajectory, rejecting samples whose times do not strictly
    /// increase.
    pub fn new(samples: Vec<JointStateSample>) -> Result<Self, TrajectoryError> {
        for (i, pair) in samples.windows(2).enumerate() {
            if pair[1].time.partial_cmp(&pair[0].time) != Some(std::cmp::Ordering::Greater) {
                return Err(TrajectoryError::NotMonotonic {
                    row: i + 1,
                    time: pair[1].time,
                    previous: pair[0].time,
                });
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[JointStateSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time of the last sample, or zero when empty.
    pub fn duration(&self) -> f32 {
        self.samples.last().map_or(0.0, |s| s.time)
    }

    /// Every joint named by any sample, in first-seen order.
    pub fn joint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for sample in &self.samples {
            for (name, _) in &sample.values {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn from_csv_path(
        path: &Path,
        layout: &CsvLayout,
        time_column: &str,
    ) -> Result<Self, TrajectoryError> {
        let file = File::open(path).map_err(|source| TrajectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file, layout, time_column)
    }

    /// Read a trajectory from CSV text in the given layout.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        layout: &CsvLayout,
        time_column: &str,
    ) -> Result<Self, TrajectoryError> {
        let samples = match layout {
            CsvLayout::Wide { joint_names: None } => read_wide_with_header(reader, time_column)?,
            CsvLayout::Wide {
                joint_names: Some(names),
            } => read_wide_headerless(reader, names)?,
            CsvLayout::Long => read_long(reader)?,
        };
        if samples.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        Self::new(samples)
    }
}

// ---------------------------------------------------------------------------
// CSV layouts
// ---------------------------------------------------------------------------

/// Shape of a trajectory CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvLayout {
    /// One row per sample: a time column followed by one column per joint.
    ///
    /// With `joint_names: None` the first row is a header naming the time
    /// column and the joints. With explicit names the file has no header
    /// and the first field of each row is the time.
    Wide { joint_names: Option<Vec<String>> },
    /// One row per joint value: `time, joint, value`. Consecutive rows with
    /// the same time form one sample. A leading header row is skipped.
    Long,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self::Wide { joint_names: None }
    }
}

fn row_of(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .and_then(|p| usize::try_from(p.line()).ok())
        .unwrap_or(fallback)
}

fn parse_field(
    record: &StringRecord,
    row: usize,
    idx: usize,
    column: &str,
) -> Result<f32, TrajectoryError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f32>().map_err(|_| TrajectoryError::InvalidValue {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Joint values of a wide row. Empty cells leave the joint out of the sample.
fn wide_sample(
    record: &StringRecord,
    row: usize,
    time_idx: usize,
    columns: &[(usize, &str)],
) -> Result<JointStateSample, TrajectoryError> {
    let mut sample = JointStateSample::new(parse_field(record, row, time_idx, "time")?);
    for &(idx, name) in columns {
        if record.get(idx).is_none_or(str::is_empty) {
            continue;
        }
        sample.values.push((name.to_string(), parse_field(record, row, idx, name)?));
    }
    Ok(sample)
}

fn read_wide_with_header<R: Read>(
    reader: R,
    time_column: &str,
) -> Result<Vec<JointStateSample>, TrajectoryError> {
    let mut csv = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    let time_idx = headers
        .iter()
        .position(|h| h == time_column)
        .ok_or_else(|| TrajectoryError::MissingTimeColumn(time_column.to_string()))?;
    let columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != time_idx)
        .collect();

    let mut samples = Vec::new();
    for (i, record) in csv.records().enumerate() {
        let record = record?;
        let row = row_of(&record, i + 2);
        samples.push(wide_sample(&record, row, time_idx, &columns)?);
    }
    Ok(samples)
}

fn read_wide_headerless<R: Read>(
    reader: R,
    joint_names: &[String],
) -> Result<Vec<JointStateSample>, TrajectoryError> {
    if joint_names.is_empty() {
        return Err(TrajectoryError::MissingJointNames);
    }
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(reader);
    let columns: Vec<(usize, &str)> = joint_names
        .iter()
        .enumerate()
        .map(|(i, name)| (i + 1, name.as_str()))
        .collect();

    let mut samples = Vec::new();
    for (i, record) in csv.records().enumerate() {
        let record = record?;
        let row = row_of(&record, i + 1);
        if record.len() != joint_names.len() + 1 {
            return Err(TrajectoryError::FieldCount {
                row,
                expected: joint_names.len() + 1,
                found: record.len(),
            });
        }
        samples.push(wide_sample(&record, row, 0, &columns)?);
    }
    Ok(samples)
}

fn read_long<R: Read>(reader: R) -> Result<Vec<JointStateSample>, TrajectoryError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut samples: Vec<JointStateSample> = Vec::new();
    for (i, record) in csv.records().enumerate() {
        let record = record?;
        let row = row_of(&record, i + 1);
        if record.len() != 3 {
            return Err(TrajectoryError::FieldCount {
                row,
                expected: 3,
                found: record.len(),
            });
        }
        let time = match parse_field(&record, row, 0, "time") {
            Ok(t) => t,
            Err(_) if i == 0 => continue,
            Err(e) => return Err(e),
        };
        let joint = record.get(1).unwrap_or_default();
        let value = parse_field(&record, row, 2, joint)?;

        match samples.last_mut() {
            Some(last) if last.time.to_bits() == time.to_bits() => {
                last.values.push((joint.to_string(), value));
            }
            Some(last) if time < last.time || time.is_nan() => {
                return Err(TrajectoryError::NotMonotonic {
                    row,
                    time,
                    previous: last.time,
                });
            }
            _ => samples.push(JointStateSample::new(time).with(joint, value)),
        }
    }
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
