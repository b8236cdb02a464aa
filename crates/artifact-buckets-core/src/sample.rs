//! Sample fixtures for regression testing the categorizer.
//!
//! Each line pairs a file name with its expected buckets:
//!
//! ```text
//! file|product|version|arch|os|packaging|installer|is_bin|{attributes}leftover
//! bazel-0.10.0-dist.zip|bazel|0.10.0|None|any|zip|standalone|True|{}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::io::BufRead;

use serde::Serialize;

use crate::bucket::{Bucket, SAMPLE_COLUMNS};
use crate::categorize::{categorize, has_common_version};
use crate::error::{BucketsError, Result};

/// Number of fields in a sample line
pub const SAMPLE_FIELD_COUNT: usize = 9;

/// One expected categorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub file: String,
    /// Expected columns in [`SAMPLE_COLUMNS`] order
    pub expected: [String; 8],
}

/// A column whose actual value differs from the expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub column: &'static str,
    pub expected: String,
    pub actual: String,
}

impl Sample {
    pub fn parse(line: &str) -> Result<Self> {
        // The last column may itself contain `|` between attributes
        let fields: Vec<&str> = line.trim().splitn(SAMPLE_FIELD_COUNT, '|').collect();
        if fields.len() != SAMPLE_FIELD_COUNT {
            return Err(BucketsError::MalformedSample {
                line: line.trim().to_string(),
            });
        }

        let expected = std::array::from_fn(|i| fields[i + 1].to_string());
        Ok(Self {
            file: fields[0].to_string(),
            expected,
        })
    }

    /// Expected version, `None` when the fixture says so
    pub fn expected_version(&self) -> Option<&str> {
        Some(self.expected[1].as_str()).filter(|v| *v != "None")
    }

    /// Default version handed to the categorizer.
    ///
    /// Only names without any common version shape get the expected version
    /// as their default; everything else must find its version on its own.
    pub fn default_version(&self) -> Option<&str> {
        if has_common_version(&self.file) {
            None
        } else {
            self.expected_version()
        }
    }

    pub fn categorize(&self) -> Bucket {
        categorize(&self.file, self.default_version())
    }

    /// Columns that differ from the expectation; empty when the sample passes
    pub fn check(&self) -> Vec<Mismatch> {
        let actual = self.categorize().sample_columns();
        SAMPLE_COLUMNS
            .into_iter()
            .zip(self.expected.iter().zip(actual))
            .filter(|(_, (expected, actual))| *expected != actual)
            .map(|(column, (expected, actual))| Mismatch {
                column,
                expected: expected.clone(),
                actual,
            })
            .collect()
    }
}

/// A sample that did not categorize as expected
#[derive(Debug, Clone, Serialize)]
pub struct SampleFailure {
    pub file: String,
    pub line_no: usize,
    pub mismatches: Vec<Mismatch>,
}

/// Outcome of checking a whole sample file
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub checked: usize,
    /// Unparseable lines, with their line numbers
    pub bad_lines: Vec<(usize, String)>,
    pub failures: Vec<SampleFailure>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn failures into an error for callers that only care about pass/fail
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            Ok(self)
        } else {
            Err(BucketsError::SampleMismatch {
                count: self.failures.len(),
            })
        }
    }
}

/// Check every sample in `reader`. Malformed lines are reported and skipped.
pub fn verify_samples<R: BufRead>(reader: R) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let sample = match Sample::parse(trimmed) {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!("line {}: {}", line_no, e);
                report.bad_lines.push((line_no, trimmed.to_string()));
                continue;
            }
        };

        report.checked += 1;
        let mismatches = sample.check();
        if !mismatches.is_empty() {
            tracing::debug!(file = %sample.file, count = mismatches.len(), "sample mismatch");
            report.failures.push(SampleFailure {
                file: sample.file,
                line_no,
                mismatches,
            });
        }
    }

    Ok(report)
}
