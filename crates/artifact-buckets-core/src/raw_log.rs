//! Raw download log mapping.
//!
//! Reads pipe-delimited download records, categorizes each file name and
//! re-emits the record enriched with its buckets, ready to sort and reduce.
//!
//! Input:  `ymd|hm|repo|file_name|release_tag|bin_count|sha_count|sig_count`
//! Output: `ymd|hm|file_name|bin_count|sha_count|sig_count|product|version|arch|os|packaging|installer|is_bin`

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::bucket::{bool_literal, or_none, Bucket};
use crate::categorize::categorize;
use crate::config::MapConfig;
use crate::error::{BucketsError, Result};

/// Number of fields in a raw log line
pub const RAW_FIELD_COUNT: usize = 8;

// ============================================================================
// Records
// ============================================================================

/// One raw download record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub ymd: String,
    pub hm: String,
    pub repo: String,
    pub file_name: String,
    pub release_tag: String,
    pub bin_count: String,
    pub sha_count: String,
    pub sig_count: String,
}

impl LogRecord {
    /// Parse a raw line. `line_no` is only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.trim().split('|').collect();
        let &[ymd, hm, repo, file_name, release_tag, bin_count, sha_count, sig_count] =
            fields.as_slice()
        else {
            return Err(BucketsError::MalformedLine {
                line_no,
                expected: RAW_FIELD_COUNT,
                found: fields.len(),
            });
        };

        Ok(Self {
            ymd: ymd.to_string(),
            hm: hm.to_string(),
            repo: repo.to_string(),
            file_name: file_name.to_string(),
            release_tag: release_tag.to_string(),
            bin_count: bin_count.to_string(),
            sha_count: sha_count.to_string(),
            sig_count: sig_count.to_string(),
        })
    }

    /// Release tag, if the record has one
    pub fn release_tag(&self) -> Option<&str> {
        Some(self.release_tag.as_str()).filter(|t| !t.is_empty())
    }
}

/// A raw record joined with its buckets; `Display` renders the output line
#[derive(Debug, Clone, Copy)]
pub struct EnrichedRecord<'a> {
    pub record: &'a LogRecord,
    pub bucket: &'a Bucket,
}

impl fmt::Display for EnrichedRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.record;
        let b = self.bucket;
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            r.ymd,
            r.hm,
            r.file_name,
            r.bin_count,
            r.sha_count,
            r.sig_count,
            b.product,
            or_none(&b.version),
            or_none(&b.arch),
            or_none(&b.os),
            or_none(&b.packaging),
            b.installer,
            bool_literal(b.is_bin),
        )
    }
}

// ============================================================================
// Mapper
// ============================================================================

/// Counters for one mapping run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapStats {
    pub files: usize,
    pub lines: usize,
    pub emitted: usize,
    /// Emitted, but with leftover text
    pub warnings: usize,
    pub malformed: usize,
    pub uncategorizable: usize,
}

impl MapStats {
    pub fn skipped(&self) -> usize {
        self.malformed + self.uncategorizable
    }
}

/// Maps raw download logs to enriched lines
#[derive(Debug, Clone, Default)]
pub struct RawLogMapper {
    config: MapConfig,
}

impl RawLogMapper {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// Parse and categorize a single line
    pub fn map_line(&self, line: &str, line_no: usize) -> Result<(LogRecord, Bucket)> {
        let record = LogRecord::parse(line, line_no)?;
        let default_version = if self.config.use_release_tag {
            record.release_tag()
        } else {
            None
        };

        let bucket = categorize(&record.file_name, default_version);
        if bucket.product.is_empty() {
            return Err(BucketsError::Uncategorizable {
                file_name: record.file_name,
            });
        }
        Ok((record, bucket))
    }

    /// Map every line of `reader` into `writer`, updating `stats`.
    ///
    /// Unmappable lines are logged and skipped unless the mapper is strict.
    pub fn map_reader<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        writer: &mut W,
        source: &str,
        stats: &mut MapStats,
    ) -> Result<()> {
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(_) => {
                    let e = BucketsError::InvalidEncoding { line_no };
                    stats.lines += 1;
                    stats.malformed += 1;
                    tracing::error!(
                        "{}:{}: {} ({})",
                        source,
                        line_no,
                        e,
                        String::from_utf8_lossy(&buf).trim()
                    );
                    if self.config.strict {
                        return Err(e);
                    }
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            stats.lines += 1;

            let (record, bucket) = match self.map_line(line, line_no) {
                Ok(mapped) => mapped,
                Err(e @ BucketsError::MalformedLine { .. }) => {
                    stats.malformed += 1;
                    tracing::error!("{}:{}: {} ({})", source, line_no, e, line.trim());
                    if self.config.strict {
                        return Err(e);
                    }
                    continue;
                }
                Err(e @ BucketsError::Uncategorizable { .. }) => {
                    stats.uncategorizable += 1;
                    tracing::error!("{}:{}: {} ({})", source, line_no, e, line.trim());
                    if self.config.strict {
                        return Err(e);
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            writeln!(writer, "{}", EnrichedRecord { record: &record, bucket: &bucket })?;
            stats.emitted += 1;

            if bucket.has_leftover() {
                stats.warnings += 1;
                tracing::warn!(
                    "Could not fully categorize {} got{}",
                    line.trim(),
                    bucket.leftover
                );
            }
        }
        Ok(())
    }

    /// Map every file under `paths` (directories are walked recursively)
    pub fn map_paths<W: Write>(&self, paths: &[PathBuf], writer: &mut W) -> Result<MapStats> {
        let mut stats = MapStats::default();
        for file in collect_inputs(paths)? {
            tracing::info!("Loading: {}", file.display());
            let reader = BufReader::new(File::open(&file)?);
            self.map_reader(reader, writer, &file.display().to_string(), &mut stats)?;
            stats.files += 1;
        }
        writer.flush()?;
        Ok(stats)
    }
}

/// Expand input paths: files as given, directories to their files in sorted order
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(BucketsError::InputNotFound { path: path.clone() });
        }
        if path.is_dir() {
            files.extend(walk_files(path)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
