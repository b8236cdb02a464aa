//! Bucket
//!
//! The structured classification of a single artifact file name.

use serde::Serialize;

/// Whether an artifact is a self-extracting installer or a standalone binary/archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerKind {
    Installer,
    #[default]
    Standalone,
}

impl InstallerKind {
    /// Get the literal written to enriched logs and sample files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Installer => "installer",
            Self::Standalone => "standalone",
        }
    }
}

impl std::fmt::Display for InstallerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the columns produced by [`Bucket::sample_columns`]
pub const SAMPLE_COLUMNS: [&str; 8] = [
    "product",
    "version",
    "arch",
    "os",
    "packaging",
    "installer",
    "is_bin",
    "attributes",
];

/// Categorization result for one file name.
///
/// Built fresh by [`crate::categorize::categorize`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub product: String,
    pub version: Option<String>,
    pub arch: Option<String>,
    pub os: Option<String>,
    /// Extension without the leading dot (e.g. `tar.gz`)
    pub packaging: Option<String>,
    pub installer: InstallerKind,
    /// False for `.sig` / `.sha256` companions
    pub is_bin: bool,
    /// `|`-joined auxiliary tags such as `msvc`, `sig`, `jdk11`
    pub attributes: String,
    /// Empty, or ` - LEAVES(<text>)` when something could not be explained
    pub leftover: String,
}

impl Bucket {
    /// Individual attribute tags
    pub fn attribute_list(&self) -> Vec<&str> {
        self.attributes
            .split('|')
            .filter(|a| !a.is_empty())
            .collect()
    }

    pub fn has_attribute(&self, tag: &str) -> bool {
        self.attribute_list().contains(&tag)
    }

    pub fn has_leftover(&self) -> bool {
        !self.leftover.is_empty()
    }

    /// `{attributes}leftover`, the last column of a sample line
    pub fn attributes_and_leftover(&self) -> String {
        format!("{{{}}}{}", self.attributes, self.leftover)
    }

    /// Sample fixture columns after the file name, in [`SAMPLE_COLUMNS`] order.
    ///
    /// Absent version/arch/os are written as `None`, absent packaging as an empty column.
    pub fn sample_columns(&self) -> [String; 8] {
        [
            self.product.clone(),
            or_none(&self.version).to_string(),
            or_none(&self.arch).to_string(),
            or_none(&self.os).to_string(),
            self.packaging.clone().unwrap_or_default(),
            self.installer.to_string(),
            bool_literal(self.is_bin).to_string(),
            self.attributes_and_leftover(),
        ]
    }

    /// Render as a sample fixture line for `file_name`
    pub fn sample_line(&self, file_name: &str) -> String {
        format!("{}|{}", file_name, self.sample_columns().join("|"))
    }
}

/// Optional column text, `None` when absent
pub fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

/// `True` / `False`, as consumed by the downstream aggregation scripts
pub fn bool_literal(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bucket() -> Bucket {
        Bucket {
            product: "bazel".to_string(),
            version: Some("0.10.0".to_string()),
            arch: None,
            os: Some("any".to_string()),
            packaging: Some("zip".to_string()),
            installer: InstallerKind::Standalone,
            is_bin: false,
            attributes: "msvc|sig".to_string(),
            leftover: String::new(),
        }
    }

    #[test]
    fn test_sample_line_format() {
        let bucket = sample_bucket();
        assert_eq!(
            bucket.sample_line("bazel-0.10.0-dist.zip.sig"),
            "bazel-0.10.0-dist.zip.sig|bazel|0.10.0|None|any|zip|standalone|False|{msvc|sig}"
        );
    }

    #[test]
    fn test_sample_line_empty_packaging() {
        let mut bucket = sample_bucket();
        bucket.packaging = None;
        bucket.attributes.clear();
        bucket.leftover = " - LEAVES(debug)".to_string();
        assert!(bucket.sample_line("x").ends_with("|None|any||standalone|False|{} - LEAVES(debug)"));
    }

    #[test]
    fn test_attribute_list_skips_empty() {
        let mut bucket = sample_bucket();
        assert_eq!(bucket.attribute_list(), vec!["msvc", "sig"]);
        assert!(bucket.has_attribute("sig"));
        assert!(!bucket.has_attribute("jdk"));

        bucket.attributes.clear();
        assert!(bucket.attribute_list().is_empty());
    }

    #[test]
    fn test_installer_kind_literals() {
        assert_eq!(InstallerKind::Installer.to_string(), "installer");
        assert_eq!(InstallerKind::Standalone.to_string(), "standalone");
        assert_eq!(InstallerKind::default(), InstallerKind::Standalone);
    }

    #[test]
    fn test_bucket_serializes_installer_lowercase() {
        let json = serde_json::to_value(sample_bucket()).unwrap();
        assert_eq!(json["installer"], "standalone");
        assert_eq!(json["arch"], serde_json::Value::Null);
    }
}
