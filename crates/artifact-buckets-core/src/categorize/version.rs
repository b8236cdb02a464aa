//! Product / Version Parsing
//!
//! Runs last in the pipeline, on whatever the feature stages left behind.
//! Tries, in order: a well-known version at the very end, `name-M.N.P...` at the
//! start, `name-<githash|rNNNNNN>` at the start, and finally an unversioned split.

use once_cell::sync::Lazy;
use regex::Regex;

/// Well-known version shapes. The leading separator belongs to the first alternative only.
static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[-_.]v?(\d+\.\d+\.\d+-((alpha)|(beta)|(gamma))[.-]?\d+)", // 1.2.3-alpha-1
        r"|(\d+\.\d+\.\d+-pre\.\d{8}\.[.\d]+)",                     // 5.0.0-pre.20210516.1
        r"|(\d+\.\d+\.\d+(-?rc\.?\d+)?)",                          // 1.2.3-rc1
        r"|(\d+\.\d+\.\d+[abcdefg]?)",                             // 1.2.3a
        r"|(\d+\.\d+[abcdefg])",                                   // 1.0a
        r"|(\d+\.\d+(-?rc\d+)?)",                                  // 1.2-rc1
    ))
    .expect("VERSION_RE must compile")
});

/// `bazel-gazelle-v0.22.2...`
static PRODUCT_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+[-\w]*)[-_.]v?(\d+\.\d+\.\d+[a-z\d]*)[^.\D]?")
        .expect("PRODUCT_VERSION_RE must compile")
});

/// `bazel-toolchains-0dc4917`, `bazel-toolchains-r123456`
static PRODUCT_GITHASH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+[-\w]*)[-_.](([0-9a-f]{7})|(r\d{6}))")
        .expect("PRODUCT_GITHASH_RE must compile")
});

/// Loose probe for "does this file name carry a version at all"
static COMMON_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-_.]v?(\d+\.\d+\.\d+[a-z\d]*(-rc\d+)?)|(\d+\.\d+[a-z\d]*(-rc\d+)?)")
        .expect("COMMON_VERSION_RE must compile")
});

/// Version reported for unversioned builds such as `bazelisk-os-arch`
pub const HEAD_VERSION: &str = "head";

const VERSION_SEPARATORS: &[char] = &['-', '.', '_'];

/// Result of the product/version stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVersion {
    pub product: String,
    pub version: Option<String>,
    /// Text not explained by this stage
    pub rest: String,
}

/// Split the final remainder into product and version.
///
/// `default_version` is only used when no version and no separator can be found.
pub fn split_product_version(remainder: &str, default_version: Option<&str>) -> ProductVersion {
    let mut parsed = trailing_version(remainder)
        .or_else(|| leading_product_version(remainder))
        .or_else(|| leading_product_githash(remainder))
        .unwrap_or_else(|| unversioned(remainder, default_version));

    let trimmed = parsed.product.trim_end_matches(&['-', '.'][..]).len();
    parsed.product.truncate(trimmed);
    parsed
}

/// Whether `file_name` contains the common `M.N[.P]` version shape anywhere
pub fn has_common_version(file_name: &str) -> bool {
    COMMON_VERSION_RE.is_match(file_name)
}

fn trailing_version(remainder: &str) -> Option<ProductVersion> {
    let m = VERSION_RE.find(remainder)?;
    if m.end() != remainder.len() {
        return None;
    }

    let product = remainder[..m.start()].trim_end_matches(VERSION_SEPARATORS);
    let product = product.strip_suffix("-v").unwrap_or(product);
    let version = m.as_str().trim_start_matches(VERSION_SEPARATORS);

    Some(ProductVersion {
        product: product.to_string(),
        version: Some(version.to_string()),
        rest: String::new(),
    })
}

fn leading_product_version(remainder: &str) -> Option<ProductVersion> {
    leading_match(&PRODUCT_VERSION_RE, remainder)
}

fn leading_product_githash(remainder: &str) -> Option<ProductVersion> {
    leading_match(&PRODUCT_GITHASH_RE, remainder)
}

/// Group 1 is the product, group 2 the version; anything after group 2 is left over
fn leading_match(re: &Regex, remainder: &str) -> Option<ProductVersion> {
    let caps = re.captures(remainder)?;
    let name = caps.get(1)?;
    let version = caps.get(2)?;

    Some(ProductVersion {
        product: remainder[..name.end()].to_string(),
        version: Some(version.as_str().to_string()),
        rest: remainder[version.end()..].to_string(),
    })
}

fn unversioned(remainder: &str, default_version: Option<&str>) -> ProductVersion {
    match remainder.find('-') {
        Some(sep) if sep > 0 => ProductVersion {
            product: remainder[..sep].to_string(),
            version: Some(HEAD_VERSION.to_string()),
            rest: remainder[sep..].to_string(),
        },
        _ => ProductVersion {
            product: remainder.to_string(),
            version: default_version.map(str::to_string),
            rest: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(remainder: &str) -> (String, Option<String>, String) {
        let pv = split_product_version(remainder, None);
        (pv.product, pv.version, pv.rest)
    }

    #[test]
    fn test_trailing_semver() {
        assert_eq!(
            split("bazel-5.0.0"),
            ("bazel".into(), Some("5.0.0".into()), String::new())
        );
    }

    #[test]
    fn test_trailing_prerelease() {
        let (product, version, _) = split("bazel-5.0.0-pre.20210516.1");
        assert_eq!(product, "bazel");
        assert_eq!(version.as_deref(), Some("5.0.0-pre.20210516.1"));
    }

    #[test]
    fn test_trailing_rc_and_letter_suffix() {
        assert_eq!(split("bazel-4.0.0rc10").1.as_deref(), Some("4.0.0rc10"));
        assert_eq!(split("bazel-1.0.0-rc3").1.as_deref(), Some("1.0.0-rc3"));
        assert_eq!(split("tool-1.2.3a").1.as_deref(), Some("1.2.3a"));
        assert_eq!(split("tool-1.0a").1.as_deref(), Some("1.0a"));
        assert_eq!(split("starlark-go-0.1").1.as_deref(), Some("0.1"));
    }

    #[test]
    fn test_trailing_alpha_keeps_separator_out() {
        let (product, version, _) = split("tool-2.0.0-alpha.3");
        assert_eq!(product, "tool");
        assert_eq!(version.as_deref(), Some("2.0.0-alpha.3"));
    }

    #[test]
    fn test_dangling_v_marker_trimmed() {
        let (product, version, _) = split("rules_go-v0.24.6");
        assert_eq!(product, "rules_go");
        assert_eq!(version.as_deref(), Some("0.24.6"));
    }

    #[test]
    fn test_leading_product_version_leaves_rest() {
        let (product, version, rest) = split("bazel-0.29.1-symbols");
        assert_eq!(product, "bazel");
        assert_eq!(version.as_deref(), Some("0.29.1"));
        assert_eq!(rest, "-symbols");
    }

    #[test]
    fn test_githash_and_revision() {
        assert_eq!(
            split("bazel-toolchains-0dc4917"),
            ("bazel-toolchains".into(), Some("0dc4917".into()), String::new())
        );
        assert_eq!(split("bazel-toolchains-r123456").1.as_deref(), Some("r123456"));
    }

    #[test]
    fn test_unversioned_with_separator_is_head() {
        let (product, version, rest) = split("bazel-debug");
        assert_eq!(product, "bazel");
        assert_eq!(version.as_deref(), Some(HEAD_VERSION));
        assert_eq!(rest, "-debug");
    }

    #[test]
    fn test_unversioned_without_separator_uses_default() {
        let pv = split_product_version("bazelisk", Some("v1.7.5"));
        assert_eq!(pv.product, "bazelisk");
        assert_eq!(pv.version.as_deref(), Some("v1.7.5"));

        let pv = split_product_version("buildifier", None);
        assert_eq!(pv.version, None);
    }

    #[test]
    fn test_leading_separator_uses_default() {
        let pv = split_product_version("-linux", None);
        assert_eq!(pv.product, "-linux");
        assert_eq!(pv.version, None);
        assert!(pv.rest.is_empty());
    }

    #[test]
    fn test_trailing_dot_and_dash_stripped_from_product() {
        let pv = split_product_version("bazel.", Some("1.0"));
        assert_eq!(pv.product, "bazel");
    }

    #[test]
    fn test_has_common_version() {
        assert!(has_common_version("bazel-5.0.0-linux-x86_64"));
        assert!(has_common_version("starlark-go-0.1-linux-amd64"));
        assert!(!has_common_version("bazelisk-darwin-amd64"));
        assert!(!has_common_version("bazel-toolchains-0dc4917.tar.gz"));
    }
}
