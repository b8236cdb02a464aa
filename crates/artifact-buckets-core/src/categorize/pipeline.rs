//! Categorizer Pipeline
//!
//! ファイル名を先頭から順に削っていき、各ステージで1つの属性を取り出す。
//! ステージの順序には依存関係がある：
//!
//! - arch → os（`pc-windows-gnu` の `pc` を先に取る）
//! - signature → packaging（`.sha256` を `.sh` と誤認しない）
//! - installer → jdk
//! - product/version は最後（残り全部が対象）

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bucket::{Bucket, InstallerKind};

use super::feature::extract_feature;
use super::tables::{
    normalize_arch, normalize_os, package_extensions, PackageFamily, ANY_OS, ARCH_FEATURES,
    INSTALLER_FEATURES, NOJDK_FEATURES, OS_FEATURES, SIGNATURE_SUFFIXES, SOURCE_ARCH,
    TARBALL_PACKAGING, UNKNOWN_FEATURES,
};
use super::version::split_product_version;

static JDK_SPEC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z]?(jdk\d*)").expect("JDK_SPEC_RE must compile"));

const MSVC_TAG: &str = "-msvc";
const NOJDK_TAG: &str = "nojdk";
const LEFTOVER_PREFIX_CHARS: &[char] = &['-', ' ', '_', '.'];

/// Break a release artifact file name down into buckets.
///
/// `default_version` is reported when the name carries no version and no
/// separator at all. Never fails: anything that could not be explained ends
/// up in [`Bucket::leftover`].
pub fn categorize(file_name: &str, default_version: Option<&str>) -> Bucket {
    let mut attributes = Vec::new();

    let todo = strip_msvc(file_name.to_string(), &mut attributes);
    let (_, todo) = extract_feature(&todo, UNKNOWN_FEATURES);

    let (arch, todo) = extract_feature(&todo, ARCH_FEATURES);
    let mut arch = arch.map(normalize_arch);

    let (os, todo) = extract_feature(&todo, OS_FEATURES);
    let mut os = os.map(normalize_os);

    let (is_bin, todo) = strip_signature(todo, &mut attributes);

    let (packaging, todo) = extract_packaging(&todo);
    if let Some(packaging) = packaging.as_deref() {
        if TARBALL_PACKAGING.contains(&packaging) {
            arch.get_or_insert_with(|| SOURCE_ARCH.to_string());
            os.get_or_insert_with(|| ANY_OS.to_string());
        }
        if os.is_none() {
            os = PackageFamily::of_packaging(packaging).map(|f| f.os().to_string());
        }
    }

    let (installer, todo) = extract_feature(&todo, INSTALLER_FEATURES);
    let installer = if installer.is_some() {
        InstallerKind::Installer
    } else {
        InstallerKind::Standalone
    };

    let (jdk, todo) = extract_jdk(todo);
    attributes.extend(jdk);

    let parsed = split_product_version(&todo, default_version);
    let leftover = format_leftover(&parsed.rest);

    tracing::debug!(
        file_name,
        product = %parsed.product,
        version = ?parsed.version,
        leftover = %leftover,
        "categorized"
    );

    Bucket {
        product: parsed.product,
        version: parsed.version,
        arch,
        os,
        packaging,
        installer,
        is_bin,
        attributes: attributes.join("|"),
        leftover,
    }
}

/// `-msvc` was an odd tag on early Windows builds; drop every occurrence
fn strip_msvc(todo: String, attributes: &mut Vec<String>) -> String {
    match todo.find(MSVC_TAG) {
        Some(pos) if pos > 0 => {
            attributes.push("msvc".to_string());
            todo.replace(MSVC_TAG, "")
        }
        _ => todo,
    }
}

/// Returns `is_bin` and the remainder without the signature suffix
fn strip_signature(todo: String, attributes: &mut Vec<String>) -> (bool, String) {
    for suffix in SIGNATURE_SUFFIXES {
        if let Some(stripped) = todo.strip_suffix(*suffix) {
            attributes.push("sig".to_string());
            return (false, stripped.to_string());
        }
    }
    (true, todo)
}

fn extract_packaging(todo: &str) -> (Option<String>, String) {
    let (packaging, todo) = extract_feature(todo, &package_extensions());
    let packaging = packaging.map(|p| match p.strip_prefix('.') {
        Some(bare) => bare.to_string(),
        None => p,
    });
    (packaging, todo)
}

/// `nojdk` / `without-jdk`, else the first `jdk<digits>` (surrounding separators kept)
fn extract_jdk(todo: String) -> (Option<String>, String) {
    let (nojdk, todo) = extract_feature(&todo, NOJDK_FEATURES);
    if nojdk.is_some() {
        return (Some(NOJDK_TAG.to_string()), todo);
    }

    let span = JDK_SPEC_RE
        .captures(&todo)
        .and_then(|caps| caps.get(1))
        .map(|m| m.range());
    let Some(span) = span else {
        return (None, todo);
    };
    let tag = todo[span.clone()].to_string();
    let rest = format!("{}{}", &todo[..span.start], &todo[span.end..]);
    (Some(tag), rest)
}

fn format_leftover(rest: &str) -> String {
    let left = rest.trim_start_matches(LEFTOVER_PREFIX_CHARS);
    if left.is_empty() {
        String::new()
    } else {
        format!(" - LEAVES({})", left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(file_name: &str) -> Bucket {
        categorize(file_name, None)
    }

    #[test]
    fn test_linux_binary() {
        let b = cat("bazel-5.0.0-linux-x86_64");
        assert_eq!(b.product, "bazel");
        assert_eq!(b.version.as_deref(), Some("5.0.0"));
        assert_eq!(b.arch.as_deref(), Some("x86_64"));
        assert_eq!(b.os.as_deref(), Some("linux"));
        assert_eq!(b.packaging, None);
        assert_eq!(b.installer, InstallerKind::Standalone);
        assert!(b.is_bin);
        assert_eq!(b.attributes, "");
        assert_eq!(b.leftover, "");
    }

    #[test]
    fn test_dist_zip() {
        let b = cat("bazel-0.10.0-dist.zip");
        assert_eq!(b.product, "bazel");
        assert_eq!(b.version.as_deref(), Some("0.10.0"));
        assert_eq!(b.os.as_deref(), Some("any"));
        assert_eq!(b.arch, None);
        assert_eq!(b.packaging.as_deref(), Some("zip"));
    }

    #[test]
    fn test_unversioned_bazelisk() {
        let b = categorize("bazelisk-darwin-amd64", Some("v1.11.0"));
        assert_eq!(b.product, "bazelisk");
        assert_eq!(b.version.as_deref(), Some("v1.11.0"));
        assert_eq!(b.os.as_deref(), Some("macos"));
        assert_eq!(b.arch.as_deref(), Some("x86_64"));
    }

    #[test]
    fn test_githash_tarball() {
        let b = cat("bazel-toolchains-0dc4917.tar.gz");
        assert_eq!(b.product, "bazel-toolchains");
        assert_eq!(b.version.as_deref(), Some("0dc4917"));
        assert_eq!(b.packaging.as_deref(), Some("tar.gz"));
        assert_eq!(b.arch.as_deref(), Some("src"));
        assert_eq!(b.os.as_deref(), Some("any"));
    }

    #[test]
    fn test_prerelease_installer() {
        let b = cat("bazel-5.0.0-pre.20210516.1-installer-windows-x86_64.exe");
        assert_eq!(b.product, "bazel");
        assert_eq!(b.version.as_deref(), Some("5.0.0-pre.20210516.1"));
        assert_eq!(b.installer, InstallerKind::Installer);
        assert_eq!(b.os.as_deref(), Some("windows"));
        assert_eq!(b.arch.as_deref(), Some("x86_64"));
        assert_eq!(b.packaging.as_deref(), Some("exe"));
    }

    #[test]
    fn test_sha256_is_not_read_as_sh() {
        let b = cat("bazel-5.0.0-linux-x86_64.sha256");
        assert_eq!(b.packaging, None);
        assert!(b.has_attribute("sig"));
        assert!(!b.is_bin);
        assert_eq!(b.version.as_deref(), Some("5.0.0"));
    }

    #[test]
    fn test_sig_companion_keeps_packaging() {
        let b = cat("bazel-0.10.0-dist.zip.sig");
        assert_eq!(b.packaging.as_deref(), Some("zip"));
        assert_eq!(b.attributes, "sig");
        assert!(!b.is_bin);
    }

    #[test]
    fn test_msvc_tag() {
        let b = cat("bazel-0.20.0-windows-x86_64-msvc.exe");
        assert_eq!(b.attributes, "msvc");
        assert_eq!(b.version.as_deref(), Some("0.20.0"));
        assert_eq!(b.leftover, "");
    }

    #[test]
    fn test_msvc_at_start_is_not_a_tag() {
        let b = cat("-msvc");
        assert_eq!(b.attributes, "");
    }

    #[test]
    fn test_jdk_version_attribute() {
        let b = cat("bazel-0.5.4-jdk7-installer-linux-x86_64.sh");
        assert_eq!(b.attributes, "jdk7");
        assert_eq!(b.installer, InstallerKind::Installer);
        assert_eq!(b.packaging.as_deref(), Some("sh"));
        assert_eq!(b.version.as_deref(), Some("0.5.4"));
        assert_eq!(b.leftover, "");
    }

    #[test]
    fn test_nojdk_attribute() {
        let b = cat("bazel-0.5.4-without-jdk-installer-linux-x86_64.sh");
        assert_eq!(b.attributes, "nojdk");
        assert_eq!(b.version.as_deref(), Some("0.5.4"));

        let b = cat("bazel_nojdk-5.0.0-linux-x86_64");
        assert_eq!(b.product, "bazel");
        assert_eq!(b.attributes, "nojdk");
    }

    #[test]
    fn test_jdk_keeps_separators() {
        let b = cat("bazel-0.5.4-jdk8_unpacked-installer-linux-x86_64.sh");
        assert_eq!(b.attributes, "jdk8");
        assert_eq!(b.leftover, " - LEAVES(unpacked)");
    }

    #[test]
    fn test_leftover_reported() {
        let b = cat("bazel-debug-linux-x86_64");
        assert_eq!(b.product, "bazel");
        assert_eq!(b.version.as_deref(), Some("head"));
        assert_eq!(b.leftover, " - LEAVES(debug)");
    }

    #[test]
    fn test_pc_arch_normalized() {
        let b = cat("tool-1.0.0-linux-pc");
        assert_eq!(b.product, "tool");
        assert_eq!(b.version.as_deref(), Some("1.0.0"));
        assert_eq!(b.arch.as_deref(), Some("x86_64"));
        assert_eq!(b.os.as_deref(), Some("linux"));
        assert_eq!(b.leftover, "");
    }

    #[test]
    fn test_os_inferred_from_packaging() {
        assert_eq!(cat("rules_go-0.24.6.zip").os.as_deref(), Some("linux"));
        assert_eq!(cat("buildifier.exe").os.as_deref(), Some("windows"));
        assert_eq!(cat("buildifier.mac").os.as_deref(), Some("macos"));
    }

    #[test]
    fn test_upper_case_tokens() {
        let b = cat("Bazel-5.0.0-LINUX-X86_64");
        assert_eq!(b.product, "Bazel");
        assert_eq!(b.os.as_deref(), Some("linux"));
        assert_eq!(b.arch.as_deref(), Some("x86_64"));
    }

    #[test]
    fn test_unknown_vendor_is_consumed() {
        let b = cat("gazelle-v0.30.0-x86_64-unknown-linux-gnu.tar.gz");
        assert_eq!(b.product, "gazelle");
        assert_eq!(b.version.as_deref(), Some("0.30.0"));
        assert_eq!(b.os.as_deref(), Some("linux"));
        assert_eq!(b.arch.as_deref(), Some("x86_64"));
        assert_eq!(b.leftover, "");
    }

    #[test]
    fn test_bare_token_does_not_panic() {
        let b = cat("x86_64");
        assert_eq!(b.arch.as_deref(), Some("x86_64"));
        assert_eq!(b.product, "");
    }
}
