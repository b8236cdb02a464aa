//! Feature Tables
//!
//! 抽出ステージが使うトークン表。
//! リストの順序が優先度になる（先に見つかったものが勝つ）。

/// Tag consumed before architecture matching so it does not look like an arch
pub const UNKNOWN_FEATURES: &[&str] = &["unknown"];

/// CPU architectures
pub const ARCH_FEATURES: &[&str] = &["x86_64", "amd64", "arm64", "aarch64", "pc", "unknown"];

/// Operating systems. Compound tokens precede their shorter parts.
pub const OS_FEATURES: &[&str] = &[
    "dist",
    "linux-gnu",
    "pc-windows-gnu",
    "windows-gnu",
    "linux",
    "gnu",
    "apple-darwin",
    "darwin",
    "macos",
    "osx",
    "windows",
];

pub const INSTALLER_FEATURES: &[&str] = &["installer"];

pub const NOJDK_FEATURES: &[&str] = &["nojdk", "without-jdk"];

/// Signature / checksum suffixes, checked before packaging so `.sha256` is not read as `.sh`
pub const SIGNATURE_SUFFIXES: &[&str] = &[".sig", ".sha256"];

pub const LINUX_PACKAGE_EXTENSIONS: &[&str] = &[".sh", ".deb", ".rpm", ".zip", ".tar.gz", ".tgz"];
pub const MACOS_PACKAGE_EXTENSIONS: &[&str] = &[".dmg", ".mac", ".osx"];
pub const WINDOWS_PACKAGE_EXTENSIONS: &[&str] = &[".exe"];

/// Source tarballs: imply `arch = src` and `os = any`
pub const TARBALL_PACKAGING: &[&str] = &["tar.gz", "tgz"];

pub const SOURCE_ARCH: &str = "src";
pub const ANY_OS: &str = "any";

/// Package extension family, used to infer the OS from the packaging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFamily {
    Linux,
    MacOs,
    Windows,
}

impl PackageFamily {
    /// All families in matching order
    pub fn all() -> &'static [PackageFamily] {
        &[Self::Linux, Self::MacOs, Self::Windows]
    }

    /// Extensions with their leading dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Linux => LINUX_PACKAGE_EXTENSIONS,
            Self::MacOs => MACOS_PACKAGE_EXTENSIONS,
            Self::Windows => WINDOWS_PACKAGE_EXTENSIONS,
        }
    }

    /// Normalized OS implied by this family
    pub fn os(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        }
    }

    /// Family of a packaging value (without its leading dot)
    pub fn of_packaging(packaging: &str) -> Option<Self> {
        Self::all().iter().copied().find(|family| {
            family
                .extensions()
                .iter()
                .any(|ext| ext.strip_prefix('.') == Some(packaging))
        })
    }
}

/// Every package extension, Linux first, then macOS, then Windows
pub fn package_extensions() -> Vec<&'static str> {
    PackageFamily::all()
        .iter()
        .flat_map(|family| family.extensions().iter().copied())
        .collect()
}

/// Map architecture aliases onto their canonical name
pub fn normalize_arch(arch: String) -> String {
    match arch.as_str() {
        "amd64" | "pc" => "x86_64".to_string(),
        _ => arch,
    }
}

/// Map OS aliases onto their canonical name
pub fn normalize_os(os: String) -> String {
    match os.as_str() {
        "apple-darwin" | "darwin" | "osx" => "macos".to_string(),
        "gnu" | "linux-gnu" => "linux".to_string(),
        "windows-gnu" | "windows" => "windows".to_string(),
        "dist" => ANY_OS.to_string(),
        _ => os,
    }
}
