//! # Categorize Module
//!
//! リリース成果物のファイル名を集計用のバケットに分解する。
//!
//! ## 設計
//!
//! ファイル名を「残りテキスト」として保持し、固定順のステージで既知の
//! トークンを1つずつ取り除いていく。各ステージは残りテキストを受け取り、
//! 取り出した値と短くなった残りテキストを返す。
//!
//! ## モジュール構成
//!
//! - `feature`: 汎用トークン抽出
//! - `tables`: arch / os / packaging のトークン表と正規化
//! - `version`: product / version の正規表現
//! - `pipeline`: ステージの実行順序
//!
//! ## 使用例
//!
//! ```rust
//! use artifact_buckets_core::categorize::{categorize, extract_feature};
//!
//! let bucket = categorize("bazel-5.0.0-linux-x86_64", None);
//! assert_eq!(bucket.product, "bazel");
//! assert_eq!(bucket.version.as_deref(), Some("5.0.0"));
//! assert_eq!(bucket.os.as_deref(), Some("linux"));
//!
//! let (os, rest) = extract_feature("bazelisk-darwin-amd64", &["darwin"]);
//! assert_eq!(os.as_deref(), Some("darwin"));
//! assert_eq!(rest, "bazelisk-amd64");
//! ```

mod feature;
mod pipeline;
mod tables;
mod version;

// Re-exports
pub use feature::extract_feature;
pub use pipeline::categorize;
pub use tables::{
    normalize_arch, normalize_os, package_extensions, PackageFamily, ARCH_FEATURES, OS_FEATURES,
};
pub use version::{has_common_version, split_product_version, ProductVersion, HEAD_VERSION};
