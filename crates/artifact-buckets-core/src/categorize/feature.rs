//! Feature Extraction
//!
//! 残りテキストから既知のトークンを1つ取り除く汎用操作。
//! すべての抽出ステージで同じ規則を使う。

/// Remove the first matching feature from `remainder`.
///
/// Features are tried in list order; the first one found wins. Each feature is
/// searched verbatim first, then upper-cased. When the match sits between two
/// punctuation characters the separators collapse into one, and a lone
/// trailing separator is dropped.
///
/// Returns the lowercased feature and the reduced remainder, or `None` and the
/// unchanged remainder when nothing matches.
pub fn extract_feature(remainder: &str, features: &[&str]) -> (Option<String>, String) {
    for feature in features {
        let Some((pos, len)) = find_feature(remainder, feature) else {
            continue;
        };

        let mut before = &remainder[..pos];
        let mut after = &remainder[pos + len..];

        if ends_with_punct(before) && starts_with_punct(after) {
            before = drop_last(before);
            if after.chars().count() == 1 {
                after = "";
            }
        } else if after.is_empty() && ends_with_punct(before) {
            before = drop_last(before);
        }

        return (Some(feature.to_lowercase()), format!("{}{}", before, after));
    }

    (None, remainder.to_string())
}

fn find_feature(haystack: &str, feature: &str) -> Option<(usize, usize)> {
    if let Some(pos) = haystack.find(feature) {
        return Some((pos, feature.len()));
    }
    let upper = feature.to_uppercase();
    haystack.find(&upper).map(|pos| (pos, upper.len()))
}

fn is_punct(c: char) -> bool {
    c.is_ascii_punctuation()
}

fn ends_with_punct(s: &str) -> bool {
    s.chars().next_back().is_some_and(is_punct)
}

fn starts_with_punct(s: &str) -> bool {
    s.chars().next().is_some_and(is_punct)
}

/// Drop the last character; only called after `ends_with_punct`, so it is one ASCII byte
fn drop_last(s: &str) -> &str {
    &s[..s.len() - 1]
}
