mod types;

pub use types::*;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::services::diff::{parse_patch, ChangeType};

lazy_static! {
    /// 画像参照検出用の正規表現
    /// - `![](path)` - 代替テキストなし
    /// - `![alt](path)` - 代替テキストあり
    /// - `![](path "title")` - タイトル付き
    /// 複数行にまたがる構文や入れ子の括弧は対象外
    pub static ref IMAGE_REGEX: Regex = Regex::new(r"!\[([^\[\]\n]*)\]\(([^()\n]+)\)").unwrap();
}

/// テキスト中のすべての画像参照を順に返す
pub fn extract_images(text: &str) -> impl Iterator<Item = ImageReference> + '_ {
    IMAGE_REGEX.captures_iter(text).filter_map(to_reference)
}

/// 代替テキストが空の画像参照だけを返す
pub fn extract_missing_alt(text: &str) -> impl Iterator<Item = ImageReference> + '_ {
    extract_images(text).filter(ImageReference::is_missing_alt)
}

/// パッチの追加行から画像参照を抽出する
///
/// 追加行（`+`）以外のコンテキスト行や削除行は無視する。`span` は追加行の
/// 内容（先頭の `+` を除く）に対する範囲になる。
pub fn extract_from_patch(patch: &str, policy: AltPolicy) -> Vec<ImageReference> {
    parse_patch(patch)
        .into_iter()
        .filter(|line| line.change_type == ChangeType::Add)
        .flat_map(|line| {
            extract_images(&line.content)
                .filter(|reference| policy.accepts(reference))
                .map(|mut reference| {
                    reference.line = line.new_line;
                    reference.line_text = Some(line.content.clone());
                    reference
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// 括弧内のテキストから画像パスを取り出す
pub fn normalize_target(target: &str) -> String {
    let trimmed = target.trim();

    // <path with spaces>
    if let Some(rest) = trimmed.strip_prefix('<') {
        if let Some(end) = rest.find('>') {
            return rest[..end].trim().to_string();
        }
    }

    // "path" / 'path'
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim().to_string();
        }
    }

    // path "title"
    trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn to_reference(caps: Captures<'_>) -> Option<ImageReference> {
    let whole = caps.get(0)?;
    let alt = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let target = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    Some(ImageReference {
        markdown: whole.as_str().to_string(),
        alt: alt.to_string(),
        target: target.to_string(),
        path: normalize_target(target),
        span: whole.range(),
        line: None,
        line_text: None,
    })
}
