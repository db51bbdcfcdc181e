use std::ops::Range;

use serde::{Deserialize, Serialize};

/// マークダウン中の画像参照 `![alt](target)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// マッチした構文全体
    pub markdown: String,
    /// 既存の代替テキスト（空の場合あり）
    pub alt: String,
    /// 括弧内の生のテキスト（置換時はこれをそのまま使う）
    pub target: String,
    /// 正規化した画像パス（引用符・山括弧・タイトルを除去）
    pub path: String,
    /// 走査したテキスト内のバイト範囲
    pub span: Range<usize>,
    /// 変更後ファイルでの行番号（パッチモードのみ）
    pub line: Option<u32>,
    /// 追加行の内容（パッチモードのみ）
    pub line_text: Option<String>,
}

impl ImageReference {
    /// 代替テキストが空（空白のみを含む）かどうか
    pub fn is_missing_alt(&self) -> bool {
        self.alt.trim().is_empty()
    }

    /// パスの最後の要素
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }
}

/// どの画像参照を提案対象にするか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AltPolicy {
    /// 代替テキストが空のものだけ
    #[default]
    MissingOnly,
    /// 追加行にある画像すべて
    All,
}

impl AltPolicy {
    pub fn accepts(&self, reference: &ImageReference) -> bool {
        match self {
            AltPolicy::MissingOnly => reference.is_missing_alt(),
            AltPolicy::All => true,
        }
    }
}

pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}
