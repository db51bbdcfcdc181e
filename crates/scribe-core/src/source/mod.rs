use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::HostingError;
use crate::services::github::PullRequestHost;

pub const DEFAULT_EXTENSIONS: &[&str] = &["md"];

/// ドキュメントの中身
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    /// ファイル全体
    Full(String),
    /// プルリクエストの差分（unified diff）
    Patch(String),
}

/// 走査対象のマークダウンドキュメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub body: DocumentBody,
}

impl Document {
    pub fn text(&self) -> &str {
        match &self.body {
            DocumentBody::Full(text) | DocumentBody::Patch(text) => text,
        }
    }

    /// リポジトリ内の相対パス（`/` 区切り）
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }
}

/// 拡張子が対象かどうか（大文字小文字は区別しない）
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// 作業ツリーを再帰的に走査してマークダウンファイルを読み込む
///
/// 並び順はパス順で決定的。UTF-8 として読めないファイルは警告を出して飛ばす。
pub async fn scan_working_tree<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("read directory {}", dir.display()))?;

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let path = entry.path();

            if file_type.is_dir() {
                // .git の中にドキュメントはない
                if entry.file_name() != ".git" {
                    dirs.push(path);
                }
            } else if file_type.is_file() && has_extension(&path, extensions) {
                files.push(path);
            }
        }

        files.sort();
        for path in files {
            match fs::read_to_string(&path).await {
                Ok(content) => documents.push(Document {
                    path,
                    body: DocumentBody::Full(content),
                }),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        // pop は末尾から取り出すので逆順に積む
        dirs.sort();
        pending.extend(dirs.into_iter().rev());
    }

    tracing::debug!(
        "found {} markdown files under {}",
        documents.len(),
        root.display()
    );
    Ok(documents)
}

/// プルリクエストで変更されたマークダウンファイルの差分を取得する
///
/// 削除されたファイルと、GitHub がパッチを省略したファイルは対象外。
pub async fn pull_request_documents<S: AsRef<str>>(
    host: &dyn PullRequestHost,
    number: u64,
    extensions: &[S],
) -> Result<Vec<Document>, HostingError> {
    let files = host.list_files(number).await?;
    tracing::info!("Pull request #{} changes {} files", number, files.len());

    let documents = files
        .into_iter()
        .filter(|file| has_extension(Path::new(&file.filename), extensions))
        .filter(|file| !file.is_removed())
        .filter_map(|file| match file.patch {
            Some(patch) => Some(Document {
                path: PathBuf::from(file.filename),
                body: DocumentBody::Patch(patch),
            }),
            None => {
                tracing::warn!("No patch available for {}, skipping", file.filename);
                None
            }
        })
        .collect();

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::github::{MockPullRequestHost, PullRequestFile};
    use pretty_assertions::assert_eq;
    use std::fs as std_fs;

    fn setup_test_tree() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();

        std_fs::write(root.join("README.md"), "![](logo.png)").unwrap();
        std_fs::write(root.join("notes.txt"), "![](ignored.png)").unwrap();
        std_fs::create_dir_all(root.join("docs/guide")).unwrap();
        std_fs::write(root.join("docs/a.md"), "a").unwrap();
        std_fs::write(root.join("docs/guide/b.MD"), "b").unwrap();
        std_fs::create_dir_all(root.join(".git")).unwrap();
        std_fs::write(root.join(".git/HEAD.md"), "not docs").unwrap();

        temp_dir
    }

    #[test]
    fn test_has_extension() {
        let extensions = ["md", ".markdown"];
        assert!(has_extension(Path::new("a/b.md"), &extensions));
        assert!(has_extension(Path::new("B.MD"), &extensions));
        assert!(has_extension(Path::new("c.markdown"), &extensions));
        assert!(!has_extension(Path::new("d.mdx"), &extensions));
        assert!(!has_extension(Path::new("md"), &extensions));
    }

    #[tokio::test]
    async fn test_scan_working_tree() {
        let temp_dir = setup_test_tree();
        let root = temp_dir.path();

        let documents = scan_working_tree(root, DEFAULT_EXTENSIONS).await.unwrap();
        let paths: Vec<PathBuf> = documents
            .iter()
            .map(|d| d.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("README.md"),
                PathBuf::from("docs/a.md"),
                PathBuf::from("docs/guide/b.MD"),
            ]
        );
        assert_eq!(documents[0].body, DocumentBody::Full("![](logo.png)".to_string()));
    }

    #[tokio::test]
    async fn test_scan_missing_root_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = scan_working_tree(&temp_dir.path().join("nope"), DEFAULT_EXTENSIONS).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_pull_request_documents_filters_files() {
        let mut host = MockPullRequestHost::new();
        host.expect_list_files().returning(|_| {
            Ok(vec![
                PullRequestFile {
                    filename: "docs/new.md".to_string(),
                    status: "added".to_string(),
                    patch: Some("@@ -0,0 +1 @@\n+![](a.png)".to_string()),
                },
                PullRequestFile {
                    filename: "src/main.rs".to_string(),
                    status: "modified".to_string(),
                    patch: Some("@@ -1 +1 @@\n+fn main() {}".to_string()),
                },
                PullRequestFile {
                    filename: "docs/gone.md".to_string(),
                    status: "removed".to_string(),
                    patch: Some("@@ -1 +0,0 @@\n-bye".to_string()),
                },
                PullRequestFile {
                    filename: "docs/huge.md".to_string(),
                    status: "modified".to_string(),
                    patch: None,
                },
            ])
        });

        let documents = pull_request_documents(&host, 5, DEFAULT_EXTENSIONS)
            .await
            .unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].display_path(), "docs/new.md");
        assert_eq!(
            documents[0].body,
            DocumentBody::Patch("@@ -0,0 +1 @@\n+![](a.png)".to_string())
        );
    }

    #[tokio::test]
    async fn test_pull_request_documents_empty() {
        let mut host = MockPullRequestHost::new();
        host.expect_list_files().returning(|_| Ok(vec![]));

        let documents = pull_request_documents(&host, 5, DEFAULT_EXTENSIONS)
            .await
            .unwrap();
        assert!(documents.is_empty());
    }
}
