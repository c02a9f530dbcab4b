use crate::document::DocumentKind;
use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Markdown and notebook files below `root`, sorted, skipping hidden directories.
pub fn find_documents(root: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && DocumentKind::from_path(entry.path()).is_some() {
            documents.push(entry.into_path());
        }
    }
    Ok(documents)
}

/// Replace directory targets by the documents they contain. Files, including
/// ones that do not exist, are passed through in order.
pub fn expand_targets(targets: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for target in targets {
        if !target.is_dir() {
            expanded.push(target.clone());
            continue;
        }
        match find_documents(target) {
            Ok(documents) => {
                tracing::debug!(
                    "{}: found {} documents",
                    target.display(),
                    documents.len()
                );
                expanded.extend(documents);
            }
            Err(e) => tracing::error!("Cannot search {}: {}", target.display(), e),
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_find_documents() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "README.md");
        create_file(tmp.path(), "b/analysis.ipynb");
        create_file(tmp.path(), "a/notes.md");
        create_file(tmp.path(), "a/data.csv");
        create_file(tmp.path(), ".github/PULL_REQUEST_TEMPLATE.md");

        let found = find_documents(tmp.path()).unwrap();
        let relative: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("README.md"),
                PathBuf::from("a/notes.md"),
                PathBuf::from("b/analysis.ipynb"),
            ]
        );
    }

    #[test]
    fn test_expand_targets_keeps_files() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "docs/x.md");
        let missing = tmp.path().join("missing.md");
        let targets = vec![missing.clone(), tmp.path().join("docs")];
        assert_eq!(
            expand_targets(&targets),
            vec![missing, tmp.path().join("docs/x.md")]
        );
    }
}
