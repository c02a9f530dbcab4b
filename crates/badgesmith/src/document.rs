//! Markdown files and notebooks as rewritable text.
//!
//! A Markdown file is a single text unit. A notebook contributes one text
//! unit per markdown-tagged cell; every other cell is left untouched.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    Notebook,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "md" => Some(Self::Markdown),
            "ipynb" => Some(Self::Notebook),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    body: Body,
}

#[derive(Debug, Clone)]
enum Body {
    Markdown(String),
    Notebook(Value),
}

impl Document {
    pub fn load(path: &Path) -> Result<Self> {
        let kind = DocumentKind::from_path(path)
            .ok_or_else(|| Error::UnsupportedDocument(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path).map_err(|e| Error::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(path, kind, &content)
    }

    pub fn parse(path: &Path, kind: DocumentKind, content: &str) -> Result<Self> {
        let body = match kind {
            DocumentKind::Markdown => Body::Markdown(content.to_string()),
            DocumentKind::Notebook => {
                let notebook: Value =
                    serde_json::from_str(content).map_err(|e| Error::Notebook {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                if !notebook.is_object() {
                    return Err(Error::Notebook {
                        path: path.to_path_buf(),
                        message: "top level is not an object".to_string(),
                    });
                }
                Body::Notebook(notebook)
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            body,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        match self.body {
            Body::Markdown(_) => DocumentKind::Markdown,
            Body::Notebook(_) => DocumentKind::Notebook,
        }
    }

    /// The text units of the document, in order.
    pub fn texts(&self) -> Vec<String> {
        match &self.body {
            Body::Markdown(text) => vec![text.clone()],
            Body::Notebook(notebook) => markdown_cells(notebook)
                .map(|cell| join_source(cell.get("source")))
                .collect(),
        }
    }

    /// All prose of the document as one string. Notebook cells are each
    /// followed by a newline.
    pub fn full_text(&self) -> String {
        match &self.body {
            Body::Markdown(text) => text.clone(),
            Body::Notebook(_) => self.texts().iter().map(|t| format!("{}\n", t)).collect(),
        }
    }

    /// Apply `rewrite` to each text unit. A unit is replaced only when
    /// `rewrite` returns a different string. Returns true if anything changed.
    pub fn rewrite_texts(&mut self, mut rewrite: impl FnMut(&str) -> Option<String>) -> bool {
        match &mut self.body {
            Body::Markdown(text) => match rewrite(text) {
                Some(updated) if updated != *text => {
                    *text = updated;
                    true
                }
                _ => false,
            },
            Body::Notebook(notebook) => {
                let mut modified = false;
                for cell in markdown_cells_mut(notebook) {
                    let source = join_source(cell.get("source"));
                    if let Some(updated) = rewrite(&source) {
                        if updated != source {
                            cell["source"] = Value::from(split_source(&updated));
                            modified = true;
                        }
                    }
                }
                modified
            }
        }
    }

    /// Serialised document, as it would be written to disk.
    pub fn render(&self) -> Result<String> {
        match &self.body {
            Body::Markdown(text) => Ok(text.clone()),
            Body::Notebook(notebook) => {
                let mut out = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
                let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
                serde::Serialize::serialize(notebook, &mut ser).map_err(|e| Error::Notebook {
                    path: self.path.clone(),
                    message: e.to_string(),
                })?;
                let mut text = String::from_utf8(out).map_err(|e| Error::Notebook {
                    path: self.path.clone(),
                    message: e.to_string(),
                })?;
                text.push('\n');
                Ok(text)
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let content = self.render()?;
        std::fs::write(&self.path, content).map_err(|e| Error::WriteDocument {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn is_markdown_cell(cell: &Value) -> bool {
    cell.get("cell_type").and_then(Value::as_str) == Some("markdown")
}

fn markdown_cells(notebook: &Value) -> impl Iterator<Item = &Value> {
    notebook
        .get("cells")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|cell| is_markdown_cell(cell))
}

fn markdown_cells_mut(notebook: &mut Value) -> impl Iterator<Item = &mut Value> {
    notebook
        .get_mut("cells")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter(|cell| is_markdown_cell(cell))
}

/// Concatenate a cell source stored either as a list of lines or a single string.
pub fn join_source(source: Option<&Value>) -> String {
    match source {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

/// Split text into notebook source lines, each keeping its line break.
/// `split_source(s).concat() == s` for every `s`.
pub fn split_source(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn notebook() -> Value {
        json!({
            "cells": [
                {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "intro"]},
                {"cell_type": "code", "metadata": {}, "source": ["print('é')\n"], "outputs": []},
                {"cell_type": "markdown", "metadata": {}, "source": "single string"}
            ],
            "metadata": {"kernelspec": {"name": "python3"}},
            "nbformat": 4,
            "nbformat_minor": 5
        })
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("a/README.md")),
            Some(DocumentKind::Markdown)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("nb.ipynb")),
            Some(DocumentKind::Notebook)
        );
        assert_eq!(DocumentKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(DocumentKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_split_source_round_trip() {
        for text in ["", "a", "a\n", "a\nb", "a\n\nb\n", "\n\n"] {
            assert_eq!(split_source(text).concat(), text);
        }
        assert_eq!(split_source("a\nb"), vec!["a\n", "b"]);
    }

    #[test]
    fn test_notebook_texts_only_markdown() {
        let doc = Document::parse(
            Path::new("nb.ipynb"),
            DocumentKind::Notebook,
            &notebook().to_string(),
        )
        .unwrap();
        assert_eq!(doc.texts(), vec!["# Title\nintro", "single string"]);
        assert_eq!(doc.full_text(), "# Title\nintro\nsingle string\n");
    }

    #[test]
    fn test_notebook_rewrite_only_changed_cells() {
        let mut doc = Document::parse(
            Path::new("nb.ipynb"),
            DocumentKind::Notebook,
            &notebook().to_string(),
        )
        .unwrap();

        let changed = doc.rewrite_texts(|text| {
            text.starts_with("# Title")
                .then(|| text.replace("intro", "intro\nmore"))
        });
        assert!(changed);
        assert_eq!(doc.texts()[0], "# Title\nintro\nmore");

        let rendered: Value = serde_json::from_str(&doc.render().unwrap()).unwrap();
        assert_eq!(
            rendered["cells"][0]["source"],
            json!(["# Title\n", "intro\n", "more"])
        );
        assert_eq!(rendered["cells"][2]["source"], json!("single string"));
        assert_eq!(rendered["cells"][1], notebook()["cells"][1]);
    }

    #[test]
    fn test_notebook_unchanged_rewrite() {
        let mut doc = Document::parse(
            Path::new("nb.ipynb"),
            DocumentKind::Notebook,
            &notebook().to_string(),
        )
        .unwrap();
        assert!(!doc.rewrite_texts(|text| Some(text.to_string())));
        assert!(!doc.rewrite_texts(|_| None));
    }

    #[test]
    fn test_notebook_serialisation_format() {
        let doc = Document::parse(
            Path::new("nb.ipynb"),
            DocumentKind::Notebook,
            &notebook().to_string(),
        )
        .unwrap();
        let rendered = doc.render().unwrap();
        assert!(rendered.starts_with("{\n \"cells\": [\n  {\n   \"cell_type\": \"markdown\""));
        assert!(rendered.contains("print('é')"));
        assert!(rendered.ends_with("}\n"));
        assert!(rendered.find("\"cells\"").unwrap() < rendered.find("\"nbformat\"").unwrap());
    }

    #[test]
    fn test_malformed_notebook() {
        let err = Document::parse(Path::new("nb.ipynb"), DocumentKind::Notebook, "{oops").unwrap_err();
        assert!(matches!(err, Error::Notebook { .. }));
        let err = Document::parse(Path::new("nb.ipynb"), DocumentKind::Notebook, "[]").unwrap_err();
        assert!(matches!(err, Error::Notebook { .. }));
    }

    #[test]
    fn test_markdown_save() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        fs::write(&path, "old").unwrap();

        let mut doc = Document::load(&path).unwrap();
        assert_eq!(doc.kind(), DocumentKind::Markdown);
        assert!(doc.rewrite_texts(|_| Some("new".to_string())));
        doc.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Document::load(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDocument(_)));
    }
}
