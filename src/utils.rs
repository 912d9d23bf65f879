use anyhow::{Result, ensure};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check if a file is a supported results document
pub fn is_results_document(p: &Path) -> bool {
    matches!(
        p.extension().and_then(|s| s.to_str()),
        Some("yml" | "yaml" | "json")
    )
}

/// Expand paths into results documents, keeping argument order.
/// Directories are walked recursively in file-name order; `exclude` (the
/// report being written) is never picked up from a walked directory.
pub fn collect_documents(paths: &[String], exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let excluded = exclude.and_then(|p| fs::canonicalize(p).ok());
    let mut documents = Vec::new();
    for path in paths {
        let root = Path::new(path);
        ensure!(root.exists(), "No such file or directory: {}", root.display());

        if root.is_file() {
            documents.push(root.to_path_buf());
            continue;
        }

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if excluded.is_some() && fs::canonicalize(p).ok() == excluded {
                continue;
            }
            if p.is_file() && is_results_document(p) {
                documents.push(p.to_path_buf());
            }
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_results_document() {
        assert!(is_results_document(Path::new("out/results.yaml")));
        assert!(is_results_document(Path::new("results.yml")));
        assert!(is_results_document(Path::new("results.json")));
        assert!(!is_results_document(Path::new("policyreport.toml")));
        assert!(!is_results_document(Path::new("README")));
    }

    #[test]
    fn test_collect_documents_walks_directories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.yaml"), "outcomes: []").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        fs::write(dir.path().join("nested").join("c.yml"), "outcomes: []").unwrap();

        let single = dir.path().join("b.yaml").display().to_string();
        let paths = vec![single, dir.path().display().to_string()];
        let found = collect_documents(&paths, None).unwrap();

        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["b.yaml", "a.json", "b.yaml", "c.yml"]);
    }

    #[test]
    fn test_collect_documents_missing_path() {
        let result = collect_documents(&["does/not/exist.yaml".to_string()], None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No such file"));
    }

    #[test]
    fn test_collect_documents_skips_excluded_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("results.yaml"), "outcomes: []").unwrap();
        fs::write(dir.path().join("report.json"), "previous report").unwrap();

        let paths = vec![dir.path().display().to_string()];
        let report = dir.path().join("report.json");
        let found = collect_documents(&paths, Some(&report)).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("results.yaml"));

        let missing = dir.path().join("not-written-yet.json");
        assert_eq!(collect_documents(&paths, Some(&missing)).unwrap().len(), 2);
    }
}
