use std::path::{Path, PathBuf};

/// Discover input element-set files.
///
/// A file path is returned as-is. A directory is scanned (non-recursively)
/// for `*.csv` / `*.xml`, together with its `data/` subdirectory — the
/// conventional spot for bundled sample sets. Results are sorted for
/// deterministic ordering.
pub fn find_input_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files = Vec::new();
    if path.is_dir() {
        collect_element_sets(path, &mut files);
        collect_element_sets(&path.join("data"), &mut files);
    }
    files.sort();
    files
}

fn collect_element_sets(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);
        if supported {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_single_file_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sats.csv");
        fs::write(&file, "a,b\n1,2\n").unwrap();

        assert_eq!(find_input_files(&file), vec![file]);
    }

    #[test]
    fn test_directory_scan_includes_data_subdir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("leo.csv"), "a\n1\n").unwrap();
        fs::write(dir.path().join("stations.xml"), "<ndm/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data").join("sample.csv"), "a\n1\n").unwrap();

        let files = find_input_files(dir.path());
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .map(str::to_string)
            .collect();
        assert_eq!(files.len(), 3);
        assert!(names.contains(&"leo.csv".to_string()));
        assert!(names.contains(&"stations.xml".to_string()));
        assert!(names.contains(&"sample.csv".to_string()));
    }

    #[test]
    fn test_missing_path_yields_nothing() {
        assert!(find_input_files(Path::new("/nonexistent/dir")).is_empty());
    }
}
