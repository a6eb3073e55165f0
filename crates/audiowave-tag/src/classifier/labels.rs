//! AudioSet class label loading
//!
//! The classifier's output vector is indexed by the AudioSet class
//! taxonomy. Labels come from the published `class_labels_indices.csv`
//! sidecar (index, mid, display_name), cached next to the model file.

use std::path::Path;

/// Number of classes in the AudioSet taxonomy
pub const AUDIOSET_CLASS_COUNT: usize = 527;

/// Load AudioSet display names from a class_labels_indices.csv file
///
/// Rows must be ordered by class index, matching the model's output order.
/// The expected class count is validated so a stale or truncated sidecar
/// fails loudly instead of mislabeling predictions.
pub fn load_audioset_labels(path: &Path) -> Result<Vec<String>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read label file {:?}: {}", path, e))?;

    let mut labels = Vec::with_capacity(AUDIOSET_CLASS_COUNT);
    for (line_no, line) in contents.lines().enumerate() {
        if line_no == 0 && line.starts_with("index,") {
            continue; // header
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields = parse_csv_line(line);
        if fields.len() < 3 {
            return Err(format!(
                "Malformed label row at line {}: {:?}",
                line_no + 1,
                line
            ));
        }
        labels.push(fields[2].clone());
    }

    if labels.len() != AUDIOSET_CLASS_COUNT {
        return Err(format!(
            "Expected {} AudioSet labels, found {} in {:?}",
            AUDIOSET_CLASS_COUNT,
            labels.len(),
            path
        ));
    }

    Ok(labels)
}

/// Split one CSV line, honoring double-quoted fields
///
/// Display names contain commas ("Child speech, kid speaking"), so a plain
/// split would shear them apart.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_line() {
        assert_eq!(
            parse_csv_line("0,/m/09x0r,Speech"),
            vec!["0", "/m/09x0r", "Speech"]
        );
    }

    #[test]
    fn test_parse_quoted_comma() {
        assert_eq!(
            parse_csv_line("1,/m/0ytgt,\"Child speech, kid speaking\""),
            vec!["1", "/m/0ytgt", "Child speech, kid speaking"]
        );
    }

    #[test]
    fn test_parse_trailing_empty_field() {
        assert_eq!(parse_csv_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_load_validates_count() {
        let dir = std::env::temp_dir().join("audiowave-tag-label-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("truncated.csv");
        std::fs::write(&path, "index,mid,display_name\n0,/m/09x0r,Speech\n").unwrap();

        let err = load_audioset_labels(&path).unwrap_err();
        assert!(err.contains("Expected 527"), "{}", err);
    }

    #[test]
    fn test_load_full_synthetic_file() {
        let dir = std::env::temp_dir().join("audiowave-tag-label-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("full.csv");

        let mut contents = String::from("index,mid,display_name\n");
        for i in 0..AUDIOSET_CLASS_COUNT {
            contents.push_str(&format!("{},/m/{:06},\"Class {}\"\n", i, i, i));
        }
        std::fs::write(&path, contents).unwrap();

        let labels = load_audioset_labels(&path).unwrap();
        assert_eq!(labels.len(), AUDIOSET_CLASS_COUNT);
        assert_eq!(labels[0], "Class 0");
        assert_eq!(labels[526], "Class 526");
    }
}
