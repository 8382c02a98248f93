//! Results-table extractor.
//!
//! Reads the CSV table the benchmark's `evaluate` step writes and extracts
//! the overall accuracy metric. Tolerant of minor schema drift: either
//! accepted header name works and a trailing percent sign is stripped.

use std::path::Path;

use crate::domain::errors::{ScoreError, ScoreResult};
use crate::domain::models::round2;

/// Header names accepted for the accuracy column.
pub const ACCURACY_COLUMNS: [&str; 2] = ["Overall Acc", "Overall Accuracy"];

/// Extracts the overall accuracy from the results table at `path`.
///
/// Only the first data row is consulted. A missing file is a not-found
/// error; a present header with an absent or unparseable value is a
/// format error. The returned value is rounded to two decimals and is
/// already on the 0-100 scale used by scores.
pub async fn extract_overall_accuracy(path: &Path) -> ScoreResult<f64> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ScoreError::from_io(path, e))?;

    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or_else(|| format_error("results table is empty"))?;
    let columns = split_row(header);
    let index = columns
        .iter()
        .position(|c| ACCURACY_COLUMNS.contains(&c.as_str()))
        .ok_or_else(|| {
            format_error(&format!("accuracy column not found in header {columns:?}"))
        })?;

    let row = lines
        .next()
        .ok_or_else(|| format_error("results table has no data rows"))?;
    let cells = split_row(row);
    let raw = cells.get(index).map_or("", String::as_str);
    let raw = raw.strip_suffix('%').unwrap_or(raw).trim();

    if raw.is_empty() {
        return Err(format_error("accuracy value is empty in the first data row"));
    }

    let value: f64 = raw
        .parse()
        .map_err(|_| format_error(&format!("accuracy value {raw:?} is not a number")))?;
    Ok(round2(value))
}

fn format_error(reason: &str) -> ScoreError {
    ScoreError::ResultFormat {
        column: ACCURACY_COLUMNS[0].to_string(),
        reason: reason.to_string(),
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn write_table(content: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("results.csv");
        tokio::fs::write(&path, content).await.expect("write table");
        (dir, path)
    }

    #[tokio::test]
    async fn extracts_plain_value() {
        let (_dir, path) = write_table("Model,Overall Acc\norg/model,87.5\n").await;
        assert_eq!(extract_overall_accuracy(&path).await.unwrap(), 87.5);
    }

    #[tokio::test]
    async fn percent_suffix_parses_identically() {
        let (_dir, path) = write_table("Model,Overall Acc\norg/model,87.5%\n").await;
        assert_eq!(extract_overall_accuracy(&path).await.unwrap(), 87.5);
    }

    #[tokio::test]
    async fn alternate_header_is_accepted() {
        let (_dir, path) = write_table("Overall Accuracy,Model\n64.25%,org/model\n").await;
        assert_eq!(extract_overall_accuracy(&path).await.unwrap(), 64.25);
    }

    #[tokio::test]
    async fn only_first_row_is_read() {
        let (_dir, path) =
            write_table("Overall Acc\n42.0\n99.0\n").await;
        assert_eq!(extract_overall_accuracy(&path).await.unwrap(), 42.0);
    }

    #[tokio::test]
    async fn quoted_cells_are_unwrapped() {
        let (_dir, path) = write_table("\"Overall Acc\",Model\n\"73.1\",m\n").await;
        assert_eq!(extract_overall_accuracy(&path).await.unwrap(), 73.1);
    }

    #[tokio::test]
    async fn value_is_rounded_to_two_places() {
        let (_dir, path) = write_table("Overall Acc\n87.456\n").await;
        assert_eq!(extract_overall_accuracy(&path).await.unwrap(), 87.46);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.csv");
        let err = extract_overall_accuracy(&path).await.unwrap_err();
        assert!(matches!(err, ScoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn empty_value_is_a_format_error() {
        let (_dir, path) = write_table("Model,Overall Acc\norg/model,\n").await;
        let err = extract_overall_accuracy(&path).await.unwrap_err();
        assert!(matches!(err, ScoreError::ResultFormat { .. }));
    }

    #[tokio::test]
    async fn unparseable_value_is_a_format_error() {
        let (_dir, path) = write_table("Overall Acc\nnot-a-number\n").await;
        let err = extract_overall_accuracy(&path).await.unwrap_err();
        assert!(matches!(err, ScoreError::ResultFormat { .. }));
    }

    #[tokio::test]
    async fn missing_column_is_a_format_error() {
        let (_dir, path) = write_table("Model,Score\nm,12\n").await;
        let err = extract_overall_accuracy(&path).await.unwrap_err();
        assert!(matches!(err, ScoreError::ResultFormat { .. }));
    }
}
