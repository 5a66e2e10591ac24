use crate::error::AnalyzerResult;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn create_parent_directory(file_path: &Path) -> AnalyzerResult<()> {
    if let Some(parent) = file_path.parent() {
        // an empty parent means the current directory
        if !parent.as_os_str().is_empty() && fs::metadata(parent).is_err() {
            info!("Creating directory: {}", parent.display());
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn write_to_file(
    file_path: &Path,
    content: &str,
) -> AnalyzerResult<()> {
    create_parent_directory(file_path)?;
    let mut file = fs::File::create(file_path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}

pub fn format_number(num: u64) -> String {
    let mut s = String::new();
    let num_str = num.to_string();
    let a = num_str.chars().rev().enumerate();
    for (i, c) in a {
        if i != 0 && i % 3 == 0 {
            s.insert(0, ',');
        }
        s.insert(0, c);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_write_to_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rows.json");
        write_to_file(&path, "[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
