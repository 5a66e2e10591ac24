use std::path::PathBuf;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
#[derive(thiserror::Error, Debug)]
pub enum AnalyzerError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to open results file {}: {source}", path.display())]
    FileOpenError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed reading results file: {0}")]
    CsvReadError(csv::Error),
    #[error("Failed to render chart: {0}")]
    RenderError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
