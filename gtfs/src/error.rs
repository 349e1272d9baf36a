/// Input tables that can't be used, no matter how they're enriched.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{path} is missing required columns: {}", .columns.join(", "))]
    MissingColumns { path: String, columns: Vec<String> },
}
