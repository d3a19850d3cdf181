use crate::error::AppError;

/// Column whose unique constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    ShortCode,
    CustomAlias,
}

/// Classifies a unique violation on the `urls` table.
///
/// PostgreSQL reports the constraint name (`urls_short_code_key`,
/// `urls_custom_alias_key`); SQLite only reports it in the message
/// (`UNIQUE constraint failed: urls.custom_alias`).
pub fn unique_violation_column(e: &sqlx::Error) -> Option<UniqueColumn> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    let haystack = db_err
        .constraint()
        .map(str::to_string)
        .unwrap_or_else(|| db_err.message().to_string());

    if haystack.contains("custom_alias") {
        Some(UniqueColumn::CustomAlias)
    } else if haystack.contains("short_code") {
        Some(UniqueColumn::ShortCode)
    } else {
        None
    }
}

/// Maps an insert error on `urls` to the matching [`AppError`].
pub fn map_url_insert_error(e: sqlx::Error) -> AppError {
    match unique_violation_column(&e) {
        Some(UniqueColumn::CustomAlias) => AppError::DuplicateAlias,
        Some(UniqueColumn::ShortCode) => AppError::DuplicateCode,
        None => AppError::Persistence(e),
    }
}
