use creche_core::AppError;

/// Maps a unique-constraint violation to 409 with `message`; anything else is 500.
pub fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::conflict(anyhow::anyhow!("{}", message));
    }
    tracing::error!(error = %e, "Database error");
    AppError::database(e)
}

/// Like [`conflict_on_unique`] but reports which account field collided.
pub fn conflict_on_account(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        let field = match db_err.constraint() {
            Some(c) if c.contains("email") => "email",
            Some(c) if c.contains("username") => "username",
            _ => "account",
        };
        return AppError::conflict(anyhow::anyhow!("A user with this {} already exists", field));
    }
    tracing::error!(error = %e, "Database error");
    AppError::database(e)
}
