//! Per-statement context handed to store strategies.

/// Identity and row governance of the statement a fetch belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatementContext {
    connection_id: String,
    statement_id: u32,
    max_rows: Option<u64>,
}

impl StatementContext {
    /// Creates a context without a row limit.
    #[must_use]
    pub fn new(connection_id: impl Into<String>, statement_id: u32) -> Self {
        Self {
            connection_id: connection_id.into(),
            statement_id,
            max_rows: None,
        }
    }

    /// Returns the connection id.
    #[must_use]
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Returns the statement id.
    #[must_use]
    pub const fn statement_id(&self) -> u32 {
        self.statement_id
    }

    /// Returns the maximum number of rows a store replays, if limited.
    #[must_use]
    pub const fn max_rows(&self) -> Option<u64> {
        self.max_rows
    }

    /// Sets the row limit; zero means unlimited.
    pub const fn set_max_rows(&mut self, max_rows: u64) {
        self.max_rows = if max_rows == 0 { None } else { Some(max_rows) };
    }
}
