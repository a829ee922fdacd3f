//! Fatal error type for the `pgps` binary.
//!
//! Only failures that should abort an invocation become an `AppError`:
//! unreadable inputs, schema violations, empty pipeline output. Everything
//! recoverable (malformed rows, unresolved accessions, failed batches) is
//! carried through the pipeline as data and surfaced in the run summary.
//!
//! Exit codes:
//! - 2: input/schema/CLI errors
//! - 3: nothing left to process after parsing/filtering
//! - 4: unexpected remote or I/O failure

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
