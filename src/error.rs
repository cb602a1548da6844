/// Process-level error: a message for the operator plus the exit code that
/// `main` hands back to the shell.
///
/// Exit codes are part of the CLI contract:
/// - 2: input/config/schema problems (load stage)
/// - 4: chart rendering failures (render stage)
/// - 5: document composition/write failures (compose stage)
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

    /// Load-stage failure: bad input path, missing column, unreadable CSV.
    pub fn load(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Render-stage failure: the chart artifact could not be produced.
    pub fn render(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    /// Compose-stage failure: the document artifact could not be written.
    pub fn compose(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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
