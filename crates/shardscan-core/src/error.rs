use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config value: {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("file too large: {path} ({size} bytes)")]
    FileTooLarge { path: String, size: u64 },

    #[error("not a source file: {path}")]
    NotSourceFile { path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_error_display_includes_path_and_size() {
        let err = WalkError::FileTooLarge {
            path: "src/huge.cr".into(),
            size: 9_000_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("src/huge.cr"));
        assert!(msg.contains("9000000"));
    }

    #[test]
    fn io_errors_convert_into_walk_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: WalkError = io.into();
        assert!(matches!(err, WalkError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn config_error_display_names_the_field() {
        let err = ConfigError::InvalidValue {
            field: "output.format".into(),
            reason: "unknown format 'yaml'".into(),
        };
        assert!(err.to_string().contains("output.format"));
    }
}
