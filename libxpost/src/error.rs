//! Error types for Xpost

use thiserror::Error;

pub type Result<T> = std::result::Result<T, XpostError>;

#[derive(Error, Debug)]
pub enum XpostError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Submission blocked: {0}")]
    Submission(#[from] SubmitError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl XpostError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            XpostError::InvalidInput(_) => 3,
            XpostError::Submission(_) => 3,
            XpostError::Json(_) => 3,
            XpostError::Config(_) => 1,
            XpostError::Io(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Mode '{mode}' includes unknown platform '{platform}'")]
    UnknownPlatform { mode: String, platform: String },

    #[error("Platform '{0}' is configured more than once")]
    DuplicatePlatform(String),
}

/// Conditions that stop a submit action from going ahead.
///
/// The display strings are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please select at least one platform.")]
    NoPlatformSelected,

    #[error("Please enter text for at least one platform.")]
    EmptyPlatformText,

    #[error("Please enter some text.")]
    EmptyText,

    #[error("Please provide alt text for all images.")]
    MissingAltText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = XpostError::InvalidInput("Unknown format".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_submission_blocked() {
        let error = XpostError::Submission(SubmitError::NoPlatformSelected);
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_config_error() {
        let config_error = ConfigError::MissingField("platforms".to_string());
        let error = XpostError::Config(config_error);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_io_error() {
        let error = XpostError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_submit_error_messages_are_user_facing() {
        assert_eq!(
            SubmitError::NoPlatformSelected.to_string(),
            "Please select at least one platform."
        );
        assert_eq!(
            SubmitError::EmptyPlatformText.to_string(),
            "Please enter text for at least one platform."
        );
        assert_eq!(SubmitError::EmptyText.to_string(), "Please enter some text.");
        assert_eq!(
            SubmitError::MissingAltText.to_string(),
            "Please provide alt text for all images."
        );
    }

    #[test]
    fn test_error_message_formatting_submission() {
        let error: XpostError = SubmitError::EmptyText.into();
        assert_eq!(
            format!("{}", error),
            "Submission blocked: Please enter some text."
        );
    }

    #[test]
    fn test_error_message_formatting_unknown_platform() {
        let config_error = ConfigError::UnknownPlatform {
            mode: "11ty".to_string(),
            platform: "myspace".to_string(),
        };
        let error = XpostError::Config(config_error);
        assert_eq!(
            format!("{}", error),
            "Configuration error: Mode '11ty' includes unknown platform 'myspace'"
        );
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let config_error = ConfigError::DuplicatePlatform("bluesky".to_string());
        let xpost_error: XpostError = config_error.into();

        match xpost_error {
            XpostError::Config(ConfigError::DuplicatePlatform(name)) => {
                assert_eq!(name, "bluesky");
            }
            _ => panic!("Expected XpostError::Config"),
        }
    }

    #[test]
    fn test_config_error_read_error_formatting() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let config_error = ConfigError::ReadError(io_error);
        assert!(format!("{}", config_error).contains("Failed to read config file"));
    }

    #[test]
    fn test_error_debug_output() {
        let error = XpostError::Submission(SubmitError::MissingAltText);
        let debug_output = format!("{:?}", error);
        assert!(debug_output.contains("Submission"));
        assert!(debug_output.contains("MissingAltText"));
    }
}
