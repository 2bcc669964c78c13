use thiserror::Error;

pub type SattrackResult<T> = Result<T, SattrackError>;

#[derive(Error, Debug, Clone)]
pub enum SattrackError {
    #[error("ConfigError: {0}")]
    ConfigError(String),
    #[error("EmptyMenu: a menu needs at least one item")]
    EmptyMenu,
    #[error("TargetNotFound: {0}")]
    TargetNotFound(String),
    #[error("PropagationError: {0}")]
    PropagationError(String),
    #[error("DisplayError: {0}")]
    DisplayError(String),
    #[error("ActuatorError: {0}")]
    ActuatorError(String),
    #[error("InputClosed: the input panel has no producers left")]
    InputClosed,
    #[error("IoError: {0}")]
    IoError(String),
}

impl From<look_angle::LookAngleError> for SattrackError {
    fn from(err: look_angle::LookAngleError) -> Self {
        if err.is_not_found() {
            SattrackError::TargetNotFound(err.to_string())
        } else {
            SattrackError::PropagationError(err.to_string())
        }
    }
}

impl From<std::io::Error> for SattrackError {
    fn from(err: std::io::Error) -> Self {
        SattrackError::IoError(err.to_string())
    }
}
