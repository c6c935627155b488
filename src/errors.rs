use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum SimError {
    #[error("clock returned a non-finite time {0}")]
    NonFiniteClock(f64),

    #[error("uniform sample {0} outside [0,1)")]
    SampleOutOfRange(f64),
}
