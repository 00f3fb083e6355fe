use thiserror::Error;

pub type CgResult<T> = Result<T, CgError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CgError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
