pub type CitylineResult<T> = Result<T, CitylineError>;

#[derive(thiserror::Error, Debug)]
pub enum CitylineError {
    #[error("data error: {0}")]
    Data(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CitylineError {
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
