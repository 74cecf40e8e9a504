pub type EpicyclerResult<T> = Result<T, EpicyclerError>;

#[derive(thiserror::Error, Debug)]
pub enum EpicyclerError {
    #[error("svg error: {0}")]
    Svg(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("loader error: {0}")]
    Loader(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EpicyclerError {
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn loader(msg: impl Into<String>) -> Self {
        Self::Loader(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(EpicyclerError::svg("x").to_string().contains("svg error:"));
        assert!(
            EpicyclerError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            EpicyclerError::loader("x")
                .to_string()
                .contains("loader error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = EpicyclerError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
