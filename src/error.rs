#[derive(Debug, thiserror::Error)]
pub enum OrreryError {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("settings parse error: {0}")]
	Settings(#[from] toml::de::Error),
}

pub type OrreryResult<T> = Result<T, OrreryError>;
