use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	// bad numeric token or out-of-range vertex reference during ingestion
	#[error("malformed geometry: {0}")]
	MalformedGeometry(String),
	// destination document has no usable marker pair
	#[error("missing block: {0}")]
	MissingBlock(String),
	// nothing to generate; the run becomes a no-op
	#[error("empty input: {0}")]
	EmptyInput(String),
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error("{stage} stage failed: {source}")]
	Stage {
		stage: Stage,
		#[source]
		source: Box<Error>,
	},
}

impl Error {
	// attribute an error to the pipeline stage it escaped from
	pub fn at(self, stage: Stage) -> Self {
		match self {
			Error::Stage { .. } => self,
			other => Error::Stage { stage, source: Box::new(other) },
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Ingest,
	Normalize,
	Rings,
	Index,
	Emit,
	Patch,
}

impl std::fmt::Display for Stage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Stage::Ingest => "ingest",
			Stage::Normalize => "normalize",
			Stage::Rings => "rings",
			Stage::Index => "index",
			Stage::Emit => "emit",
			Stage::Patch => "patch",
		};
		write!(f, "{}", name)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
