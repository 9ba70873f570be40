use std::collections::HashMap;

use hyper::Body;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use songlist::Position;

/// Request-shape failures. These all map to a 400: the queue itself has no
/// failure modes, so anything that goes wrong went wrong before it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("error reading request body: {0}")]
	Body(#[from] hyper::Error),
	#[error("invalid request body: {0}")]
	Shape(#[from] serde_json::Error),
	#[error("invalid position key {key:?}")]
	Position { key: String },
}

/// POST body: songs to append, in order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongs {
	pub song_ids: Vec<String>,
}

/// DELETE body: position → song pairs. JSON object keys are strings, so
/// positions arrive as decimal strings and are parsed before touching the
/// queue; a key that is not a number is a malformed request, not a skip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSongs {
	pub song_ids: HashMap<String, String>,
}

impl RemoveSongs {
	pub fn into_pairs(self) -> Result<Vec<(Position, String)>, ApiError> {
		self.song_ids
			.into_iter()
			.map(|(key, song)| match key.parse() {
				Ok(n) => Ok((Position::new(n), song)),
				Err(_) => Err(ApiError::Position { key }),
			})
			.collect()
	}
}

/// GET response: `(position, song)` pairs, oldest first.
#[derive(Debug, Serialize)]
pub struct QueueSnapshot {
	pub queue: Vec<(u64, String)>,
}

pub async fn read_json<T: DeserializeOwned>(body: Body) -> Result<T, ApiError> {
	let bytes = hyper::body::to_bytes(body).await?;
	Ok(serde_json::from_slice(&bytes)?)
}
