use crate::{error::VerifyError, models::Cid};

/// Whether the destination reproduced the object: the identifier it
/// assigned must equal the source CID exactly. An empty identifier never
/// matches.
pub fn matches(original: &Cid, resulting: &str) -> bool {
	!resulting.is_empty() && original.as_str() == resulting
}

pub fn verify(original: &Cid, resulting: &str) -> Result<(), VerifyError> {
	if resulting.is_empty() {
		return Err(VerifyError::MissingHash(original.to_string()));
	}
	if !matches(original, resulting) {
		return Err(VerifyError::HashMismatch {
			expected: original.to_string(),
			actual: resulting.to_string(),
		});
	}
	Ok(())
}
