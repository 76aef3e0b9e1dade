use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::ContentStore;
use crate::{
	error::StoreError,
	models::{Cid, CidVersion},
};

pub const CAT_ENDPOINT: &str = "/api/v0/cat?arg=";
pub const ADD_ENDPOINT: &str = "/api/v0/add";
pub const PIN_LS_ENDPOINT: &str = "/api/v0/pin/ls?stream=true";

/// Kubo-compatible RPC client. Every RPC call is a POST.
#[derive(Debug, Clone)]
pub struct IpfsHttpStore {
	client: reqwest::Client,
	base: String,
}

impl IpfsHttpStore {
	pub fn new(base: impl Into<String>, timeout: Option<Duration>) -> Result<Self, StoreError> {
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder.build().map_err(|e| StoreError::Client(e.to_string()))?;

		Ok(Self::with_client(client, base))
	}

	/// Clones of a `reqwest::Client` share one connection pool.
	pub fn with_client(client: reqwest::Client, base: impl Into<String>) -> Self {
		let base = base.into().trim_end_matches('/').to_string();
		IpfsHttpStore { client, base }
	}

	pub fn cat_url(&self, cid: &Cid) -> String {
		format!("{}{}{}", self.base, CAT_ENDPOINT, cid)
	}

	pub fn add_url(&self, version: CidVersion) -> String {
		format!("{}{}?cid-version={}", self.base, ADD_ENDPOINT, version.as_query_value())
	}

	pub fn pin_ls_url(&self) -> String {
		format!("{}{}", self.base, PIN_LS_ENDPOINT)
	}

	async fn post(&self, url: String, form: Option<Form>) -> Result<Vec<u8>, StoreError> {
		debug!(%url, "POST");

		let mut request = self.client.post(&url);
		if let Some(form) = form {
			request = request.multipart(form);
		}

		let response = request.send().await.map_err(|e| map_reqwest_error(e, &url))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(StoreError::Status {
				url,
				status: status.as_u16(),
				body: body.trim().to_string(),
			});
		}

		let bytes = response.bytes().await.map_err(|e| StoreError::Body {
			url: url.clone(),
			message: e.to_string(),
		})?;

		Ok(bytes.to_vec())
	}
}

#[async_trait]
impl ContentStore for IpfsHttpStore {
	fn endpoint(&self) -> &str {
		&self.base
	}

	async fn cat(&self, cid: &Cid) -> Result<Vec<u8>, StoreError> {
		self.post(self.cat_url(cid), None).await
	}

	async fn add(&self, body: &[u8], version: CidVersion) -> Result<Vec<u8>, StoreError> {
		let form = Form::new().part("file", Part::bytes(body.to_vec()).file_name("file"));
		self.post(self.add_url(version), Some(form)).await
	}

	async fn list_pins(&self) -> Result<Vec<u8>, StoreError> {
		self.post(self.pin_ls_url(), None).await
	}
}

fn map_reqwest_error(err: reqwest::Error, url: &str) -> StoreError {
	if err.is_timeout() {
		StoreError::Timeout { url: url.to_string() }
	} else {
		StoreError::Transport {
			url: url.to_string(),
			message: err.to_string(),
		}
	}
}
