//! File downloads over reqwest.

use serde::de::DeserializeOwned;
use serenity::async_trait;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::{error::AppError, service::selection::download::AttachmentFetcher};

/// Downloads remote files with the shared reqwest client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Downloads `url` into a new file at `path`; an existing file is an error.
    pub async fn download_to(&self, url: &str, path: &Path) -> Result<(), AppError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        self.fetch_into(url, &mut file).await?;
        file.flush().await?;

        Ok(())
    }

    /// GETs `url` and deserializes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(value)
    }
}

#[async_trait]
impl AttachmentFetcher for HttpFetcher {
    /// Streams the response body chunk by chunk; non-2xx responses are errors.
    async fn fetch_into(&self, url: &str, file: &mut File) -> Result<(), AppError> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }

        Ok(())
    }
}
