//! HTTP transport shared by every resource client.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::template::{expand_segments, Params};

#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_http(server_url, Client::new())
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_http(server_url, http)
    }

    fn with_http(server_url: &str, http: Client) -> Result<Self> {
        if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
            return Err(anyhow!("server_url must start with http:// or https://"));
        }
        let base_url = Url::parse(server_url)
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the absolute URL for a path template below the server url.
    pub fn resolve(&self, template: &str, layers: &[&Params]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow!("server url '{}' cannot carry a path", self.base_url))?;
            path.pop_if_empty();
            path.extend(expand_segments(template, layers));
        }
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .send(Method::GET, &url, self.http.get(url.clone()).query(query))
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("malformed response body from {}", url.path()))
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<()> {
        self.send(Method::PUT, &url, self.http.put(url.clone()).json(body))
            .await?;
        Ok(())
    }

    pub async fn post(&self, url: Url) -> Result<()> {
        self.send(Method::POST, &url, self.http.post(url.clone()))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, url: Url) -> Result<()> {
        self.send(Method::DELETE, &url, self.http.delete(url.clone()))
            .await?;
        Ok(())
    }

    async fn send(&self, method: Method, url: &Url, request: RequestBuilder) -> Result<Response> {
        debug!(%method, path = url.path(), "issuing request");
        let response = request.send().await?;
        match response.error_for_status() {
            Ok(response) => Ok(response),
            Err(err) => {
                warn!(%method, path = url.path(), error = %err, "request failed");
                Err(err.into())
            }
        }
    }
}
