//! Artifact retrieval into the local cache

use futures::StreamExt;
use nwkit_errors::{Error, ProvisionError};
use nwkit_events::{EventEmitter, EventSender, ProvisionEvent};
use nwkit_hash::Hash;
use nwkit_store::{ArtifactCache, CacheWriter};
use nwkit_types::PlatformTarget;
use std::time::{Duration, Instant};

use crate::client::NetClient;
use crate::validation::{content_type_essence, status_failure, validate_url};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(50);

/// Result of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive was already cached; no request was made
    AlreadyPresent,
    /// The archive was downloaded and committed to the cache
    Fetched { size: u64, hash: Hash },
}

impl FetchOutcome {
    #[must_use]
    pub fn from_cache(&self) -> bool {
        matches!(self, Self::AlreadyPresent)
    }
}

/// Downloads platform archives from `<base_url><suffix>` into the cache
#[derive(Clone)]
pub struct ArtifactFetcher {
    client: NetClient,
    base_url: String,
    cache: ArtifactCache,
    content_type: Option<String>,
}

impl ArtifactFetcher {
    /// Create a fetcher
    ///
    /// `content_type` replaces the per-format media types when set.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid http(s) URL.
    pub fn new(
        client: NetClient,
        base_url: impl Into<String>,
        cache: ArtifactCache,
        content_type: Option<String>,
    ) -> Result<Self, Error> {
        let base_url = base_url.into();
        validate_url(&base_url)?;

        Ok(Self {
            client,
            base_url,
            cache,
            content_type: content_type.map(|ct| ct.trim().to_ascii_lowercase()),
        })
    }

    /// Remote URL for a target
    #[must_use]
    pub fn url_for(&self, target: &PlatformTarget) -> String {
        format!("{}{}", self.base_url, target.archive_suffix)
    }

    #[must_use]
    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    fn accepted_types(&self, target: &PlatformTarget) -> Vec<&str> {
        match &self.content_type {
            Some(ct) => vec![ct.as_str()],
            None => target.archive_format.media_types().to_vec(),
        }
    }

    /// Ensure the target's archive is in the cache
    ///
    /// # Errors
    ///
    /// Returns `TransferFailed` for transport errors, non-success statuses and
    /// stalled bodies, `UnexpectedContentType` when the response is not an
    /// archive, and storage errors when the cache cannot be written. No bytes
    /// reach `cache_path` on any error.
    pub async fn fetch(
        &self,
        target: &PlatformTarget,
        tx: &EventSender,
    ) -> Result<FetchOutcome, Error> {
        let platform = target.id;

        if self.cache.is_cached(target).await {
            tx.emit_provision(ProvisionEvent::FetchSkipped {
                platform,
                cache_path: target.cache_path.clone(),
            });
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let url = self.url_for(target);
        tx.emit_provision(ProvisionEvent::FetchStarted {
            platform,
            url: url.clone(),
        });

        let response = self
            .client
            .get(&url)
            .await
            .map_err(|e| transfer_failed(target, e.to_string()))?;

        if let Some(message) = status_failure(&response) {
            return Err(transfer_failed(target, format!("{message} from {url}")));
        }

        let accepted = self.accepted_types(target);
        let actual = content_type_essence(&response);
        if !actual
            .as_deref()
            .is_some_and(|actual| accepted.contains(&actual))
        {
            return Err(ProvisionError::UnexpectedContentType {
                platform: platform.to_string(),
                expected: accepted.join(" or "),
                actual: actual.unwrap_or_else(|| "<none>".to_string()),
            }
            .into());
        }

        let mut writer = self.cache.writer(target).await?;
        if let Err(e) = self.stream_body(target, response, &mut writer, tx).await {
            if let Err(discard) = writer.discard().await {
                tracing::debug!(platform = %platform, error = %discard, "failed to discard partial download");
            }
            return Err(e);
        }

        let entry = writer.commit().await?;
        tx.emit_provision(ProvisionEvent::FetchCompleted {
            platform,
            bytes: entry.size,
            hash: entry.blake3.to_hex(),
        });

        Ok(FetchOutcome::Fetched {
            size: entry.size,
            hash: entry.blake3,
        })
    }

    async fn stream_body(
        &self,
        target: &PlatformTarget,
        response: reqwest::Response,
        writer: &mut CacheWriter,
        tx: &EventSender,
    ) -> Result<(), Error> {
        let total = response.content_length();
        let chunk_timeout = self.client.config().chunk_timeout;
        let mut stream = response.bytes_stream();
        let mut last_progress: Option<Instant> = None;

        loop {
            let next = tokio::time::timeout(chunk_timeout, stream.next())
                .await
                .map_err(|_| {
                    transfer_failed(
                        target,
                        format!("no data received for {chunk_timeout:?}"),
                    )
                })?;

            let Some(chunk) = next else { break };
            let chunk = chunk.map_err(|e| transfer_failed(target, e.to_string()))?;
            writer.append(&chunk).await?;

            if last_progress.is_none_or(|at| at.elapsed() >= PROGRESS_INTERVAL) {
                tx.emit_provision(ProvisionEvent::FetchProgress {
                    platform: target.id,
                    bytes: writer.written(),
                    total,
                });
                last_progress = Some(Instant::now());
            }
        }

        if let Some(total) = total {
            if writer.written() != total {
                return Err(transfer_failed(
                    target,
                    format!("received {} of {total} bytes", writer.written()),
                ));
            }
        }

        Ok(())
    }
}

fn transfer_failed(target: &PlatformTarget, message: String) -> Error {
    ProvisionError::TransferFailed {
        platform: target.id.to_string(),
        message,
    }
    .into()
}
