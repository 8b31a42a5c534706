//! Authority client
//!
//! The [`Authority`] trait is the seam between the submission flow and the
//! remote service that owns the rules. Implementations never touch the
//! session store; they only return data for the flow to apply.
//!
//! [`HttpAuthority`] is the production implementation: JSON over HTTP with a
//! per-request timeout. It keeps no state besides the connection pool.

use crate::core::ClientSettings;
use crate::game::components::{BoardSnapshot, GameMode};
use crate::game::square::{Coordinate, SquareName};
use crate::networking::error::{AuthorityError, AuthorityResult};
use crate::networking::protocol::{
    ModeRequest, MoveDescriptor, MoveResponseDto, SnapshotDto,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Answer to a move submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveReply {
    /// The authority applied the move; this is the new confirmed board
    Applied(BoardSnapshot),
    /// Resubmit the same move with a promotion kind
    PromotionRequired,
}

/// Operations offered by the remote authority
#[async_trait]
pub trait Authority: Send + Sync {
    /// Legal targets for the piece on `square`
    ///
    /// Failures are swallowed: an empty list is a safe thing to render.
    async fn legal_targets(&self, square: SquareName) -> Vec<Coordinate>;

    async fn submit_move(&self, descriptor: &MoveDescriptor) -> AuthorityResult<MoveReply>;

    async fn undo_last_move(&self) -> AuthorityResult<BoardSnapshot>;

    async fn reset_game(&self) -> AuthorityResult<()>;

    async fn set_mode(&self, mode: GameMode) -> AuthorityResult<()>;

    /// Let the authority's AI play for the side to move
    async fn request_ai_move(&self) -> AuthorityResult<BoardSnapshot>;
}

#[async_trait]
impl<T: Authority + ?Sized> Authority for Arc<T> {
    async fn legal_targets(&self, square: SquareName) -> Vec<Coordinate> {
        (**self).legal_targets(square).await
    }

    async fn submit_move(&self, descriptor: &MoveDescriptor) -> AuthorityResult<MoveReply> {
        (**self).submit_move(descriptor).await
    }

    async fn undo_last_move(&self) -> AuthorityResult<BoardSnapshot> {
        (**self).undo_last_move().await
    }

    async fn reset_game(&self) -> AuthorityResult<()> {
        (**self).reset_game().await
    }

    async fn set_mode(&self, mode: GameMode) -> AuthorityResult<()> {
        (**self).set_mode(mode).await
    }

    async fn request_ai_move(&self) -> AuthorityResult<BoardSnapshot> {
        (**self).request_ai_move().await
    }
}

/// Authority reached over HTTP
#[derive(Clone, Debug)]
pub struct HttpAuthority {
    client: reqwest::Client,
    base: Url,
}

impl HttpAuthority {
    /// `timeout` bounds every request; `None` waits indefinitely
    pub fn new(base_url: &str, timeout: Option<Duration>) -> AuthorityResult<Self> {
        let mut base = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> AuthorityResult<Self> {
        Self::new(&settings.authority_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> AuthorityResult<Url> {
        Ok(self.base.join(path)?)
    }

    async fn post_empty(&self, path: &str) -> AuthorityResult<reqwest::Response> {
        let url = self.endpoint(path)?;
        debug!("[AUTHORITY] POST {}", url);
        Ok(self.client.post(url).send().await?)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AuthorityResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AuthorityError::protocol(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> AuthorityResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AuthorityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_legal_targets(&self, square: SquareName) -> AuthorityResult<Vec<Coordinate>> {
        let url = self.endpoint(&format!("legal_moves/{square}"))?;
        debug!("[AUTHORITY] GET {}", url);
        let response = Self::check_status(self.client.get(url).send().await?).await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let targets: Option<Vec<Coordinate>> =
            serde_json::from_slice(&bytes).map_err(|e| AuthorityError::protocol(e.to_string()))?;
        Ok(targets.unwrap_or_default())
    }
}

#[async_trait]
impl Authority for HttpAuthority {
    async fn legal_targets(&self, square: SquareName) -> Vec<Coordinate> {
        match self.fetch_legal_targets(square).await {
            Ok(targets) => targets,
            Err(e) => {
                warn!("[AUTHORITY] Legal moves for {} unavailable: {}", square, e);
                Vec::new()
            }
        }
    }

    async fn submit_move(&self, descriptor: &MoveDescriptor) -> AuthorityResult<MoveReply> {
        let url = self.endpoint("move")?;
        debug!("[AUTHORITY] POST {} {}", url, descriptor);
        let response = self
            .client
            .post(url)
            .json(&descriptor.to_request())
            .send()
            .await?;

        match Self::read_json::<MoveResponseDto>(response).await? {
            MoveResponseDto::Snapshot(dto) => Ok(MoveReply::Applied(dto.into_snapshot()?)),
            MoveResponseDto::PromotionNeeded(sentinel) if sentinel.promotion_needed => {
                Ok(MoveReply::PromotionRequired)
            }
            MoveResponseDto::PromotionNeeded(_) => Err(AuthorityError::protocol(
                "move response carried neither a snapshot nor a promotion request",
            )),
        }
    }

    async fn undo_last_move(&self) -> AuthorityResult<BoardSnapshot> {
        let response = self.post_empty("undo").await?;
        Self::read_json::<SnapshotDto>(response).await?.into_snapshot()
    }

    async fn reset_game(&self) -> AuthorityResult<()> {
        let response = self.post_empty("reset").await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn set_mode(&self, mode: GameMode) -> AuthorityResult<()> {
        let url = self.endpoint("set_game_mode")?;
        debug!("[AUTHORITY] POST {} mode={}", url, mode);
        let response = self
            .client
            .post(url)
            .json(&ModeRequest { mode })
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn request_ai_move(&self) -> AuthorityResult<BoardSnapshot> {
        let response = self.post_empty("ai_move").await?;
        Self::read_json::<SnapshotDto>(response).await?.into_snapshot()
    }
}
