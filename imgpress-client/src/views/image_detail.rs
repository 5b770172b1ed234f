use std::sync::Arc;

use imgpress_model::prelude::{
    CompressionId, ImageCompression, ImageId, MAX_COMPRESSIONS_PER_IMAGE,
    NewCompression, Toast, UserImage,
};
use tracing::{debug, warn};

use super::{Outcome, SkipReason, ViewState, with_loading};
use crate::asset;
use crate::context::AppContext;
use crate::error::ViewError;
use crate::store::CollectionStore;

pub const COMPRESSION_LIMIT_MESSAGE: &str =
    "You can only have 10 compressions per image. Please delete some.";
pub const CREATED_MESSAGE: &str = "Compression created!";
pub const DELETED_MESSAGE: &str = "Compression deleted!";

/// One image with its compressions and the new-compression form
#[derive(Debug)]
pub struct ImageDetailView {
    image_id: ImageId,
    image: Option<UserImage>,
    compressions: CollectionStore<ImageCompression>,
    natural_width: Option<u32>,
    state: ViewState<()>,
}

impl ImageDetailView {
    pub fn new(image_id: impl Into<ImageId>) -> Self {
        Self {
            image_id: image_id.into(),
            image: None,
            compressions: CollectionStore::new(),
            natural_width: None,
            state: ViewState::Idle,
        }
    }

    pub fn image_id(&self) -> &ImageId {
        &self.image_id
    }

    pub fn image(&self) -> Option<&UserImage> {
        self.image.as_ref()
    }

    pub fn compressions(&self) -> &CollectionStore<ImageCompression> {
        &self.compressions
    }

    /// Width in pixels of the original asset, once it has been probed
    pub fn natural_width(&self) -> Option<u32> {
        self.natural_width
    }

    pub fn state(&self) -> &ViewState<()> {
        &self.state
    }

    pub fn can_add_compression(&self) -> bool {
        self.image.is_some()
            && self.compressions.len() < MAX_COMPRESSIONS_PER_IMAGE
    }

    pub fn limit_message(&self) -> Option<&'static str> {
        (self.compressions.len() >= MAX_COMPRESSIONS_PER_IMAGE)
            .then_some(COMPRESSION_LIMIT_MESSAGE)
    }

    /// Whether the quality input applies to the loaded image
    pub fn quality_enabled(&self) -> bool {
        self.image.as_ref().is_some_and(UserImage::supports_quality)
    }

    /// Fetch the image, its compressions and, best effort, its natural width
    pub async fn load(&mut self, ctx: &mut AppContext) -> Outcome<usize> {
        if !ctx.session.is_authenticated() {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        }
        let Some(token) = ctx.token().await else {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        };

        self.state = std::mem::take(&mut self.state).begin();
        let service = Arc::clone(&ctx.service);

        let result = with_loading(
            &mut ctx.session,
            service.fetch_image(&self.image_id, &token),
        )
        .await;
        let image = match result {
            Ok(image) => image,
            Err(e) => return self.fail_load(ctx, e.to_string()),
        };

        let result = with_loading(
            &mut ctx.session,
            service.fetch_image_compressions(&self.image_id, &token),
        )
        .await;
        let compressions = match result {
            Ok(compressions) => compressions,
            Err(e) => return self.fail_load(ctx, e.to_string()),
        };

        let total = compressions.len();
        self.compressions.replace_all(
            compressions
                .into_iter()
                .filter(|c| c.belongs_to(&self.image_id)),
        );
        if self.compressions.len() != total {
            warn!(
                "[Image] Discarded {} compressions not belonging to {}",
                total - self.compressions.len(),
                self.image_id
            );
        }

        self.natural_width = self.probe_natural_width(ctx, &image).await;
        self.image = Some(image);
        self.state = std::mem::take(&mut self.state).succeed(());
        Outcome::Done(self.compressions.len())
    }

    async fn probe_natural_width(
        &self,
        ctx: &AppContext,
        image: &UserImage,
    ) -> Option<u32> {
        if !image.has_signed_url() {
            return None;
        }
        let bytes = match ctx.service.fetch_asset(&image.signed_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("[Image] Could not download {}: {}", image.id, e);
                return None;
            }
        };
        match asset::natural_width(&bytes) {
            Ok(width) => {
                debug!("[Image] {} is {}px wide", image.id, width);
                Some(width)
            }
            Err(e) => {
                warn!(
                    "[Image] Could not read dimensions of {}: {}",
                    image.id, e
                );
                None
            }
        }
    }

    /// Validate the form against the loaded image.
    ///
    /// A missing `resize_width` falls back to the natural width.
    pub fn prepare_compression(
        &self,
        quality: Option<u8>,
        resize_width: Option<u32>,
    ) -> Result<Option<NewCompression>, ViewError> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| ViewError::NotLoaded(self.image_id.clone()))?;
        let Some(resize_width) = resize_width.or(self.natural_width) else {
            return Ok(None);
        };
        Ok(Some(NewCompression::validated(
            self.image_id.clone(),
            quality,
            resize_width,
            image.supports_quality(),
            self.natural_width,
        )?))
    }

    /// Ask the server for a new compression of this image
    pub async fn add_compression(
        &mut self,
        ctx: &mut AppContext,
        quality: Option<u8>,
        resize_width: Option<u32>,
    ) -> Outcome<CompressionId> {
        if self.image.is_none() {
            return Outcome::Skipped(SkipReason::NotFound);
        }
        if !self.can_add_compression() {
            return Outcome::Skipped(SkipReason::LimitReached);
        }
        let request = match self.prepare_compression(quality, resize_width) {
            Ok(Some(request)) => request,
            Ok(None) => return Outcome::Skipped(SkipReason::MissingInput),
            Err(e) => return self.fail(ctx, e.to_string()),
        };
        let Some(token) = ctx.token().await else {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        };

        self.state = std::mem::take(&mut self.state).begin();
        let service = Arc::clone(&ctx.service);
        let result = with_loading(
            &mut ctx.session,
            service.add_compression(&request, &token),
        )
        .await;

        match result {
            Ok(compression) => {
                let id = compression.id.clone();
                debug!(
                    "[Image] Created compression {} of {}",
                    id, self.image_id
                );
                self.compressions.add(compression);
                self.state = std::mem::take(&mut self.state).succeed(());
                ctx.session.show_toast(Toast::success(CREATED_MESSAGE));
                Outcome::Done(id)
            }
            Err(e) => self.fail(ctx, e.to_string()),
        }
    }

    pub async fn delete_compression(
        &mut self,
        ctx: &mut AppContext,
        compression_id: &CompressionId,
    ) -> Outcome<CompressionId> {
        if !self.compressions.contains(compression_id) {
            return Outcome::Skipped(SkipReason::NotFound);
        }
        let Some(token) = ctx.token().await else {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        };

        self.state = std::mem::take(&mut self.state).begin();
        let service = Arc::clone(&ctx.service);
        let result = with_loading(
            &mut ctx.session,
            service.delete_compression(&self.image_id, compression_id, &token),
        )
        .await;

        match result {
            Ok(()) => {
                self.compressions.remove_id(compression_id);
                self.state = std::mem::take(&mut self.state).succeed(());
                ctx.session.show_toast(Toast::success(DELETED_MESSAGE));
                Outcome::Done(compression_id.clone())
            }
            Err(e) => self.fail(ctx, e.to_string()),
        }
    }

    pub fn settle(&mut self) {
        self.state = std::mem::take(&mut self.state).settle();
    }

    /// A failed load leaves nothing from an earlier load on screen
    fn fail_load<T>(
        &mut self,
        ctx: &mut AppContext,
        message: String,
    ) -> Outcome<T> {
        self.image = None;
        self.compressions.clear();
        self.natural_width = None;
        self.fail(ctx, message)
    }

    fn fail<T>(
        &mut self,
        ctx: &mut AppContext,
        message: String,
    ) -> Outcome<T> {
        ctx.session.show_toast(Toast::error(message.clone()));
        self.state = std::mem::take(&mut self.state).fail(message.clone());
        Outcome::Failed(message)
    }
}
