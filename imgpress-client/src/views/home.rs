use std::sync::Arc;

use imgpress_model::prelude::{ImageId, MAX_USER_IMAGES, Toast, UserImage};
use tracing::{debug, warn};

use super::{Outcome, SkipReason, ViewState, with_loading};
use crate::context::AppContext;
use crate::store::CollectionStore;
use crate::upload::{FileDetails, PendingUpload};

pub const IMAGE_LIMIT_TITLE: &str = "Image Limit Reached";
pub const IMAGE_LIMIT_MESSAGE: &str =
    "You can only have 10 images. Please delete some.";
pub const NO_IMAGES_MESSAGE: &str =
    "You have no images. Upload one to start compressing!";
pub const UPLOADED_MESSAGE: &str = "Image uploaded!";
pub const DELETED_MESSAGE: &str = "Image deleted!";

/// Image list with the upload form
#[derive(Debug, Default)]
pub struct HomeView {
    images: CollectionStore<UserImage>,
    state: ViewState<()>,
    /// Display name typed into the upload form
    pub file_name: String,
    selected: Option<PendingUpload>,
}

impl HomeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<()> {
        &self.state
    }

    pub fn images(&self) -> &CollectionStore<UserImage> {
        &self.images
    }

    /// Pick the file to upload next
    pub fn select_file(&mut self, upload: PendingUpload) {
        self.selected = Some(upload);
    }

    pub fn selected_file(&self) -> Option<FileDetails> {
        self.selected.as_ref().map(PendingUpload::details)
    }

    /// The upload form is only offered below the image cap
    pub fn can_upload(&self) -> bool {
        self.images.len() < MAX_USER_IMAGES
    }

    /// Shown in place of the upload form once the cap is reached
    pub fn limit_message(&self) -> Option<&'static str> {
        (!self.can_upload()).then_some(IMAGE_LIMIT_MESSAGE)
    }

    /// Shown in place of the list heading when there is nothing to list
    pub fn empty_message(&self) -> Option<&'static str> {
        self.images.is_empty().then_some(NO_IMAGES_MESSAGE)
    }

    /// Replace the local list with the server's. Needs a signed-in user.
    pub async fn load(&mut self, ctx: &mut AppContext) -> Outcome<usize> {
        if !ctx.session.is_authenticated() {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        }
        let Some(token) = ctx.token().await else {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        };

        self.state = std::mem::take(&mut self.state).begin();
        let service = Arc::clone(&ctx.service);
        let result =
            with_loading(&mut ctx.session, service.fetch_images(&token)).await;

        match result {
            Ok(images) => {
                debug!("[Home] Loaded {} images", images.len());
                self.images.replace_all(images);
                self.state = std::mem::take(&mut self.state).succeed(());
                Outcome::Done(self.images.len())
            }
            Err(e) => self.fail(ctx, e.to_string()),
        }
    }

    /// Upload the selected file under [`Self::file_name`]
    pub async fn upload(&mut self, ctx: &mut AppContext) -> Outcome<ImageId> {
        if !self.can_upload() {
            return Outcome::Skipped(SkipReason::LimitReached);
        }
        let name = self.file_name.trim().to_string();
        let Some(upload) =
            self.selected.as_ref().filter(|_| !name.is_empty())
        else {
            return Outcome::Skipped(SkipReason::MissingInput);
        };
        let Some(token) = ctx.token().await else {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        };

        self.state = std::mem::take(&mut self.state).begin();
        let service = Arc::clone(&ctx.service);
        let result = with_loading(
            &mut ctx.session,
            service.upload_image(upload, &name, &token),
        )
        .await;

        match result {
            Ok(image) => {
                let id = image.id.clone();
                debug!("[Home] Uploaded image {}", id);
                self.images.add(image);
                self.state = std::mem::take(&mut self.state).succeed(());
                ctx.session.show_toast(Toast::success(UPLOADED_MESSAGE));
                Outcome::Done(id)
            }
            Err(e) => self.fail(ctx, e.to_string()),
        }
    }

    /// Delete an image and drop it from the local list once the server agrees
    pub async fn delete(
        &mut self,
        ctx: &mut AppContext,
        image_id: &ImageId,
    ) -> Outcome<ImageId> {
        let Some(token) = ctx.token().await else {
            return Outcome::Skipped(SkipReason::NotAuthenticated);
        };

        self.state = std::mem::take(&mut self.state).begin();
        let service = Arc::clone(&ctx.service);
        let result = with_loading(
            &mut ctx.session,
            service.delete_image(image_id, &token),
        )
        .await;

        match result {
            Ok(()) => {
                if self.images.remove_id(image_id).is_none() {
                    warn!(
                        "[Home] Deleted image {} was not in the local list",
                        image_id
                    );
                }
                self.state = std::mem::take(&mut self.state).succeed(());
                ctx.session.show_toast(Toast::success(DELETED_MESSAGE));
                Outcome::Done(image_id.clone())
            }
            Err(e) => self.fail(ctx, e.to_string()),
        }
    }

    /// Clear a stale error once its toast is gone
    pub fn settle(&mut self) {
        self.state = std::mem::take(&mut self.state).settle();
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
