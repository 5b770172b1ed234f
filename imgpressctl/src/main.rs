use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imgpress_client::model::{CompressionId, ImageId};
use imgpress_client::{
    ApiClient, AppContext, ClientConfig, HomeView, ImageDetailView, LoginView,
    Outcome, PendingUpload, SkipReason, TokenStorage,
};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Parser)]
#[command(
    name = "imgpressctl",
    version,
    about = "Command-line client for the imgpress image compression service"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session token
    Login {
        #[arg(long)]
        username: String,
        /// Read from IMGPRESS_PASSWORD when omitted
        #[arg(long, env = "IMGPRESS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List, upload, inspect or delete images
    Images {
        #[command(subcommand)]
        action: ImagesAction,
    },
    /// Create or delete compressions of an image
    Compressions {
        #[command(subcommand)]
        action: CompressionsAction,
    },
}

#[derive(Debug, Subcommand)]
enum ImagesAction {
    /// List your images
    List,
    /// Upload an image file
    Upload {
        path: PathBuf,
        /// Display name, defaults to the file name without its extension
        #[arg(long)]
        name: Option<String>,
    },
    /// Show one image with its compressions
    Show { id: String },
    /// Delete an image and its compressions
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum CompressionsAction {
    /// Request a new compression of an image
    Add {
        image_id: String,
        /// JPEG quality from 1 to 100; ignored for other formats
        #[arg(long)]
        quality: Option<u8>,
        /// Target width in pixels, defaults to the original width
        #[arg(long)]
        resize_width: Option<u32>,
    },
    /// Delete a compression
    Delete {
        image_id: String,
        compression_id: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer().with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let config =
        ClientConfig::load().context("failed to load configuration")?;
    debug!("[imgpressctl] Using API at {}", config.api_url);
    let storage: Arc<dyn TokenStorage> = Arc::new(config.token_storage()?);
    let client = Arc::new(ApiClient::new(&config.api_url)?);
    let mut ctx = AppContext::new(client.clone(), storage);

    let success = match cli.command {
        Command::Login { username, password } => {
            debug!("[imgpressctl] Signing in as {}", username);
            let mut view = LoginView::with_credentials(username, password);
            match view.submit(&mut ctx).await {
                Outcome::Done(user) => {
                    println!("Signed in as {}", user.username);
                    true
                }
                other => report(other),
            }
        }
        Command::Logout => {
            debug!("[imgpressctl] Signing out");
            ctx.logout().await;
            println!("Signed out");
            true
        }
        Command::Whoami => {
            if !require_session(&mut ctx).await {
                return Ok(ExitCode::FAILURE);
            }
            if let Some(user) = ctx.session.user() {
                println!("{}", user.username);
            }
            true
        }
        Command::Images { action } => {
            if !require_session(&mut ctx).await {
                return Ok(ExitCode::FAILURE);
            }
            images(&mut ctx, &client, action).await?
        }
        Command::Compressions { action } => {
            if !require_session(&mut ctx).await {
                return Ok(ExitCode::FAILURE);
            }
            compressions(&mut ctx, action).await
        }
    };

    if let Some(toast) = ctx.session.toast() {
        eprintln!("{toast}");
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Validate the persisted token before talking to the service
async fn require_session(ctx: &mut AppContext) -> bool {
    let restored = ctx.restore().await;
    if !restored {
        warn!("[imgpressctl] No usable session");
        eprintln!("{}", render::skip_message(SkipReason::NotAuthenticated));
    }
    restored
}

/// Print why an action did not complete. Failures already carry a toast.
fn report<T>(outcome: Outcome<T>) -> bool {
    match outcome {
        Outcome::Done(_) => true,
        Outcome::Skipped(reason) => {
            eprintln!("{}", render::skip_message(reason));
            false
        }
        Outcome::Failed(_) => false,
    }
}

async fn images(
    ctx: &mut AppContext,
    client: &ApiClient,
    action: ImagesAction,
) -> Result<bool> {
    debug!("[imgpressctl] images {:?}", action);
    let mut home = HomeView::new();

    let ok = match action {
        ImagesAction::List => {
            let loaded = report(home.load(ctx).await);
            if loaded {
                render::print_images(&home);
            }
            loaded
        }
        ImagesAction::Upload { path, name } => {
            let upload = PendingUpload::from_path(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            if !report(home.load(ctx).await) {
                return Ok(false);
            }
            if let Some(message) = home.limit_message() {
                eprintln!("{message}");
                return Ok(false);
            }
            home.file_name =
                name.unwrap_or_else(|| upload.stem().to_string());
            home.select_file(upload);
            match home.upload(ctx).await {
                Outcome::Done(id) => {
                    println!("{id}");
                    true
                }
                other => report(other),
            }
        }
        ImagesAction::Show { id } => {
            let mut view = ImageDetailView::new(id);
            let loaded = report(view.load(ctx).await);
            if loaded {
                let asset_url = view
                    .image()
                    .filter(|image| image.has_signed_url())
                    .map(|image| client.asset_url(&image.signed_url));
                render::print_image_detail(&view, asset_url);
            }
            loaded
        }
        ImagesAction::Delete { id } => {
            if !report(home.load(ctx).await) {
                return Ok(false);
            }
            report(home.delete(ctx, &ImageId::new(id)).await)
        }
    };
    Ok(ok)
}

async fn compressions(
    ctx: &mut AppContext,
    action: CompressionsAction,
) -> bool {
    debug!("[imgpressctl] compressions {:?}", action);
    match action {
        CompressionsAction::Add {
            image_id,
            quality,
            resize_width,
        } => {
            let mut view = ImageDetailView::new(image_id);
            if !report(view.load(ctx).await) {
                return false;
            }
            if let Some(message) = view.limit_message() {
                eprintln!("{message}");
                return false;
            }
            match view.add_compression(ctx, quality, resize_width).await {
                Outcome::Done(id) => {
                    println!("{id}");
                    true
                }
                Outcome::Skipped(SkipReason::MissingInput) => {
                    eprintln!(
                        "The original width is unknown. Pass --resize-width."
                    );
                    false
                }
                other => report(other),
            }
        }
        CompressionsAction::Delete {
            image_id,
            compression_id,
        } => {
            let mut view = ImageDetailView::new(image_id);
            if !report(view.load(ctx).await) {
                return false;
            }
            report(
                view.delete_compression(
                    ctx,
                    &CompressionId::new(compression_id),
                )
                .await,
            )
        }
    }
}
