use std::time::Duration;

/// Images a single user may keep at once.
pub const MAX_USER_IMAGES: usize = 10;

/// Compressions a single image may carry at once.
pub const MAX_COMPRESSIONS_PER_IMAGE: usize = 10;

/// How long a toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Quality sent for compressions when the caller does not pick one.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;
