//! Plain-text rendering of view state for the terminal

use imgpress_client::model::prelude::{
    ImageCompression, UserImage, display_server_timestamp,
};
use imgpress_client::{CollectionStore, HomeView, ImageDetailView, SkipReason};

pub fn skip_message(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotAuthenticated => {
            "Not signed in. Run `imgpressctl login` first."
        }
        SkipReason::MissingInput => "Missing input for this command.",
        SkipReason::LimitReached => "Limit reached. Delete something first.",
        SkipReason::NotFound => "Not found.",
    }
}

pub fn print_images(home: &HomeView) {
    if let Some(message) = home.empty_message() {
        println!("{message}");
        return;
    }
    for image in home.images().iter() {
        print_image_line(image);
    }
    if let Some(message) = home.limit_message() {
        println!();
        println!("{message}");
    }
}

fn print_image_line(image: &UserImage) {
    println!(
        "{}\t{}\t{}\t{} bytes\t{}\t{}",
        image.id,
        image.name,
        image.format().mime_type(),
        image.size,
        display_server_timestamp(&image.uploaded_at),
        image.compressions_label(),
    );
}

pub fn print_image_detail(view: &ImageDetailView, asset_url: Option<String>) {
    let Some(image) = view.image() else {
        return;
    };
    println!("id:        {}", image.id);
    println!("name:      {}", image.name);
    println!("type:      {}", image.format().mime_type());
    println!("size:      {} bytes", image.size);
    println!("uploaded:  {}", display_server_timestamp(&image.uploaded_at));
    if let Some(width) = view.natural_width() {
        println!("width:     {width}px");
    }
    if let Some(url) = asset_url {
        println!("url:       {url}");
    }
    println!("{}", image.compressions_label());

    print_compressions(view.compressions());
    if let Some(message) = view.limit_message() {
        println!();
        println!("{message}");
    }
}

fn print_compressions(compressions: &CollectionStore<ImageCompression>) {
    for compression in compressions.iter() {
        println!(
            "  {}\tquality {}\twidth {}px\t{} bytes\t{}",
            compression.id,
            compression.quality,
            compression.resize_width,
            compression.size,
            display_server_timestamp(&compression.created_at),
        );
    }
}
