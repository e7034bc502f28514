use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use cell_app::{
    AppConfig, CellPosition, ListContext, MessageCell, StaticDisplayPolicy, CONFIG_FILENAME,
};
use cell_core::{LayoutAttributes, Message, MessageData, Sender};
use cell_engine::ImageLoader;
use cell_logging::cell_info;
use url::Url;

const FETCH_WAIT: Duration = Duration::from_secs(15);
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Configures one cell with a shared-image message and reports what it ends up showing.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(Path::new(CONFIG_FILENAME));
    cell_app::platform::logging::initialize(config.log_destination, config.log_level);

    let mut args = std::env::args().skip(1);
    let raw_url = args
        .next()
        .context("usage: cell_app <image-url> [caption]")?;
    let caption = args.next().unwrap_or_else(|| "Shared image".to_string());
    let image_url = Url::parse(&raw_url).with_context(|| format!("invalid image url {raw_url}"))?;

    let loader = ImageLoader::new(config.fetch.to_settings());
    let mut cell = MessageCell::builder()
        .display_policy(Arc::new(StaticDisplayPolicy::default()))
        .loader(loader)
        .build();

    let message = Message::new(
        "demo-1",
        Sender {
            id: "remote".to_string(),
            display_name: "Remote".to_string(),
        },
        MessageData::ShareImage {
            text: caption,
            thumbnail: None,
            image_url,
        },
    );
    let context = ListContext {
        current_sender_id: "local".to_string(),
    };

    cell.reset();
    cell.apply_layout(LayoutAttributes::default());
    cell.configure(&message, CellPosition::default(), &context);

    let deadline = Instant::now() + FETCH_WAIT;
    while cell.view().fetching && Instant::now() < deadline {
        cell.process_pending();
        thread::sleep(POLL_INTERVAL);
    }

    for command in cell.take_render_commands() {
        println!("{command:?}");
    }

    let view = cell.view();
    match &view.image_view.image {
        Some(image) => {
            cell_info!("Image ready: {}x{}", image.width(), image.height());
            println!("image: {}x{}", image.width(), image.height());
        }
        None if view.fetching => println!("image: still loading after {FETCH_WAIT:?}"),
        None => println!("image: unavailable"),
    }
    println!("caption: {}", view.label.text.unwrap_or_default());
    println!("indicator animating: {}", view.indicator_animating);
    Ok(())
}
