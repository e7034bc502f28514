use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use cell_app::{
    AnimationHook, CellDelegate, CellError, CellPosition, DisplayPolicy, ListContext, MessageCell,
    RenderCommand,
};
use cell_core::{
    Color, DetectorKind, ImageHandle, ImageView, Message, MessageData, Sender, StyleAttributes,
};
use cell_engine::{FailureKind, FetchError, FetchMetadata, FetchOutput, ImageFetcher, ImageLoader};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use url::Url;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn png(rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(2, 2, Rgba(rgba));
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

enum Route {
    Image { rgba: [u8; 4], delay: Duration },
    Fail { delay: Duration },
}

/// Fetcher answering from a fixed route table; counts fetches that ran to the end.
#[derive(Default)]
struct ScriptedFetcher {
    routes: HashMap<String, Route>,
    finished: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    fn image(mut self, url: &str, rgba: [u8; 4], delay_ms: u64) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Image {
                rgba,
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    fn failing(mut self, url: &str, delay_ms: u64) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Fail {
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }
}

#[async_trait::async_trait]
impl ImageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let result = match self.routes.get(url) {
            Some(Route::Image { rgba, delay }) => {
                tokio::time::sleep(*delay).await;
                let bytes = png(*rgba);
                Ok(FetchOutput {
                    metadata: FetchMetadata {
                        original_url: url.to_string(),
                        final_url: url.to_string(),
                        redirect_count: 0,
                        content_type: Some("image/png".to_string()),
                        byte_len: bytes.len() as u64,
                    },
                    bytes,
                })
            }
            Some(Route::Fail { delay }) => {
                tokio::time::sleep(*delay).await;
                Err(FetchError {
                    kind: FailureKind::Network,
                    message: "connection reset".to_string(),
                })
            }
            None => Err(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: "404 Not Found".to_string(),
            }),
        };
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// Policy that hands out a hook recording the size of every image it sees.
#[derive(Default)]
struct RecordingPolicy {
    hook_calls: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl DisplayPolicy for RecordingPolicy {
    fn text_color(&self, _: &Message, _: CellPosition, _: &ListContext) -> Color {
        Color::WHITE
    }

    fn enabled_detectors(
        &self,
        _: &Message,
        _: CellPosition,
        _: &ListContext,
    ) -> BTreeSet<DetectorKind> {
        BTreeSet::from([DetectorKind::Url])
    }

    fn detector_attributes(
        &self,
        _: DetectorKind,
        _: &Message,
        _: CellPosition,
    ) -> StyleAttributes {
        StyleAttributes {
            foreground: Some(Color::LINK_BLUE),
            underline: true,
            bold: false,
        }
    }

    fn animation_hook(
        &self,
        _: &Message,
        _: CellPosition,
        _: &ListContext,
    ) -> Option<AnimationHook> {
        let calls = self.hook_calls.clone();
        Some(Box::new(move |view: &ImageView| {
            if let Some(image) = &view.image {
                calls.lock().unwrap().push((image.width(), image.height()));
            }
        }))
    }
}

fn sender() -> Sender {
    Sender {
        id: "carol".to_string(),
        display_name: "Carol".to_string(),
    }
}

fn share_image(caption: &str, url: &str) -> Message {
    Message::new(
        format!("share-{caption}"),
        sender(),
        MessageData::ShareImage {
            text: caption.to_string(),
            thumbnail: None,
            image_url: Url::parse(url).unwrap(),
        },
    )
}

fn build_cell(fetcher: ScriptedFetcher) -> (MessageCell, Arc<Mutex<Vec<(u32, u32)>>>) {
    cell_logging::initialize_for_tests();
    let policy = RecordingPolicy::default();
    let calls = policy.hook_calls.clone();
    let cell = MessageCell::builder()
        .display_policy(Arc::new(policy))
        .loader(ImageLoader::with_fetcher(Arc::new(fetcher)))
        .build();
    (cell, calls)
}

fn configure(cell: &mut MessageCell, message: &Message) {
    cell.configure(message, CellPosition { section: 0, item: 3 }, &ListContext::default());
}

fn pump_until(cell: &mut MessageCell, mut done: impl FnMut(&MessageCell) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        cell.process_pending();
        if done(cell) {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

fn pump_for(cell: &mut MessageCell, duration: Duration) {
    let deadline = Instant::now() + duration;
    while Instant::now() < deadline {
        cell.process_pending();
        thread::sleep(Duration::from_millis(10));
    }
}

fn first_pixel(cell: &MessageCell) -> Option<[u8; 4]> {
    cell.view()
        .image_view
        .image
        .map(|image| image.pixels()[..4].try_into().unwrap())
}

#[test]
fn image_text_shows_local_image_without_fetching() {
    let (mut cell, hook_calls) = build_cell(ScriptedFetcher::default());
    let local = ImageHandle::solid(3, 3, RED);
    let message = Message::new(
        "local",
        sender(),
        MessageData::ImageText {
            text: "hello".to_string(),
            image: local.clone(),
        },
    );

    configure(&mut cell, &message);

    let view = cell.view();
    assert_eq!(view.label.text.as_deref(), Some("hello"));
    assert_eq!(view.image_view.image, Some(local));
    assert_eq!(cell.in_flight_fetches(), 0);
    assert!(view.indicator_animating);
    assert!(hook_calls.lock().unwrap().is_empty());
    assert!(cell
        .take_render_commands()
        .contains(&RenderCommand::StartIndicator));
}

#[test]
fn shared_image_loads_and_runs_hook() {
    let fetcher = ScriptedFetcher::default().image("http://x/img.png", BLUE, 10);
    let (mut cell, hook_calls) = build_cell(fetcher);

    configure(&mut cell, &share_image("caption", "http://x/img.png"));
    assert_eq!(cell.view().label.text.as_deref(), Some("caption"));
    assert_eq!(cell.in_flight_fetches(), 1);
    cell.take_render_commands();

    assert!(pump_until(&mut cell, |c| c.view().image_view.image.is_some()));

    let view = cell.view();
    assert_eq!(first_pixel(&cell), Some(BLUE));
    assert!(!view.indicator_animating);
    assert!(!view.fetching);
    assert_eq!(cell.in_flight_fetches(), 0);
    assert_eq!(*hook_calls.lock().unwrap(), vec![(2, 2)]);

    let commands = cell.take_render_commands();
    assert!(commands.contains(&RenderCommand::StopIndicator));
    assert!(commands
        .iter()
        .any(|c| matches!(c, RenderCommand::SetImage { image: Some(_), .. })));
}

#[test]
fn reset_before_completion_keeps_cell_empty_and_aborts_fetch() {
    let fetcher = ScriptedFetcher::default().image("http://x/slow.png", RED, 200);
    let finished = fetcher.finished.clone();
    let (mut cell, hook_calls) = build_cell(fetcher);

    configure(&mut cell, &share_image("caption", "http://x/slow.png"));
    cell.reset();
    assert_eq!(cell.in_flight_fetches(), 0);

    pump_for(&mut cell, Duration::from_millis(400));

    let view = cell.view();
    assert_eq!(view.label.text, None);
    assert_eq!(view.image_view.image, None);
    assert_eq!(view.active_fetch, None);
    assert!(!view.indicator_animating);
    assert!(hook_calls.lock().unwrap().is_empty());
    assert_eq!(finished.load(Ordering::SeqCst), 0);
}

#[test]
fn late_completion_from_previous_message_never_replaces_new_image() {
    let fetcher = ScriptedFetcher::default()
        .image("http://x/a.png", RED, 250)
        .image("http://x/b.png", BLUE, 10);
    let (mut cell, hook_calls) = build_cell(fetcher);

    configure(&mut cell, &share_image("A", "http://x/a.png"));
    cell.reset();
    configure(&mut cell, &share_image("B", "http://x/b.png"));

    assert!(pump_until(&mut cell, |c| c.view().image_view.image.is_some()));
    assert_eq!(first_pixel(&cell), Some(BLUE));

    pump_for(&mut cell, Duration::from_millis(400));
    assert_eq!(first_pixel(&cell), Some(BLUE));
    assert_eq!(cell.view().label.text.as_deref(), Some("B"));
    assert_eq!(hook_calls.lock().unwrap().len(), 1);
}

#[test]
fn reconfigure_without_reset_also_drops_the_old_fetch() {
    let fetcher = ScriptedFetcher::default()
        .image("http://x/a.png", RED, 200)
        .image("http://x/b.png", BLUE, 200);
    let (mut cell, _) = build_cell(fetcher);

    configure(&mut cell, &share_image("A", "http://x/a.png"));
    let first = cell.view().active_fetch.unwrap();
    configure(&mut cell, &share_image("B", "http://x/b.png"));
    let second = cell.view().active_fetch.unwrap();

    assert_ne!(first, second);
    assert_eq!(cell.in_flight_fetches(), 1);
    assert!(pump_until(&mut cell, |c| c.view().image_view.image.is_some()));
    assert_eq!(first_pixel(&cell), Some(BLUE));
}

#[test]
fn failed_fetch_keeps_caption_and_no_image() {
    let fetcher = ScriptedFetcher::default().failing("http://x/broken.png", 5);
    let (mut cell, hook_calls) = build_cell(fetcher);

    configure(&mut cell, &share_image("caption", "http://x/broken.png"));
    assert!(pump_until(&mut cell, |c| !c.view().fetching));

    let view = cell.view();
    assert_eq!(view.label.text.as_deref(), Some("caption"));
    assert_eq!(view.image_view.image, None);
    assert!(view.indicator_animating);
    assert!(hook_calls.lock().unwrap().is_empty());
    assert_eq!(cell.in_flight_fetches(), 0);
}

#[test]
fn text_color_is_rendered_after_detector_attributes() {
    let (mut cell, _) = build_cell(ScriptedFetcher::default());
    configure(&mut cell, &share_image("see https://a.example", "http://x/none.png"));

    let commands = cell.take_render_commands();
    let attrs_at = commands
        .iter()
        .position(|c| matches!(c, RenderCommand::SetDetectorAttributes { .. }))
        .unwrap();
    let color_at = commands
        .iter()
        .position(|c| matches!(c, RenderCommand::SetTextColor(_)))
        .unwrap();
    assert!(attrs_at < color_at);
    assert_eq!(
        cell.view().label.detector_attributes[&DetectorKind::Url].foreground,
        Some(Color::WHITE)
    );
}

#[test]
fn building_without_policy_is_reported() {
    cell_logging::initialize_for_tests();
    let result = MessageCell::builder()
        .loader(ImageLoader::with_fetcher(Arc::new(ScriptedFetcher::default())))
        .try_build();
    assert!(matches!(result, Err(CellError::MissingDisplayPolicy)));
}

#[test]
#[should_panic(expected = "display policy")]
fn building_without_policy_panics() {
    let _ = MessageCell::builder()
        .loader(ImageLoader::with_fetcher(Arc::new(ScriptedFetcher::default())))
        .build();
}

#[derive(Default)]
struct TapRecorder {
    taps: Mutex<Vec<(DetectorKind, String)>>,
}

impl CellDelegate for TapRecorder {
    fn did_select_detector(&self, detector: DetectorKind, matched_text: &str) {
        self.taps
            .lock()
            .unwrap()
            .push((detector, matched_text.to_string()));
    }
}

#[test]
fn detector_taps_are_forwarded_to_delegate() {
    let (mut cell, _) = build_cell(ScriptedFetcher::default());
    let recorder = Arc::new(TapRecorder::default());
    cell.set_delegate(Some(recorder.clone()));
    configure(
        &mut cell,
        &Message::new(
            "t",
            sender(),
            MessageData::ImageText {
                text: "https://a.example".to_string(),
                image: ImageHandle::solid(1, 1, RED),
            },
        ),
    );

    assert!(cell.label_did_select(DetectorKind::Url, "https://a.example"));
    assert!(!cell.label_did_select(DetectorKind::PhoneNumber, "555-0100"));
    assert_eq!(
        *recorder.taps.lock().unwrap(),
        vec![(DetectorKind::Url, "https://a.example".to_string())]
    );

    cell.reset();
    assert!(!cell.label_did_select(DetectorKind::Url, "https://a.example"));
}

#[test]
fn reuse_identifier_is_stable() {
    let (cell, _) = build_cell(ScriptedFetcher::default());
    assert_eq!(cell.reuse_identifier(), "messagekit.cell.imagetext");
}
