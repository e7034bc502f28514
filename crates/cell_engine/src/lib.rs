//! Message cell engine: remote image fetching, decoding and the background loader.
mod decode;
mod engine;
mod fetch;
mod types;

pub use decode::{decode_image, DecodeError, MAX_IMAGE_BYTES, MAX_IMAGE_PIXELS};
pub use engine::{FetchHandle, ImageLoader};
pub use fetch::{FetchSettings, ImageFetcher, ReqwestImageFetcher};
pub use types::{
    DecodedImage, FailureKind, FetchError, FetchMetadata, FetchOutput, LoadedImage, LoaderEvent,
    RequestTag,
};
