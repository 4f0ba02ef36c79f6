mod image_fetch_port;
mod photo_search_port;

pub use image_fetch_port::ImageFetchPort;
pub use photo_search_port::PhotoSearchPort;

#[cfg(test)]
pub mod mocks {
    pub use super::image_fetch_port::mock::MockImageFetch;
    pub use super::photo_search_port::mock::MockPhotoSearch;
}
