use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CarouselError {
    #[error("carousel track has no cards")]
    EmptyTrack,
    #[error("unknown carousel: {0}")]
    UnknownCarousel(String),
    #[error("slot {index} out of range (track length {len})")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("dot {index} out of range ({count} dots)")]
    DotOutOfRange { index: usize, count: usize },
}
