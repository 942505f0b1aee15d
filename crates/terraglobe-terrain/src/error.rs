//! Terrain error types.

/// Errors produced while decoding images, building height fields, or exporting them.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// The input bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// The decoded image has a zero width or height.
    #[error("image has no pixels")]
    EmptyImage,

    /// A pixel buffer does not match its declared dimensions.
    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    ImageSize {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Actual buffer length in bytes.
        len: usize,
    },

    /// A height value buffer does not match its declared dimensions.
    #[error("height buffer of {len} values does not match {width}x{height}")]
    FieldSize {
        /// Declared width in samples.
        width: u32,
        /// Declared height in samples.
        height: u32,
        /// Actual number of values.
        len: usize,
    },

    /// Encoding or writing a heightmap failed.
    #[error("failed to export heightmap: {0}")]
    Export(#[source] image::ImageError),
}
