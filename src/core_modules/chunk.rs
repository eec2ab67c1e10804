// THEORY:
// The `ImageChunk` is the unit of work for the entire pipeline. It is a "dumb"
// data container representing a rectangular sub-region of the source image,
// carrying everything needed to process it in isolation and to put it back in
// the right place afterwards:
//
// 1.  **Identity**: a sequence number assigned at partition time, in row-major
//     scan order. Workers complete chunks in whatever order the scheduler
//     dictates, so this id is what restores determinism before reassembly.
// 2.  **Geometry**: width, height, channel count and the (offset_x, offset_y)
//     of the chunk's top-left corner in the full image's coordinate space.
// 3.  **Pixels**: an owned, flat byte buffer of exactly
//     width * height * channels bytes. Ownership of the buffer moves with the
//     chunk through every stage (queue -> task -> worker -> sink), so no two
//     threads ever see the same buffer for writing.

/// Number of interleaved color channels per pixel (packed RGB).
pub const CHANNELS: u32 = 3;

/// A rectangular sub-region of the source image with its own pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageChunk {
    /// Sequence number assigned at partition time, row-major scan order.
    pub id: u32,
    /// Width of this chunk in pixels. Edge chunks may be narrower than the
    /// nominal chunk width.
    pub width: u32,
    /// Height of this chunk in pixels. Edge chunks may be shorter than the
    /// nominal chunk height.
    pub height: u32,
    /// Number of interleaved channels per pixel.
    pub channels: u32,
    /// Horizontal offset of the chunk's top-left corner in the full image.
    pub offset_x: u32,
    /// Vertical offset of the chunk's top-left corner in the full image.
    pub offset_y: u32,
    /// Flattened pixel data, exactly `width * height * channels` bytes.
    pub data: Vec<u8>,
}

impl ImageChunk {
    /// Creates a chunk with a zeroed pixel buffer of the exact required size.
    pub fn new(id: u32, width: u32, height: u32, channels: u32, offset_x: u32, offset_y: u32) -> Self {
        Self {
            id,
            width,
            height,
            channels,
            offset_x,
            offset_y,
            data: vec![0u8; width as usize * height as usize * channels as usize],
        }
    }

    /// Inverts every byte of the pixel buffer in place (`v -> 255 - v`).
    ///
    /// This is the pipeline's transform: pure, stateless, and confined to
    /// this chunk's own buffer, so it needs no locking while it runs. It is
    /// an involution: applying it twice restores the original buffer.
    pub fn invert_colors(&mut self) {
        for byte in self.data.iter_mut() {
            *byte = 255 - *byte;
        }
    }

    /// Total number of bytes in the pixel buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the chunk holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of pixels covered by this chunk.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_buffer_matches_geometry() {
        let chunk = ImageChunk::new(0, 7, 5, CHANNELS, 0, 0);
        assert_eq!(chunk.len(), 7 * 5 * 3);
        assert!(chunk.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn invert_twice_restores_original() {
        let mut chunk = ImageChunk::new(3, 4, 4, CHANNELS, 8, 12);
        for (i, byte) in chunk.data.iter_mut().enumerate() {
            *byte = (i % 256) as u8;
        }
        let original = chunk.data.clone();

        chunk.invert_colors();
        assert_ne!(chunk.data, original);
        chunk.invert_colors();
        assert_eq!(chunk.data, original);
    }

    #[test]
    fn invert_maps_every_byte() {
        let mut chunk = ImageChunk::new(0, 2, 1, CHANNELS, 0, 0);
        chunk.data = vec![0, 1, 127, 128, 254, 255];
        chunk.invert_colors();
        assert_eq!(chunk.data, vec![255, 254, 128, 127, 1, 0]);
    }
}
