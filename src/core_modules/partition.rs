// THEORY:
// The partition module is the bridge between the flat image buffer and the
// chunk-based processing paradigm. `partition` slices the image along a fixed
// stride grid anchored at (0,0); `reassemble` is its inverse, rebuilding one
// flat buffer from the processed chunks using their recorded offsets.
//
// Key properties of the grid:
// 1.  **Exact coverage**: chunk widths and heights are clamped at the right
//     and bottom edges, so the chunks tile the image with no overlap and no
//     gap. Every pixel belongs to exactly one chunk.
// 2.  **Stable identity**: ids are a zero-based counter incremented once per
//     chunk in row-major scan order. Workers return chunks in arbitrary
//     order; sorting by id before reassembly restores the original layout.
//
// `reassemble` itself only trusts offsets, but it refuses to build an image
// from a chunk set whose combined area does not match the target dimensions.
// A missing or duplicated chunk fails loudly here instead of producing a
// silently corrupted output.

use thiserror::Error;

use crate::core_modules::chunk::{CHANNELS, ImageChunk};

/// The chunk set handed to [`reassemble`] does not tile the target image.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("chunk set covers {covered} pixels, expected {expected}")]
pub struct CoverageError {
    pub covered: u64,
    pub expected: u64,
}

/// Splits a packed pixel buffer into a covering set of non-overlapping
/// chunks, at most `chunk_width` x `chunk_height` each, in row-major order.
pub fn partition(
    pixels: &[u8],
    image_width: u32,
    image_height: u32,
    chunk_width: u32,
    chunk_height: u32,
) -> Vec<ImageChunk> {
    let mut chunks = Vec::new();
    let mut chunk_id = 0u32;

    let mut y = 0;
    while y < image_height {
        let mut x = 0;
        while x < image_width {
            let actual_width = chunk_width.min(image_width - x);
            let actual_height = chunk_height.min(image_height - y);

            let row_bytes = (actual_width * CHANNELS) as usize;
            let mut chunk = ImageChunk::new(chunk_id, actual_width, actual_height, CHANNELS, x, y);
            for cy in 0..actual_height {
                let src_start =
                    ((y + cy) as usize * image_width as usize + x as usize) * CHANNELS as usize;
                let dst_start = cy as usize * row_bytes;
                chunk.data[dst_start..dst_start + row_bytes]
                    .copy_from_slice(&pixels[src_start..src_start + row_bytes]);
            }

            chunks.push(chunk);
            chunk_id += 1;
            x += chunk_width;
        }
        y += chunk_height;
    }

    chunks
}

/// Recombines processed chunks into one flat pixel buffer of
/// `total_width` x `total_height` pixels, placing each chunk at its
/// recorded offset.
pub fn reassemble(
    chunks: &[ImageChunk],
    total_width: u32,
    total_height: u32,
) -> Result<Vec<u8>, CoverageError> {
    let expected = total_width as u64 * total_height as u64;
    let covered: u64 = chunks.iter().map(ImageChunk::pixel_count).sum();
    if covered != expected {
        return Err(CoverageError { covered, expected });
    }

    let mut image =
        vec![0u8; total_width as usize * total_height as usize * CHANNELS as usize];
    for chunk in chunks {
        let row_bytes = (chunk.width * chunk.channels) as usize;
        for cy in 0..chunk.height {
            let src_start = cy as usize * row_bytes;
            let dst_start = ((chunk.offset_y + cy) as usize * total_width as usize
                + chunk.offset_x as usize)
                * CHANNELS as usize;
            image[dst_start..dst_start + row_bytes]
                .copy_from_slice(&chunk.data[src_start..src_start + row_bytes]);
        }
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> Vec<u8> {
        (0..width * height * CHANNELS).map(|i| (i % 256) as u8).collect()
    }

    #[test]
    fn chunks_exactly_cover_the_image() {
        // 10x7 with 4x3 chunks forces clamped chunks on both edges.
        let image = gradient_image(10, 7);
        let chunks = partition(&image, 10, 7, 4, 3);

        assert_eq!(chunks.len(), 9);
        let covered: u64 = chunks.iter().map(ImageChunk::pixel_count).sum();
        assert_eq!(covered, 70);

        for chunk in &chunks {
            assert!(chunk.offset_x + chunk.width <= 10);
            assert!(chunk.offset_y + chunk.height <= 7);
            assert_eq!(chunk.len(), (chunk.width * chunk.height * CHANNELS) as usize);
        }
    }

    #[test]
    fn edge_chunks_are_clamped_never_enlarged() {
        let image = gradient_image(10, 7);
        let chunks = partition(&image, 10, 7, 4, 3);

        let bottom_right = chunks.last().expect("partition produced no chunks");
        assert_eq!(bottom_right.offset_x, 8);
        assert_eq!(bottom_right.offset_y, 6);
        assert_eq!(bottom_right.width, 2);
        assert_eq!(bottom_right.height, 1);
    }

    #[test]
    fn ids_are_monotonic_in_row_major_order() {
        let image = gradient_image(8, 8);
        let chunks = partition(&image, 8, 8, 4, 4);

        let ids: Vec<u32> = chunks.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        // Row-major: the second chunk sits to the right of the first, the
        // third starts the next chunk row.
        assert_eq!((chunks[1].offset_x, chunks[1].offset_y), (4, 0));
        assert_eq!((chunks[2].offset_x, chunks[2].offset_y), (0, 4));
    }

    #[test]
    fn partition_then_reassemble_is_identity() {
        let image = gradient_image(13, 9);
        let chunks = partition(&image, 13, 9, 5, 4);
        let rebuilt = reassemble(&chunks, 13, 9).expect("full chunk set reassembles");
        assert_eq!(rebuilt, image);
    }

    #[test]
    fn reassemble_is_order_independent() {
        let image = gradient_image(8, 6);
        let mut chunks = partition(&image, 8, 6, 3, 3);
        chunks.reverse();
        let rebuilt = reassemble(&chunks, 8, 6).expect("full chunk set reassembles");
        assert_eq!(rebuilt, image);
    }

    #[test]
    fn reassemble_rejects_incomplete_chunk_sets() {
        let image = gradient_image(8, 8);
        let mut chunks = partition(&image, 8, 8, 4, 4);
        chunks.pop();

        let err = reassemble(&chunks, 8, 8).expect_err("missing chunk must be detected");
        assert_eq!(err, CoverageError { covered: 48, expected: 64 });
    }
}
