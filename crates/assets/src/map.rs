use crate::AssetError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Solidity threshold: a cell is a wall when its luminance reaches this.
const SOLID_LUMINANCE: u32 = 128;

/// Content-addressed asset id computed from the image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// A decoded RGBA8 image used both as the map texture and as the cubicmap
/// layout source: bright pixels are solid cells, dark pixels are open floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapImage {
    width: u32,
    height: u32,
    /// Flat RGBA8 pixel data, row-major from the top-left.
    pixels: Vec<u8>,
}

impl MapImage {
    /// Decode an image file into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let decoded = image::open(path)?.into_rgba8();
        let (width, height) = decoded.dimensions();
        tracing::info!(path = %path.display(), width, height, "loaded map image");
        Self::from_rgba8(width, height, decoded.into_raw())
    }

    /// Wrap an existing RGBA8 buffer. Fails when the buffer length does not
    /// match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(AssetError::Dimensions {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A small hardcoded map used when no file is available: a walled
    /// border with a few interior blocks.
    pub fn builtin() -> Self {
        const SIZE: u32 = 16;
        let mut pixels = vec![0u8; (SIZE * SIZE * 4) as usize];
        for y in 0..SIZE {
            for x in 0..SIZE {
                let border = x == 0 || y == 0 || x == SIZE - 1 || y == SIZE - 1;
                let block = (x % 5 == 2) && (y % 4 == 1);
                if border || block {
                    let at = ((y * SIZE + x) * 4) as usize;
                    pixels[at..at + 4].copy_from_slice(&[255, 255, 255, 255]);
                } else {
                    let at = ((y * SIZE + x) * 4) as usize;
                    pixels[at + 3] = 255;
                }
            }
        }
        Self {
            width: SIZE,
            height: SIZE,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major, for texture upload.
    pub fn bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height);
        let at = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[at],
            self.pixels[at + 1],
            self.pixels[at + 2],
            self.pixels[at + 3],
        ]
    }

    /// Whether the cell at (x, y) is a solid wall cell.
    pub fn is_solid(&self, x: u32, y: u32) -> bool {
        let [r, g, b, _] = self.pixel(x, y);
        let luminance = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
        luminance >= SOLID_LUMINANCE
    }

    /// Number of solid cells in the map.
    pub fn solid_count(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_solid(x, y))
            .count()
    }

    /// Flip the image top-to-bottom in place.
    pub fn flip_vertical(&mut self) {
        let row = self.width as usize * 4;
        let (mut top, mut bottom) = (0, self.height as usize - 1);
        while top < bottom {
            let (a, b) = (top * row, bottom * row);
            for i in 0..row {
                self.pixels.swap(a + i, b + i);
            }
            top += 1;
            bottom -= 1;
        }
    }

    /// Content-addressed id over dimensions and pixel data.
    pub fn id(&self) -> AssetId {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.pixels);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        AssetId(u64::from_le_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> MapImage {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        MapImage::from_rgba8(width, height, pixels).unwrap()
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let result = MapImage::from_rgba8(4, 4, vec![0; 10]);
        assert!(matches!(result, Err(AssetError::Dimensions { .. })));
    }

    #[test]
    fn solidity_follows_luminance() {
        let map = checker(4, 4);
        assert!(map.is_solid(0, 0));
        assert!(!map.is_solid(1, 0));
        assert_eq!(map.solid_count(), 8);
    }

    #[test]
    fn flip_vertical_twice_is_identity() {
        let original = checker(5, 3);
        let mut flipped = original.clone();
        flipped.flip_vertical();
        assert_ne!(flipped.pixel(0, 0), original.pixel(0, 0));
        flipped.flip_vertical();
        assert_eq!(flipped, original);
    }

    #[test]
    fn flip_vertical_moves_rows() {
        let mut pixels = vec![0u8; 2 * 2 * 4];
        pixels[0..4].copy_from_slice(&[255, 0, 0, 255]);
        let mut map = MapImage::from_rgba8(2, 2, pixels).unwrap();
        map.flip_vertical();
        assert_eq!(map.pixel(0, 1), [255, 0, 0, 255]);
        assert_eq!(map.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn id_is_content_addressed() {
        let a = checker(4, 4);
        let b = checker(4, 4);
        assert_eq!(a.id(), b.id());

        let c = checker(4, 5);
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn builtin_has_walled_border() {
        let map = MapImage::builtin();
        for x in 0..map.width() {
            assert!(map.is_solid(x, 0));
            assert!(map.is_solid(x, map.height() - 1));
        }
        // Interior is mostly open.
        assert!(map.solid_count() < (map.width() * map.height()) as usize);
        assert!(!map.is_solid(1, 2));
    }
}
