use super::DataError;

/// Magic number of IDX label files (unsigned byte, one dimension).
pub const LABELS_MAGIC: u32 = 0x0000_0801;

/// Magic number of IDX image files (unsigned byte, three dimensions).
pub const IMAGES_MAGIC: u32 = 0x0000_0803;

/// Decoded IDX image file. Pixels of all images are stored together:
/// `pixels = [image_1][image_2] ... [image_N]`, each image `rows * cols` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Images {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    pub pixels: Box<[u8]>,
}

impl Images {
    pub fn image_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Pixels of every image, one slice per image.
    pub fn iter(&self) -> std::slice::Chunks<'_, u8> {
        self.pixels.chunks(self.image_size().max(1))
    }
}

/// Big-endian reader over an IDX byte stream.
struct IdxReader<'a> {
    bytes: &'a [u8],
}

impl<'a> IdxReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        IdxReader { bytes }
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DataError> {
        if self.bytes.len() < len {
            return Err(DataError::Truncated {
                expected: len,
                got: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn read_u32(&mut self) -> Result<u32, DataError> {
        let mut word = [0u8; 4];
        word.copy_from_slice(self.read_bytes(4)?);
        Ok(u32::from_be_bytes(word))
    }

    fn read_magic(&mut self, expected: u32) -> Result<(), DataError> {
        let got = self.read_u32()?;
        if got != expected {
            return Err(DataError::BadMagic { expected, got });
        }
        Ok(())
    }
}

/// Decodes an IDX label file: magic, item count, then one byte per label.
///
/// # Examples
/// ```
/// # use sgdnnet::mnist::parse_labels;
/// let bytes = [0, 0, 8, 1, 0, 0, 0, 3, 7, 2, 1];
/// assert_eq!(parse_labels(&bytes).unwrap().to_vec(), vec![7u8, 2, 1]);
/// ```
pub fn parse_labels(bytes: &[u8]) -> Result<Box<[u8]>, DataError> {
    let mut reader = IdxReader::new(bytes);
    reader.read_magic(LABELS_MAGIC)?;
    let count = reader.read_u32()? as usize;
    Ok(reader.read_bytes(count)?.into())
}

/// Decodes an IDX image file: magic, item count, rows, cols, then
/// `rows * cols` bytes per image.
pub fn parse_images(bytes: &[u8]) -> Result<Images, DataError> {
    let mut reader = IdxReader::new(bytes);
    reader.read_magic(IMAGES_MAGIC)?;
    let count = reader.read_u32()? as usize;
    let rows = reader.read_u32()? as usize;
    let cols = reader.read_u32()? as usize;
    let bad_header = || DataError::BadHeader { count, rows, cols };

    let image_size = rows.checked_mul(cols).ok_or_else(bad_header)?;
    if count > 0 && image_size == 0 {
        return Err(bad_header());
    }
    let len = count.checked_mul(image_size).ok_or_else(bad_header)?;
    let pixels = reader.read_bytes(len)?.into();
    Ok(Images {
        count,
        rows,
        cols,
        pixels,
    })
}
