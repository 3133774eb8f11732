//! MNIST handwritten digits, read from IDX files

mod idx;

pub use idx::*;

use std::io;
use std::path::{Path, PathBuf};
use std::{fmt, fs};

use thiserror::Error;
use tracing::info;

use crate::algebra::{Field, Vector};
use crate::feedforward::Sample;

/// Number of digit classes.
pub const CLASSES: usize = 10;

/// Named MNIST file pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// 60 000 training samples.
    Train,
    /// 10 000 held-out test samples.
    T10k,
}

impl Dataset {
    pub fn labels_file_name(self) -> &'static str {
        match self {
            Dataset::Train => "train-labels-idx1-ubyte",
            Dataset::T10k => "t10k-labels-idx1-ubyte",
        }
    }

    pub fn images_file_name(self) -> &'static str {
        match self {
            Dataset::Train => "train-images-idx3-ubyte",
            Dataset::T10k => "t10k-images-idx3-ubyte",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dataset::Train => write!(f, "train"),
            Dataset::T10k => write!(f, "t10k"),
        }
    }
}

/// Encodes `label` as a vector of `classes` values, one at `label` and zero elsewhere.
///
/// # Examples
/// ```
/// # use sgdnnet::algebra::Vector;
/// # use sgdnnet::mnist::one_hot;
/// let v: Vector<f64> = one_hot(2, 4).unwrap();
/// assert_eq!(v, Vector::new(vec![0.0, 0.0, 1.0, 0.0]));
/// ```
pub fn one_hot<T: Field>(label: u8, classes: usize) -> Result<Vector<T>, DataError> {
    let index = label as usize;
    if index >= classes {
        return Err(DataError::BadLabel { label, classes });
    }
    let mut values = vec![T::zero(); classes];
    values[index] = T::one();
    Ok(Vector::new(values))
}

/// Pairs decoded images with their labels.
///
/// Pixels are coerced into the field as is, or divided by 255 if `normalize` is set.
pub fn to_samples<T: Field>(
    images: &Images,
    labels: &[u8],
    normalize: bool,
) -> Result<Vec<Sample<T>>, DataError> {
    if images.count != labels.len() {
        return Err(DataError::CountMismatch {
            images: images.count,
            labels: labels.len(),
        });
    }

    images
        .iter()
        .zip(labels.iter())
        .map(|(pixels, &label)| {
            let inputs = pixels
                .iter()
                .map(|&p| {
                    let value = T::from_count(p as usize);
                    if normalize {
                        value.div_count(255)
                    } else {
                        value
                    }
                })
                .collect();
            Ok::<_, DataError>(Sample::new(Vector::new(inputs), one_hot(label, CLASSES)?))
        })
        .collect()
}

fn read_file(path: PathBuf) -> Result<Vec<u8>, DataError> {
    fs::read(&path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DataError::NotFound(path),
        _ => DataError::Io { path, source },
    })
}

fn load_samples<T: Field>(
    dir: &Path,
    dataset: Dataset,
    normalize: bool,
) -> Result<Vec<Sample<T>>, DataError> {
    let labels = parse_labels(&read_file(dir.join(dataset.labels_file_name()))?)?;
    let images = parse_images(&read_file(dir.join(dataset.images_file_name()))?)?;
    let samples = to_samples(&images, &labels, normalize)?;

    info!(
        %dataset,
        count = samples.len(),
        rows = images.rows,
        cols = images.cols,
        "Loaded dataset"
    );
    Ok(samples)
}

/// Reads `dataset` from the IDX files in `dir`, keeping raw pixel values.
///
/// # Returns
/// * `Ok(Vec<Sample>)` with `rows * cols` inputs and a one-hot desired output
/// of `CLASSES` values per sample;
/// * `Err(DataError)` if a file is missing or malformed, or if image and label
/// counts disagree.
pub fn load<T: Field>(dir: &Path, dataset: Dataset) -> Result<Vec<Sample<T>>, DataError> {
    load_samples(dir, dataset, false)
}

/// Same as `load`, with pixel values scaled into `[0, 1]`.
pub fn load_normalized<T: Field>(
    dir: &Path,
    dataset: Dataset,
) -> Result<Vec<Sample<T>>, DataError> {
    load_samples(dir, dataset, true)
}

/// Error structure for dataset loading
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data file {} does not exist!", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Expected magic number {expected:#010x}, but got {got:#010x}!")]
    BadMagic { expected: u32, got: u32 },
    #[error("Expected {expected} more byte(s), but got {got}!")]
    Truncated { expected: usize, got: usize },
    #[error("Header of {count} image(s) of {rows}x{cols} pixels does not describe a payload!")]
    BadHeader {
        count: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Got {images} image(s), but {labels} label(s)!")]
    CountMismatch { images: usize, labels: usize },
    #[error("Label {label} does not fit into {classes} classes!")]
    BadLabel { label: u8, classes: usize },
}
