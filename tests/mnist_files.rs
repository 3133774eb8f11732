use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sgdnnet::feedforward::{Network, Trainer};
use sgdnnet::mnist::{self, DataError, Dataset, IMAGES_MAGIC, LABELS_MAGIC};

fn words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Writes a tiny IDX file pair of 2x2 images into a fresh directory.
fn write_dataset(name: &str, dataset: Dataset, labels: &[u8], image_count: u32) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sgdnnet-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let mut label_bytes = words(&[LABELS_MAGIC, labels.len() as u32]);
    label_bytes.extend_from_slice(labels);
    fs::write(dir.join(dataset.labels_file_name()), label_bytes).unwrap();

    let mut image_bytes = words(&[IMAGES_MAGIC, image_count, 2, 2]);
    for i in 0..image_count {
        let bright = (i % 2) as u8 * 255;
        image_bytes.extend_from_slice(&[bright, 255 - bright, bright, 255 - bright]);
    }
    fs::write(dir.join(dataset.images_file_name()), image_bytes).unwrap();

    dir
}

#[test]
fn loads_and_trains_on_idx_files() {
    let labels: Vec<u8> = (0..8).map(|i| (i % 2) as u8).collect();
    let dir = write_dataset("train", Dataset::Train, &labels, 8);

    let samples = mnist::load_normalized::<f64>(&dir, Dataset::Train).unwrap();
    assert_eq!(samples.len(), 8);
    assert_eq!(samples[1].inputs.as_slice(), &[1.0, 0.0, 1.0, 0.0]);
    assert_eq!(samples[1].desired_outputs.len(), mnist::CLASSES);
    assert_eq!(samples[1].desired_outputs.argmax(), Some(1));

    let raw = mnist::load::<f64>(&dir, Dataset::Train).unwrap();
    assert_eq!(raw[0].inputs.as_slice(), &[0.0, 255.0, 0.0, 255.0]);

    let net = Network::<f64>::new(&[4, 5, mnist::CLASSES]).unwrap();
    let trainer = Trainer::new(2, 4, 3.0).unwrap();
    let training = trainer
        .train_with_rng(net, &samples, Some(&samples[..]), &mut ChaCha8Rng::seed_from_u64(4))
        .unwrap();
    assert_eq!(training.reports.len(), 2);
    assert_eq!(training.reports[1].evaluation.map(|e| e.total), Some(8));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn count_mismatch_is_reported() {
    let dir = write_dataset("mismatch", Dataset::T10k, &[1, 2, 3], 2);
    assert!(matches!(
        mnist::load::<f64>(&dir, Dataset::T10k),
        Err(DataError::CountMismatch {
            images: 2,
            labels: 3
        })
    ));
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_images_file_is_reported() {
    let dir = write_dataset("missing", Dataset::Train, &[0], 1);
    fs::remove_file(dir.join(Dataset::Train.images_file_name())).unwrap();
    let err = mnist::load::<f64>(&dir, Dataset::Train).unwrap_err();
    assert!(matches!(err, DataError::NotFound(_)));
    assert!(err.to_string().contains("train-images-idx3-ubyte"));
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn zero_sized_images_are_reported() {
    let dir = std::env::temp_dir().join(format!("sgdnnet-zero-rows-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let mut label_bytes = words(&[LABELS_MAGIC, 3]);
    label_bytes.extend_from_slice(&[1, 2, 3]);
    fs::write(dir.join(Dataset::Train.labels_file_name()), label_bytes).unwrap();
    fs::write(
        dir.join(Dataset::Train.images_file_name()),
        words(&[IMAGES_MAGIC, 3, 0, 28]),
    )
    .unwrap();

    assert!(matches!(
        mnist::load::<f64>(&dir, Dataset::Train),
        Err(DataError::BadHeader {
            count: 3,
            rows: 0,
            cols: 28
        })
    ));
    fs::remove_dir_all(dir).unwrap();
}
