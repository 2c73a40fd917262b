//! Reader for the IDX binary format used by MNIST and its derivatives.
//!
//! An IDX file starts with two zero bytes, a dtype byte (only `0x08`, u8, is
//! supported) and a dimension count, followed by one big-endian `u32` per
//! dimension and then the row-major payload. Images are IDX3
//! (`count x rows x cols`), labels IDX1 (`count`).

use std::fs;
use std::path::Path;

use log::{error, info};

use crate::error::{NetError, Result};
use crate::math::Vector;

use super::dataset::{Dataset, DatasetEntry};

const DTYPE_U8: u8 = 0x08;

/// Parses the header of an u8 IDX file with `dims` dimensions. Returns the
/// dimension sizes and the payload that follows the header.
fn read_header<'b>(bytes: &'b [u8], dims: usize, what: &str) -> Result<(Vec<usize>, &'b [u8])> {
    let header_len = 4 + 4 * dims;
    if bytes.len() < header_len {
        return Err(NetError::InvalidIdx(format!(
            "{what} file too short: {} bytes, header alone needs {header_len}",
            bytes.len()
        )));
    }
    if bytes[0] != 0 || bytes[1] != 0 {
        return Err(NetError::InvalidIdx(format!(
            "{what} file: reserved bytes are 0x{:02X} 0x{:02X}, expected zeros",
            bytes[0], bytes[1]
        )));
    }
    if bytes[2] != DTYPE_U8 {
        return Err(NetError::InvalidIdx(format!(
            "{what} file: dtype 0x{:02X} is not u8",
            bytes[2]
        )));
    }
    if bytes[3] as usize != dims {
        return Err(NetError::InvalidIdx(format!(
            "{what} file has {} dimensions, expected {dims}",
            bytes[3]
        )));
    }

    let sizes: Vec<usize> = bytes[4..header_len]
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]) as usize)
        .collect();
    let payload_len = sizes
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| NetError::InvalidIdx(format!("{what} file: payload size overflows")))?;

    let payload = &bytes[header_len..];
    if payload.len() < payload_len {
        return Err(NetError::InvalidIdx(format!(
            "{what} file truncated: header declares {payload_len} payload bytes, found {}",
            payload.len()
        )));
    }
    Ok((sizes, &payload[..payload_len]))
}

/// Builds a dataset from an IDX3 image file and an IDX1 label file.
///
/// Pixels are scaled to `[0, 1]`; labels become one-hot vectors of length
/// `n_classes`.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
    if n_classes < 2 {
        return Err(NetError::InvalidConfig(format!(
            "n_classes must be at least 2, got {n_classes}"
        )));
    }

    let (image_dims, pixels) = read_header(image_bytes, 3, "image")?;
    let (label_dims, labels) = read_header(label_bytes, 1, "label")?;

    let (n_items, rows, cols) = (image_dims[0], image_dims[1], image_dims[2]);
    if label_dims[0] != n_items {
        return Err(NetError::InvalidIdx(format!(
            "image file holds {n_items} items but label file holds {}",
            label_dims[0]
        )));
    }

    let n_pixels = rows * cols;
    let mut dataset = Dataset::default();
    for (i, &label) in labels.iter().enumerate() {
        let class = label as usize;
        if class >= n_classes {
            return Err(NetError::InvalidIdx(format!(
                "label {i} is class {class}, outside 0..{n_classes}"
            )));
        }
        let image: Vector = pixels[i * n_pixels..(i + 1) * n_pixels]
            .iter()
            .map(|&px| px as f64 / 255.0)
            .collect();
        let mut one_hot = Vector::zeros(n_classes);
        one_hot[class] = 1.0;
        dataset.push(DatasetEntry {
            input: image,
            ground_truth: one_hot,
        });
    }
    Ok(dataset)
}

/// Reads and parses an image/label file pair.
///
/// Failures are logged and yield an empty dataset, so callers must check
/// `is_empty()` before training.
pub fn load_idx_pair<P: AsRef<Path>, Q: AsRef<Path>>(
    image_path: P,
    label_path: Q,
    n_classes: usize,
) -> Dataset {
    let (image_path, label_path) = (image_path.as_ref(), label_path.as_ref());
    let result = fs::read(image_path)
        .and_then(|images| fs::read(label_path).map(|labels| (images, labels)))
        .map_err(NetError::from)
        .and_then(|(images, labels)| parse_idx_pair(&images, &labels, n_classes));

    match result {
        Ok(dataset) => {
            info!(
                "loaded {} samples from {} / {}",
                dataset.len(),
                image_path.display(),
                label_path.display()
            );
            dataset
        }
        Err(e) => {
            error!(
                "can't load {} / {}: {e}",
                image_path.display(),
                label_path.display()
            );
            Dataset::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, DTYPE_U8, 3];
        for v in [n, rows, cols] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn labels(values: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, DTYPE_U8, 1];
        bytes.extend_from_slice(&(values.len() as u32).to_be_bytes());
        bytes.extend_from_slice(values);
        bytes
    }

    #[test]
    fn parses_images_and_one_hot_labels() {
        let ds = parse_idx_pair(&images(2, 1, 2, &[0, 255, 51, 0]), &labels(&[1, 2]), 3).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].input.as_slice(), &[0.0, 1.0]);
        assert_eq!(ds[1].input.as_slice(), &[0.2, 0.0]);
        assert_eq!(ds[0].ground_truth.as_slice(), &[0.0, 1.0, 0.0]);
        assert_eq!(ds[1].ground_truth.as_slice(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_truncated_images() {
        let err = parse_idx_pair(&images(2, 2, 2, &[0; 5]), &labels(&[0, 1]), 2).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn rejects_count_mismatch() {
        assert!(parse_idx_pair(&images(1, 1, 1, &[0]), &labels(&[0, 1]), 2).is_err());
    }

    #[test]
    fn rejects_out_of_range_label() {
        assert!(parse_idx_pair(&images(1, 1, 1, &[0]), &labels(&[7]), 2).is_err());
    }

    #[test]
    fn rejects_wrong_dimension_count() {
        assert!(parse_idx_pair(&labels(&[0]), &labels(&[0]), 2).is_err());
    }

    #[test]
    fn missing_files_give_empty_dataset() {
        let ds = load_idx_pair("/nonexistent/images", "/nonexistent/labels", 10);
        assert!(ds.is_empty());
    }
}
