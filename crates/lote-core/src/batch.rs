use serde::Serialize;

use crate::collector::{Bucket, BucketEntry};

/// A contiguous, size-bounded slice of a bucket, written as one artifact
#[derive(Debug, Clone, Serialize)]
pub struct Batch<'a> {
    pub bucket: &'a str,
    /// 0-based position within the bucket
    pub index: usize,
    pub suffix: String,
    pub artifact_name: String,
    pub members: &'a [BucketEntry],
}

/// Spreadsheet-style suffix: 0 → `A`, 25 → `Z`, 26 → `AA`, 701 → `ZZ`, 702 → `AAA`
pub fn suffix_for(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

pub fn artifact_name(bucket: &str, suffix: &str) -> String {
    format!("{}_PARTE_{}.txt", bucket, suffix)
}

/// Cut a sorted bucket into batches of at most `batch_size` members.
///
/// Member `i` lands in batch `i / batch_size`. An empty bucket yields no
/// batches.
pub fn plan_batches(bucket: &Bucket, batch_size: usize) -> Vec<Batch<'_>> {
    bucket
        .entries
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, members)| {
            let suffix = suffix_for(index);
            Batch {
                bucket: &bucket.name,
                index,
                artifact_name: artifact_name(&bucket.name, &suffix),
                suffix,
                members,
            }
        })
        .collect()
}
