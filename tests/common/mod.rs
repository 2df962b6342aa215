//! Synthetic account data shared by the integration tests

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "username_length,num_posts,num_followers,num_following,account_age_days,has_profile_picture,has_bio,engagement_ratio,is_verified,is_fake";

/// One CSV row for a clearly real (`fake == false`) or clearly fake account
pub fn account_row(i: usize, fake: bool) -> String {
    let k = (i % 10) as f64;
    if fake {
        format!(
            "{},{},{},{},{},0,0,{:.3},0,1",
            12.0 + (k % 6.0),
            k % 5.0,
            2.0 * k,
            500.0 + 40.0 * k,
            1.0 + 3.0 * k,
            0.001 * k
        )
    } else {
        format!(
            "{},{},{},{},{},1,1,{:.3},{},0",
            6.0 + (k % 4.0),
            50.0 + 25.0 * k,
            200.0 + 150.0 * k,
            100.0 + 30.0 * k,
            365.0 + 150.0 * k,
            0.03 + 0.007 * k,
            i % 2
        )
    }
}

/// Balanced, well separated dataset of `n` rows (alternating labels)
pub fn synthetic_csv(n: usize) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for i in 0..n {
        out.push_str(&account_row(i, i % 2 == 0));
        out.push('\n');
    }
    out
}

/// Write CSV text to a temporary `.csv` file
pub fn write_csv(data: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    write!(file, "{data}").expect("Failed to write");
    file.flush().expect("Failed to flush");
    file
}

/// Write the synthetic dataset to a temporary `.csv` file
pub fn synthetic_csv_file(n: usize) -> NamedTempFile {
    write_csv(&synthetic_csv(n))
}
