//! CSV format dataset implementation
//!
//! Supports loading labeled account data from CSV files where:
//! - The first row is a header naming every column
//! - The header holds the nine feature columns and `is_fake`, in any order
//! - Blank lines and `#` comments are skipped

use crate::core::{
    Dataset, FakeDetectError, FeatureVector, Result, Sample, FEATURE_NAMES, LABEL_COLUMN,
    N_FEATURES,
};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dataset implementation for CSV format files
#[derive(Debug, Clone)]
pub struct FeatureDataset {
    samples: Vec<Sample>,
}

/// Where each canonical feature and the label live in a CSV row
#[derive(Debug, Clone)]
struct ColumnLayout {
    feature_columns: [usize; N_FEATURES],
    label_column: usize,
    width: usize,
}

impl FeatureDataset {
    /// Load a dataset from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(FakeDetectError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut layout: Option<ColumnLayout> = None;
        let mut samples = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(FakeDetectError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match &layout {
                None => layout = Some(Self::parse_header(line)?),
                Some(layout) => samples.push(Self::parse_data_line(line, line_no + 1, layout)?),
            }
        }

        if layout.is_none() {
            return Err(FakeDetectError::EmptyDataset);
        }
        if samples.is_empty() {
            return Err(FakeDetectError::EmptyDataset);
        }

        debug!("Parsed {} samples from CSV", samples.len());
        Ok(FeatureDataset { samples })
    }

    /// Build a dataset from samples already in memory
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(FakeDetectError::EmptyDataset);
        }
        Ok(FeatureDataset { samples })
    }

    /// Resolve header names onto the canonical feature order
    fn parse_header(line: &str) -> Result<ColumnLayout> {
        let names: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        let mut feature_columns = [usize::MAX; N_FEATURES];
        let mut label_column = None;

        for (column, name) in names.iter().enumerate() {
            if *name == LABEL_COLUMN {
                if label_column.replace(column).is_some() {
                    return Err(FakeDetectError::InvalidDataset(format!(
                        "Duplicate column: {name}"
                    )));
                }
            } else if let Some(idx) = FeatureVector::index_of(name) {
                if feature_columns[idx] != usize::MAX {
                    return Err(FakeDetectError::InvalidDataset(format!(
                        "Duplicate column: {name}"
                    )));
                }
                feature_columns[idx] = column;
            } else {
                return Err(FakeDetectError::InvalidDataset(format!(
                    "Unexpected column: {name}"
                )));
            }
        }

        let missing: Vec<&str> = FEATURE_NAMES
            .iter()
            .zip(feature_columns.iter())
            .filter(|(_, &column)| column == usize::MAX)
            .map(|(&name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(FakeDetectError::InvalidDataset(format!(
                "Missing feature columns: {}",
                missing.join(", ")
            )));
        }

        let label_column = label_column.ok_or_else(|| {
            FakeDetectError::InvalidDataset(format!("Missing label column: {LABEL_COLUMN}"))
        })?;

        Ok(ColumnLayout {
            feature_columns,
            label_column,
            width: names.len(),
        })
    }

    /// Parse a CSV data line into a Sample
    fn parse_data_line(line: &str, line_no: usize, layout: &ColumnLayout) -> Result<Sample> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        if fields.len() != layout.width {
            return Err(FakeDetectError::InvalidDataset(format!(
                "Line {line_no} has {} fields, header has {}",
                fields.len(),
                layout.width
            )));
        }

        let parse = |column: usize| -> Result<f64> {
            match fields[column].parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(FakeDetectError::ParseError(format!(
                    "Invalid value at line {line_no}, column {}: {}",
                    column + 1,
                    fields[column]
                ))),
            }
        };

        let mut values = [0.0; N_FEATURES];
        for (slot, &column) in values.iter_mut().zip(layout.feature_columns.iter()) {
            *slot = parse(column)?;
        }

        let label = parse(layout.label_column)?;
        let label = if label == 1.0 {
            1
        } else if label == 0.0 {
            0
        } else {
            return Err(FakeDetectError::InvalidLabel(label));
        };

        Ok(Sample::new(FeatureVector::from_array(values), label))
    }
}

impl Dataset for FeatureDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get_sample(&self, i: usize) -> Sample {
        self.samples[i].clone()
    }

    fn samples(&self) -> Vec<Sample> {
        self.samples.clone()
    }

    fn get_labels(&self) -> Vec<u8> {
        self.samples.iter().map(|s| s.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "username_length,num_posts,num_followers,num_following,account_age_days,has_profile_picture,has_bio,engagement_ratio,is_verified,is_fake";

    #[test]
    fn test_csv_basic() {
        let data = format!("{HEADER}\n8,120,300,250,900,1,1,0.05,0,0\n15,0,3,800,2,0,0,0.0,0,1\n");
        let dataset = FeatureDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get_labels(), vec![0, 1]);

        let first = dataset.get_sample(0);
        assert_eq!(first.features.username_length, 8.0);
        assert_eq!(first.features.account_age_days, 900.0);
        assert_eq!(first.features.engagement_ratio, 0.05);
    }

    #[test]
    fn test_csv_columns_mapped_by_name() {
        // Label first, features reversed
        let data = "is_fake,is_verified,engagement_ratio,has_bio,has_profile_picture,account_age_days,num_following,num_followers,num_posts,username_length\n\
                    1,0,0.5,1,1,30,40,50,60,7\n";
        let dataset = FeatureDataset::from_reader(Cursor::new(data)).unwrap();

        let sample = dataset.get_sample(0);
        assert_eq!(sample.label, 1);
        assert_eq!(
            sample.features.to_array(),
            [7.0, 60.0, 50.0, 40.0, 30.0, 1.0, 1.0, 0.5, 0.0]
        );
    }

    #[test]
    fn test_csv_empty_lines_and_comments() {
        let data = format!("# exported accounts\n{HEADER}\n\n1,2,3,4,5,1,0,0.1,0,0\n# trailing\n");
        let dataset = FeatureDataset::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_csv_missing_column() {
        let data = "username_length,num_posts,is_fake\n1,2,0\n";
        let err = FeatureDataset::from_reader(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, FakeDetectError::InvalidDataset(_)));
        assert!(err.to_string().contains("num_followers"));
    }

    #[test]
    fn test_csv_missing_label() {
        let header = HEADER.trim_end_matches(",is_fake");
        let data = format!("{header}\n1,2,3,4,5,1,0,0.1,0\n");
        let err = FeatureDataset::from_reader(Cursor::new(data)).unwrap_err();
        assert!(err.to_string().contains("is_fake"));
    }

    #[test]
    fn test_csv_extra_and_duplicate_columns() {
        let data = format!("{HEADER},country\n1,2,3,4,5,1,0,0.1,0,0,NL\n");
        assert!(matches!(
            FeatureDataset::from_reader(Cursor::new(data)),
            Err(FakeDetectError::InvalidDataset(_))
        ));

        let data = format!("{HEADER},num_posts\n1,2,3,4,5,1,0,0.1,0,0,2\n");
        let err = FeatureDataset::from_reader(Cursor::new(data)).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_csv_invalid_rows() {
        // Short row
        let data = format!("{HEADER}\n1,2,3\n");
        assert!(FeatureDataset::from_reader(Cursor::new(data)).is_err());

        // Non-numeric value
        let data = format!("{HEADER}\n1,abc,3,4,5,1,0,0.1,0,0\n");
        assert!(matches!(
            FeatureDataset::from_reader(Cursor::new(data)),
            Err(FakeDetectError::ParseError(_))
        ));

        // Non-finite values
        for bad in ["nan", "NaN", "inf", "-inf"] {
            let data = format!("{HEADER}\n1,{bad},3,4,5,1,0,0.1,0,0\n");
            let err = FeatureDataset::from_reader(Cursor::new(data)).unwrap_err();
            assert!(matches!(err, FakeDetectError::ParseError(_)));
            assert!(err.to_string().contains("line 2, column 2"));
        }

        // Label outside {0, 1}
        let data = format!("{HEADER}\n1,2,3,4,5,1,0,0.1,0,2\n");
        assert!(matches!(
            FeatureDataset::from_reader(Cursor::new(data)),
            Err(FakeDetectError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_csv_empty() {
        assert!(matches!(
            FeatureDataset::from_reader(Cursor::new("")),
            Err(FakeDetectError::EmptyDataset)
        ));
        assert!(matches!(
            FeatureDataset::from_reader(Cursor::new(format!("{HEADER}\n"))),
            Err(FakeDetectError::EmptyDataset)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FeatureDataset::from_file("/nonexistent/fake_accounts_dataset.csv");
        assert!(matches!(result, Err(FakeDetectError::IoError(_))));
    }
}
