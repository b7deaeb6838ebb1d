//! Description file parsing
//!
//! A description file is six labelled lines in fixed order:
//!
//! ```text
//! description: Gentle rain on a tin roof
//! tag: rain-nature-calm
//! author: Jane Doe
//! last_updated: 2024-02-01
//! details: Recorded in a garden shed
//! publish_date: 2024-01-15
//! ```
//!
//! This is a positional contract, not a key/value format: lines are read
//! by index and each must carry the label for its position. Lines past
//! the sixth are ignored.

use thiserror::Error;

use super::SoundMetadata;

/// Labels, in line order
const LABELS: [&str; 6] = [
    "description: ",
    "tag: ",
    "author: ",
    "last_updated: ",
    "details: ",
    "publish_date: ",
];

/// Description parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("Description has {found} lines, expected at least 6")]
    TooShort { found: usize },

    #[error("Line {line} does not start with '{label}'")]
    MissingLabel { line: usize, label: &'static str },
}

/// Parse the text of a description file
pub fn parse_description(text: &str) -> Result<SoundMetadata, DescriptionError> {
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    if lines.len() < LABELS.len() {
        return Err(DescriptionError::TooShort { found: lines.len() });
    }

    let mut values = [""; 6];
    for (index, label) in LABELS.into_iter().enumerate() {
        values[index] = lines[index]
            .strip_prefix(label)
            .ok_or(DescriptionError::MissingLabel {
                line: index + 1,
                label,
            })?;
    }
    let [description, tags, author, last_updated, details, publish_date] = values;

    Ok(SoundMetadata {
        description: description.to_string(),
        tags: tags.split('-').map(str::to_string).collect(),
        author: author.to_string(),
        last_updated: last_updated.to_string(),
        details: details.to_string(),
        publish_date: publish_date.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "description: Gentle rain on a tin roof\n\
                          tag: rain-nature-calm\n\
                          author: Jane Doe\n\
                          last_updated: 2024-02-01\n\
                          details: Recorded in a garden shed\n\
                          publish_date: 2024-01-15";

    #[test]
    fn test_parse_all_fields() {
        let meta = parse_description(SAMPLE).unwrap();
        assert_eq!(meta.description, "Gentle rain on a tin roof");
        assert_eq!(meta.tags, vec!["rain", "nature", "calm"]);
        assert_eq!(meta.author, "Jane Doe");
        assert_eq!(meta.last_updated, "2024-02-01");
        assert_eq!(meta.details, "Recorded in a garden shed");
        assert_eq!(meta.publish_date, "2024-01-15");
    }

    #[test]
    fn test_crlf_and_trailing_lines() {
        let text = format!("{}\r\nextra line\r\n", SAMPLE.replace('\n', "\r\n"));
        let meta = parse_description(&text).unwrap();
        assert_eq!(meta.author, "Jane Doe");
        assert_eq!(meta.publish_date, "2024-01-15");
    }

    #[test]
    fn test_too_few_lines() {
        let text = "description: x\ntag: a\nauthor: b";
        assert_eq!(
            parse_description(text),
            Err(DescriptionError::TooShort { found: 3 })
        );
    }

    #[test]
    fn test_out_of_order_labels_rejected() {
        let text = "description: x\nauthor: b\ntag: a\nlast_updated: c\ndetails: d\npublish_date: e";
        assert_eq!(
            parse_description(text),
            Err(DescriptionError::MissingLabel {
                line: 2,
                label: "tag: "
            })
        );
    }

    #[test]
    fn test_single_tag_and_empty_values() {
        let text = "description: \ntag: ambient\nauthor: \nlast_updated: \ndetails: \npublish_date: ";
        let meta = parse_description(text).unwrap();
        assert_eq!(meta.tags, vec!["ambient"]);
        assert_eq!(meta.description, "");
        assert_eq!(meta.publish_date, "");
    }
}
