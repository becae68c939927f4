//! Row source for the raw book dataset
//!
//! Streams rows out of a delimited file. Column headers are trimmed before
//! matching; unknown or extra columns are ignored; declared columns that are
//! missing from the file deserialize as None.

use crate::Result;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// One raw row as it appears in the dataset file
///
/// Every field is optional: the validator decides what a usable row needs.
/// Field names mirror the source column vocabulary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBookRow {
    #[serde(rename = "bookID")]
    pub book_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub rating: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub genres: Option<String>,
    pub characters: Option<String>,
    #[serde(rename = "bookFormat")]
    pub book_format: Option<String>,
    pub edition: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    #[serde(rename = "publishDate")]
    pub publish_date: Option<String>,
    #[serde(rename = "firstPublishDate")]
    pub first_publish_date: Option<String>,
    pub awards: Option<String>,
    #[serde(rename = "numRatings")]
    pub num_ratings: Option<String>,
    #[serde(rename = "ratingsByStars")]
    pub ratings_by_stars: Option<String>,
    #[serde(rename = "likedPercent")]
    pub liked_percent: Option<String>,
    pub setting: Option<String>,
    #[serde(rename = "coverImg")]
    pub cover_img: Option<String>,
    #[serde(rename = "bbeScore")]
    pub bbe_score: Option<String>,
    #[serde(rename = "bbeVotes")]
    pub bbe_votes: Option<String>,
    pub price: Option<String>,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
}

impl RawBookRow {
    /// Named view of every column, for missing-field diagnostics
    pub fn fields(&self) -> [(&'static str, Option<&str>); 25] {
        [
            ("bookID", self.book_id.as_deref()),
            ("title", self.title.as_deref()),
            ("author", self.author.as_deref()),
            ("rating", self.rating.as_deref()),
            ("description", self.description.as_deref()),
            ("language", self.language.as_deref()),
            ("genres", self.genres.as_deref()),
            ("characters", self.characters.as_deref()),
            ("bookFormat", self.book_format.as_deref()),
            ("edition", self.edition.as_deref()),
            ("pages", self.pages.as_deref()),
            ("publisher", self.publisher.as_deref()),
            ("publishDate", self.publish_date.as_deref()),
            ("firstPublishDate", self.first_publish_date.as_deref()),
            ("awards", self.awards.as_deref()),
            ("numRatings", self.num_ratings.as_deref()),
            ("ratingsByStars", self.ratings_by_stars.as_deref()),
            ("likedPercent", self.liked_percent.as_deref()),
            ("setting", self.setting.as_deref()),
            ("coverImg", self.cover_img.as_deref()),
            ("bbeScore", self.bbe_score.as_deref()),
            ("bbeVotes", self.bbe_votes.as_deref()),
            ("price", self.price.as_deref()),
            ("isbn", self.isbn.as_deref()),
            ("isbn13", self.isbn13.as_deref()),
        ]
    }
}

/// Streaming reader over the dataset file
pub struct RowSource {
    reader: csv::Reader<File>,
}

impl RowSource {
    /// Open the dataset file with the given field delimiter
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_path(path)?;

        Ok(Self { reader })
    }

    /// Iterate deserialized rows; per-row parse errors surface as Err items
    pub fn rows(&mut self) -> impl Iterator<Item = Result<RawBookRow>> + '_ {
        self.reader
            .deserialize::<RawBookRow>()
            .map(|r| r.map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_rows_with_trimmed_headers() {
        let file = write_csv(" title , isbn ,coverImg,price\nA Book,0306406152,http://x,9.99\n");
        let mut source = RowSource::open(file.path(), b',').unwrap();
        let rows: Vec<_> = source.rows().collect::<Result<_>>().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("A Book"));
        assert_eq!(rows[0].isbn.as_deref(), Some("0306406152"));
        assert_eq!(rows[0].price.as_deref(), Some("9.99"));
    }

    #[test]
    fn unknown_columns_ignored_and_missing_columns_default() {
        let file = write_csv("title,mystery,isbn\nA,whatever,0306406152\n");
        let mut source = RowSource::open(file.path(), b',').unwrap();
        let rows: Vec<_> = source.rows().collect::<Result<_>>().unwrap();

        assert_eq!(rows[0].title.as_deref(), Some("A"));
        assert!(rows[0].cover_img.is_none());
        assert!(rows[0].price.is_none());
    }

    #[test]
    fn custom_delimiter() {
        let file = write_csv("title;isbn\nA;0306406152\n");
        let mut source = RowSource::open(file.path(), b';').unwrap();
        let rows: Vec<_> = source.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows[0].isbn.as_deref(), Some("0306406152"));
    }
}
