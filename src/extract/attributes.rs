//! Per-attribute handlers for the movie detail table
//!
//! Each recognized row label maps to one `Attribute`, which knows how to
//! fold its cell into a `Record`. Unrecognized labels are ignored.

use crate::extract::markup::strip_markup;
use crate::extract::record::{RatingLink, Record};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("valid anchor selector");
    static ref SCORE: Regex = Regex::new(r"^\d+(?:\.\d+)?$").expect("valid score pattern");
}

/// A recognized row of the detail table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Director,
    Cast,
    Genre,
    Region,
    Alias,
    Length,
    ReleaseDate,
    Rating,
}

impl Attribute {
    /// Maps a row label (Chinese or English) to an attribute
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label
            .trim()
            .trim_end_matches([':', '：'])
            .trim()
            .to_lowercase();

        match label.as_str() {
            "导演" | "director" | "directors" => Some(Self::Director),
            "主演" | "starring" | "cast" | "actors" | "character" => Some(Self::Cast),
            "类型" | "genre" | "genres" | "category" => Some(Self::Genre),
            "地区" | "region" | "district" | "country" => Some(Self::Region),
            "别名" | "alias" | "aka" | "also known as" => Some(Self::Alias),
            "片长" | "length" | "runtime" => Some(Self::Length),
            "上映时间" | "release date" | "release_date" | "released" => {
                Some(Self::ReleaseDate)
            }
            "评分" | "rating" | "ratings" => Some(Self::Rating),
            _ => None,
        }
    }

    /// Folds a table value cell into the record
    pub fn apply(self, cell: ElementRef<'_>, record: &mut Record) {
        match self {
            Self::Rating => {
                for (source, link) in parse_ratings(cell) {
                    tracing::trace!("{:?} rating {} -> {}", source, link.url, link.score);
                    match source {
                        RatingSource::Douban => record.douban = link,
                        RatingSource::Imdb => record.imdb = link,
                    }
                }
            }
            _ => self.apply_text(&strip_markup(&cell.inner_html()), record),
        }
    }

    /// Folds an already cleaned text value into the record
    ///
    /// Ratings carry links rather than text and are left untouched here.
    pub fn apply_text(self, value: &str, record: &mut Record) {
        match self {
            Self::Director => record.director.extend(split_values(value)),
            Self::Cast => record.character.extend(split_values(value)),
            Self::Genre => record.category.extend(split_values(value)),
            Self::Region => record.district.extend(split_values(value)),
            Self::Alias => record.alias.extend(split_values(value)),
            Self::Length => record.length = value.trim().to_string(),
            Self::ReleaseDate => record.release_date = value.trim().to_string(),
            Self::Rating => {}
        }
    }
}

/// External rating sites recognized in the rating row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingSource {
    Douban,
    Imdb,
}

impl RatingSource {
    /// Classifies a rating link by its host
    pub fn classify(href: &str) -> Option<Self> {
        let host = Url::parse(href)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_else(|| href.to_lowercase());

        if host.contains("douban") {
            Some(Self::Douban)
        } else if host.contains("imdb") {
            Some(Self::Imdb)
        } else {
            None
        }
    }
}

/// Splits a multi-valued field on `/`, trimming values and dropping empty ones
pub fn split_values(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split('/')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Collects every recognized rating link in a cell
///
/// A score is the first text ending in a number inside the anchor, or
/// failing that, in the nodes that follow it up to the next anchor. A
/// missing score is recorded as zero.
pub fn parse_ratings(cell: ElementRef<'_>) -> Vec<(RatingSource, RatingLink)> {
    cell.select(&ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            let source = RatingSource::classify(href)?;
            Some((
                source,
                RatingLink {
                    url: href.to_string(),
                    score: adjacent_score(anchor).unwrap_or(0.0),
                },
            ))
        })
        .collect()
}

fn adjacent_score(anchor: ElementRef<'_>) -> Option<f64> {
    if let Some(score) = anchor.text().find_map(parse_score) {
        return Some(score);
    }

    for sibling in anchor.next_siblings() {
        if let Some(element) = ElementRef::wrap(sibling) {
            if element.value().name() == "a" {
                break;
            }
            if let Some(score) = element.text().find_map(parse_score) {
                return Some(score);
            }
        } else if let Some(text) = sibling.value().as_text() {
            if let Some(score) = parse_score(text) {
                return Some(score);
            }
        }
    }

    None
}

/// Reads the trailing numeric token of a text node, as in `IMDb 8.1`
fn parse_score(text: &str) -> Option<f64> {
    let token = text.split_whitespace().next_back()?;
    if !SCORE.is_match(token) {
        return None;
    }
    token.parse().ok()
}
