//! Page extraction: discovered links plus an optional movie record
//!
//! Everything here is a pure transformation from page text to data. The
//! pipeline's extractor worker calls [`extract`] once per fetched page.

mod attributes;
mod markup;
mod record;

pub use attributes::{parse_ratings, split_values, Attribute, RatingSource};
pub use markup::{clean_text, strip_markup};
pub use record::{RatingLink, Record};

use crate::link::LinkFilter;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref HREF: Selector = Selector::parse("[href]").expect("valid href selector");
    static ref TITLE: Selector = Selector::parse(".x-m-title").expect("valid title selector");
    static ref YEAR: Selector = Selector::parse("span.muted").expect("valid year selector");
    static ref TABLE: Selector = Selector::parse("table").expect("valid table selector");
    static ref ROW: Selector = Selector::parse("tr").expect("valid row selector");
    static ref CELL: Selector = Selector::parse("th, td").expect("valid cell selector");
    static ref PARENTHESIZED_YEAR: Regex =
        Regex::new(r"\(\s*(\d+)\s*\)").expect("valid year pattern");
}

/// Result of extracting one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Followable links in document order, duplicates included
    pub links: Vec<String>,

    /// The movie record, if the page matched the detail-page shape
    pub record: Option<Record>,
}

/// Extracts links and an optional record from a page
///
/// # Arguments
///
/// * `url` - Absolute URL the page was fetched from (stored in the record)
/// * `html` - Raw page body
/// * `filter` - Decides which hrefs are followable
///
/// # Example
///
/// ```
/// use cinecrawl::extract::extract;
/// use cinecrawl::link::LinkFilter;
///
/// let html = r#"<h1 class="x-m-title">Heat <span class="muted">(1995)</span></h1>
///               <a href="/movie/ronin/">Ronin</a>"#;
/// let page = extract("http://dianying.fm/movie/heat/", html, &LinkFilter::default());
/// assert_eq!(page.links, vec!["/movie/ronin/"]);
/// assert_eq!(page.record.unwrap().year, 1995);
/// ```
pub fn extract(url: &str, html: &str, filter: &LinkFilter) -> Extraction {
    let document = Html::parse_document(html);

    Extraction {
        links: discover_links(&document, filter),
        record: extract_record(&document, url),
    }
}

/// Collects every followable href in document order
pub fn discover_links(document: &Html, filter: &LinkFilter) -> Vec<String> {
    document
        .select(&HREF)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| {
            let accepted = filter.accepts(href);
            if !accepted {
                tracing::debug!("Not following filtered link {}", href);
            }
            accepted
        })
        .map(str::to_string)
        .collect()
}

/// Builds a record from a detail page, or `None` if the page has no title
pub fn extract_record(document: &Html, url: &str) -> Option<Record> {
    let heading = document.select(&TITLE).next()?;
    let name = heading_name(heading);
    if name.is_empty() {
        return None;
    }

    let mut record = Record {
        url: url.to_string(),
        name: vec![name],
        year: heading_year(heading),
        ..Record::default()
    };

    if let Some(table) = document.select(&TABLE).next() {
        for row in table.select(&ROW) {
            apply_row(row, &mut record);
        }
    }

    Some(record)
}

/// Text directly inside the heading, ignoring nested elements like the year
fn heading_name(heading: ElementRef<'_>) -> String {
    let own_text: String = heading
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect();
    clean_text(&own_text)
}

fn heading_year(heading: ElementRef<'_>) -> u16 {
    heading
        .select(&YEAR)
        .next()
        .map(|span| span.text().collect::<String>())
        .and_then(|text| {
            PARENTHESIZED_YEAR
                .captures(&text)
                .and_then(|caps| caps[1].parse().ok())
        })
        .unwrap_or(0)
}

/// Dispatches one table row: every cell but the last forms the label
fn apply_row(row: ElementRef<'_>, record: &mut Record) {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    let Some((value, label_cells)) = cells.split_last() else {
        return;
    };
    if label_cells.is_empty() {
        return;
    }

    let label: String = label_cells
        .iter()
        .map(|cell| strip_markup(&cell.inner_html()))
        .collect::<Vec<_>>()
        .join(" ");

    match Attribute::from_label(&label) {
        Some(attribute) => attribute.apply(*value, record),
        None => tracing::trace!("Ignoring table row '{}'", label),
    }
}
