use crate::domain::model::SnoopedEntry;
use crate::domain::ports::Snooper;
use crate::utils::error::{ElectionError, Result};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub const SNOOPER_NAME: &str = "LibDemNewbies";
pub const DEFAULT_BASE_URL: &str = "http://libdemnewbies.org.uk/";

const LISTING_PATH: &str = "elections/forthcoming-by-elections/";
const HEADING_DATE_FORMAT: &str = "%d/%m/%Y";

// 第二行固定是 "<黨> seat. Cause: <原因>"
static CAUSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*\n(\S+) seat. [cC]ause: (\S+)\n").expect("cause pattern is valid")
});

pub struct LibDemNewbiesSnooper {
    base_url: String,
}

impl LibDemNewbiesSnooper {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn read_tile(&self, listing_url: &str, tile: ElementRef<'_>) -> Result<SnoopedEntry> {
        let content: String = tile.text().collect();

        let strong = selector("strong")?;
        let title = match tile.select(&strong).next() {
            Some(bold) => bold.text().collect::<String>(),
            None => content.split('\n').next().unwrap_or_default().to_string(),
        };

        let cause = extract_cause(&content)?;

        let heading = tile
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| sibling.value().name() == "h3")
            .ok_or_else(|| {
                ElectionError::parse(format!("no date heading before entry '{}'", title))
            })?;
        let date = parse_heading_date(&heading.text().collect::<String>())?;

        Ok(SnoopedEntry {
            snooper_name: SNOOPER_NAME.to_string(),
            detail_url: detail_url(listing_url, &title, date),
            title,
            source: listing_url.to_string(),
            date,
            cause,
            detail: content,
        })
    }
}

impl Default for LibDemNewbiesSnooper {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Snooper for LibDemNewbiesSnooper {
    fn snooper_name(&self) -> &str {
        SNOOPER_NAME
    }

    fn listing_url(&self) -> String {
        format!("{}{}", self.base_url, LISTING_PATH)
    }

    fn parse_listing(&self, html: &str) -> Result<Vec<Result<SnoopedEntry>>> {
        let listing_url = self.listing_url();
        let document = Html::parse_document(html);

        let section = selector("section.av_textblock_section")?;
        let wrapper = document
            .select(&section)
            .next()
            .ok_or_else(|| ElectionError::parse("listing section not found"))?;

        let paragraph = selector("p")?;
        Ok(wrapper
            .select(&paragraph)
            .map(|tile| self.read_tile(&listing_url, tile))
            .collect())
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ElectionError::parse(format!("invalid selector '{}': {:?}", css, e)))
}

/// 內文提到 cause 卻對不上格式時視為解析錯誤，不猜測
pub fn extract_cause(content: &str) -> Result<String> {
    if !content.to_lowercase().contains("cause") {
        return Ok("unknown".to_string());
    }

    CAUSE_PATTERN
        .captures(content)
        .and_then(|caps| caps.get(2))
        .map(|cause| cause.as_str().to_string())
        .ok_or_else(|| {
            let first_line = content.lines().next().unwrap_or_default();
            ElectionError::parse(format!("unrecognised cause layout in entry '{}'", first_line))
        })
}

pub fn parse_heading_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), HEADING_DATE_FORMAT)
        .map_err(|e| ElectionError::parse(format!("bad heading date '{}': {}", text.trim(), e)))
}

pub fn slugify_title(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

pub fn detail_url(listing_url: &str, title: &str, date: NaiveDate) -> String {
    format!(
        "{}#{}-{}",
        listing_url,
        slugify_title(title),
        date.format("%Y-%m-%d")
    )
}
