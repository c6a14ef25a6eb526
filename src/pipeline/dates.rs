use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use url::Url;

use crate::blogml::{DateKind, PostDate};
use crate::config::Blog;
use crate::error::{ConvertError, Result};
use crate::url_converter::path_and_query;
use crate::util::local_zone::LocalZone;

/// Fixes the timestamps of old posts and turns them into local time.
///
/// Posts written before `shift_before` were exported with local wall-clock
/// times but no zone designator; those are shifted by the local UTC offset.
#[derive(Copy, Clone, Debug)]
pub struct DateCorrection {
    zone: LocalZone,
    shift_before: NaiveDate,
}

impl DateCorrection {
    pub fn new(zone: LocalZone, shift_before: NaiveDate) -> DateCorrection {
        DateCorrection { zone, shift_before }
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    /// Unspecified dates become local dates. Those before `shift_before` are
    /// first shifted by the UTC offset in force at that date.
    pub fn correct(&self, date: PostDate) -> PostDate {
        if date.kind != DateKind::Unspecified {
            return date;
        }
        if date.value.date() >= self.shift_before {
            return PostDate::new(date.value, DateKind::Local);
        }

        let offset = self.zone.offset_at(&date.value);
        let shifted = date.value - Duration::seconds(offset.local_minus_utc() as i64);
        PostDate::new(shifted, DateKind::Local)
    }

    /// Unspecified dates are read as local wall-clock time.
    pub fn to_local(&self, date: &PostDate) -> DateTime<FixedOffset> {
        match date.kind {
            DateKind::Local | DateKind::Unspecified => self.zone.from_local(&date.value),
            DateKind::Utc => self.zone.from_utc(&date.value),
        }
    }

    /// Local midnight at the start of `date`.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        self.zone.from_local(&date.and_time(chrono::NaiveTime::MIN))
    }
}

/// `yyyy/MM/dd`
pub fn subfolder(date: &DateTime<FixedOffset>) -> String {
    date.format("%Y/%m/%d").to_string()
}

fn blog_base(blog: &Blog) -> Result<Url> {
    let base = format!("https://{}/", blog.host);
    Url::parse(&base).map_err(|source| ConvertError::InvalidUrl { url: base, source })
}

/// Path and query of a post URL that may be relative to the blog host.
pub fn site_path(blog: &Blog, url: &str) -> Result<String> {
    let resolved = blog_base(blog)?
        .join(url.trim())
        .map_err(|source| ConvertError::InvalidUrl { url: url.to_string(), source })?;
    Ok(path_and_query(&resolved))
}

/// Legacy URL a post should have had, given its corrected date.
pub fn corrected_url(blog: &Blog, created: &DateTime<FixedOffset>, slug: &str) -> String {
    format!("https://{}{}/{}/{}/{}{}",
            blog.host,
            blog.path.trim_end_matches('/'),
            blog.archive_segment.trim_matches('/'),
            subfolder(created),
            slug,
            blog.page_extension)
}
