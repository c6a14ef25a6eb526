use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, Offset, TimeZone};

/// The zone the blog considers "local": the machine's zone, or a fixed offset
/// from the configuration (which keeps conversions reproducible).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LocalZone {
    System,
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Interprets a wall-clock time as local time.
    pub fn from_local(&self, local: &NaiveDateTime) -> DateTime<FixedOffset> {
        match self {
            LocalZone::Fixed(offset) => fixed_from_local(offset, local),
            LocalZone::System => match Local.from_local_datetime(local).earliest() {
                Some(date_time) => date_time.with_timezone(&date_time.offset().fix()),
                // Skipped by a DST transition; use the offset in effect right after it
                None => {
                    let offset = Local.offset_from_utc_datetime(local).fix();
                    fixed_from_local(&offset, local)
                }
            },
        }
    }

    /// Converts a UTC time into local time.
    pub fn from_utc(&self, utc: &NaiveDateTime) -> DateTime<FixedOffset> {
        match self {
            LocalZone::Fixed(offset) => offset.from_utc_datetime(utc),
            LocalZone::System => {
                let date_time = Local.from_utc_datetime(utc);
                date_time.with_timezone(&date_time.offset().fix())
            }
        }
    }

    /// UTC offset in effect at the given local time.
    pub fn offset_at(&self, local: &NaiveDateTime) -> FixedOffset {
        *self.from_local(local).offset()
    }
}

fn fixed_from_local(offset: &FixedOffset, local: &NaiveDateTime) -> DateTime<FixedOffset> {
    // A fixed offset never has gaps or folds
    let utc = *local - Duration::seconds(offset.local_minus_utc() as i64);
    offset.from_utc_datetime(&utc)
}
