use chrono::{NaiveDate, NaiveDateTime};

use super::model::{DataError, RawSample, Sample, Series};

/// Locale-specific timestamp pattern tried first for the whole column.
const STRICT_TIME_FORMAT: &str = "%Y年%m月%d日 %H:%M";

/// Fallback patterns, tried in order per value. The strict pattern is a
/// member so mixed-format columns keep their strictly-formatted rows.
const FLEXIBLE_TIME_FORMATS: &[&str] = &[
    STRICT_TIME_FORMAT,
    "%Y年%m月%d日 %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only fallbacks; parsed values get a midnight time component.
const FLEXIBLE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日"];

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Turn raw text pairs into the time-sorted [`Series`].
///
/// Timestamp parsing is an all-or-nothing choice per column: the strict
/// pattern is attempted for every value, and only if the whole column
/// conforms is it used; otherwise every value goes through the flexible
/// parser. Rows whose timestamp or temperature still fail to parse are
/// dropped silently; if nothing survives the drop, the dataset is empty.
pub fn normalize(raw: Vec<RawSample>) -> Result<Series, DataError> {
    let strict: Option<Vec<NaiveDateTime>> = raw
        .iter()
        .map(|r| NaiveDateTime::parse_from_str(r.time_text.trim(), STRICT_TIME_FORMAT).ok())
        .collect();

    let timestamps: Vec<Option<NaiveDateTime>> = match strict {
        Some(all) => all.into_iter().map(Some).collect(),
        None => raw.iter().map(|r| parse_flexible(&r.time_text)).collect(),
    };

    let mut samples: Vec<Sample> = raw
        .iter()
        .zip(timestamps)
        .filter_map(|(r, timestamp)| {
            Some(Sample {
                timestamp: timestamp?,
                temperature: parse_temperature(&r.temperature_text)?,
            })
        })
        .collect();

    if samples.is_empty() {
        return Err(DataError::EmptyDataset);
    }

    // Stable: rows sharing a timestamp keep their input order.
    samples.sort_by_key(|s| s.timestamp);
    Ok(Series::new(samples))
}

/// Try a small set of common timestamp layouts.
pub fn parse_flexible(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    for format in FLEXIBLE_TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
            return Some(t);
        }
    }
    for format in FLEXIBLE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a temperature reading, stripping a trailing "°C" unit if present.
pub fn parse_temperature(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix("°C").unwrap_or(text).trim();
    text.parse::<f64>().ok()
}
