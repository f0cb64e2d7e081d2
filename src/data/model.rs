use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Column labels expected in the source document
// ---------------------------------------------------------------------------

/// Header label of the time column (matched exactly).
pub const TIME_LABEL: &str = "时间";
/// Header label fragment of the temperature column (matched as a substring).
pub const TEMP_LABEL: &str = "温度";

// ---------------------------------------------------------------------------
// Fatal data-shape errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("header row containing \"时间\" and a \"温度\" column not found")]
    HeaderNotFound,
    #[error("no data rows found")]
    EmptyDataset,
}

// ---------------------------------------------------------------------------
// Cell – a single raw cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as produced by the document reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text representation used for downstream parsing. `None` for empty
    /// cells, so a blank cell and an absent cell behave identically.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::DateTime(t) => Some(t.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// HeaderMatch – where the header row is and which columns matter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub row_index: usize,
    pub time_column: usize,
    pub temperature_column: usize,
}

// ---------------------------------------------------------------------------
// RawSample – one extracted data row, still unparsed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    pub time_text: String,
    pub temperature_text: String,
}

// ---------------------------------------------------------------------------
// Sample / Series – the normalized dataset
// ---------------------------------------------------------------------------

/// One normalized reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
}

/// Timestamps are plotted as seconds since the Unix epoch.
pub fn timestamp_secs(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

/// The full time-sorted series. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// `samples` must already be sorted ascending by timestamp; the
    /// normalizer is the only producer.
    pub fn new(samples: Vec<Sample>) -> Self {
        debug_assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        Series { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last timestamp, i.e. the x-axis domain.
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.timestamp, last.timestamp))
    }

    /// Distinct calendar days present, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = Vec::new();
        for s in &self.samples {
            let d = s.timestamp.date();
            if !days.contains(&d) {
                days.push(d);
            }
        }
        days
    }

    /// Central-difference slope estimate at `index`, in °C per hour.
    ///
    /// Boundary points fall back to a one-sided difference. Duplicate
    /// timestamps (zero elapsed time) yield 0.0 rather than dividing by
    /// zero; so does a series with fewer than two samples.
    pub fn slope_at(&self, index: usize) -> f64 {
        let n = self.samples.len();
        if n < 2 {
            return 0.0;
        }
        let (a, b) = if index == 0 {
            (0, 1)
        } else if index >= n - 1 {
            (n - 2, n - 1)
        } else {
            (index - 1, index + 1)
        };
        let elapsed: TimeDelta = self.samples[b].timestamp - self.samples[a].timestamp;
        let hours = elapsed.num_seconds() as f64 / 3600.0;
        if hours == 0.0 {
            return 0.0;
        }
        (self.samples[b].temperature - self.samples[a].temperature) / hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, temp: f64) -> Sample {
        Sample {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            temperature: temp,
        }
    }

    fn three_point_series() -> Series {
        Series::new(vec![at(0, 20.0), at(1, 22.0), at(2, 21.0)])
    }

    #[test]
    fn slope_interior_uses_central_difference() {
        let s = three_point_series();
        assert_eq!(s.slope_at(1), (21.0 - 20.0) / 2.0);
    }

    #[test]
    fn slope_boundaries_use_one_sided_difference() {
        let s = three_point_series();
        assert_eq!(s.slope_at(0), (22.0 - 20.0) / 1.0);
        assert_eq!(s.slope_at(2), (21.0 - 22.0) / 1.0);
    }

    #[test]
    fn slope_with_duplicate_timestamps_is_zero() {
        let s = Series::new(vec![at(3, 20.0), at(3, 25.0)]);
        assert_eq!(s.slope_at(0), 0.0);
        assert_eq!(s.slope_at(1), 0.0);
    }

    #[test]
    fn slope_of_tiny_series_is_zero() {
        assert_eq!(Series::new(vec![at(0, 20.0)]).slope_at(0), 0.0);
        assert_eq!(Series::new(Vec::new()).slope_at(0), 0.0);
    }

    #[test]
    fn cell_text_representations() {
        assert_eq!(Cell::Empty.text(), None);
        assert_eq!(Cell::Text("23.5°C".into()).text().as_deref(), Some("23.5°C"));
        assert_eq!(Cell::Number(23.5).text().as_deref(), Some("23.5"));
        let t = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 0)
            .unwrap();
        assert_eq!(Cell::DateTime(t).text().as_deref(), Some("2024-01-02 03:04:00"));
    }

    #[test]
    fn days_are_distinct_and_ascending() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let s = Series::new(vec![
            Sample { timestamp: d1.and_hms_opt(23, 0, 0).unwrap(), temperature: 20.0 },
            Sample { timestamp: d2.and_hms_opt(0, 30, 0).unwrap(), temperature: 21.0 },
            Sample { timestamp: d2.and_hms_opt(2, 0, 0).unwrap(), temperature: 22.0 },
        ]);
        assert_eq!(s.days(), vec![d1, d2]);
    }
}
