//! Day-part aggregation of the hourly forecast
//!
//! Records are bucketed by local date and day part, then each bucket is
//! reduced to one [`Segment`]: the most frequent weather code, the rounded
//! temperature span and optionally the rounded mean humidity.

use chrono::{DateTime, Days, NaiveDate, Timelike};
use chrono_tz::Tz;
use domain::{DayForecast, DayPart, HourlyRecord, Segment, TemperatureRange, WeatherCode};

/// Largest forecast horizon, in days including today
pub const MAX_FORECAST_DAYS: u8 = 3;

/// What the segmenter should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterOptions {
    /// Days to cover, today included (clamped to [`MAX_FORECAST_DAYS`])
    pub days: u8,
    /// Whether to compute the mean humidity of each segment
    pub include_humidity: bool,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            days: MAX_FORECAST_DAYS,
            include_humidity: false,
        }
    }
}

/// Most frequent value; the value seen first wins a tie
pub fn most_frequent<T, I>(values: I) -> Option<T>
where
    T: PartialEq + Copy,
    I: IntoIterator<Item = T>,
{
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Bucket the records of `date` by day part, in [`DayPart::ALL`] order
///
/// Records are assumed to be sorted; each bucket keeps the input order.
#[must_use]
pub fn partition_day<'a>(
    records: &[&'a HourlyRecord],
    date: NaiveDate,
    tz: Tz,
) -> [Vec<&'a HourlyRecord>; 4] {
    let mut buckets: [Vec<&HourlyRecord>; 4] = Default::default();
    for record in records {
        let local = record.timestamp.with_timezone(&tz);
        if local.date_naive() != date {
            continue;
        }
        let part = DayPart::from_hour(local.hour());
        buckets[part as usize].push(record);
    }
    buckets
}

/// Reduce one bucket to a segment
#[must_use]
pub fn aggregate(
    part: DayPart,
    is_current: bool,
    records: &[&HourlyRecord],
    include_humidity: bool,
) -> Segment {
    let description = most_frequent(records.iter().filter_map(|r| r.weather_code))
        .and_then(WeatherCode::description)
        .unwrap_or_default()
        .to_string();

    let temperatures: Vec<f64> = records.iter().filter_map(|r| r.temperature).collect();
    let temperature = temperatures
        .iter()
        .copied()
        .reduce(f64::min)
        .zip(temperatures.iter().copied().reduce(f64::max))
        .map(|(min, max)| TemperatureRange {
            min: round_to_i64(min),
            max: round_to_i64(max),
        });

    let humidity_avg = if include_humidity {
        let humidities: Vec<f64> = records.iter().filter_map(|r| r.humidity).collect();
        mean(&humidities).map(round_to_i64)
    } else {
        None
    };

    Segment {
        part,
        is_current,
        description,
        temperature,
        humidity_avg,
    }
}

/// Build the per-day forecast starting from the local date of `now`
///
/// On the current day, parts that have already ended are dropped and the
/// part containing `now` is flagged current. Segments with neither a
/// description nor a temperature span are dropped; days left without any
/// segment are omitted.
#[must_use]
pub fn segment_forecast(
    records: &[HourlyRecord],
    now: DateTime<Tz>,
    options: SegmenterOptions,
) -> Vec<DayForecast> {
    let tz = now.timezone();
    let today = now.date_naive();
    let current_part = DayPart::from_hour(now.hour());

    let mut sorted: Vec<&HourlyRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.timestamp);

    let days = options.days.min(MAX_FORECAST_DAYS);
    let mut forecast = Vec::with_capacity(usize::from(days));

    for offset in 0..u32::from(days) {
        let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let buckets = partition_day(&sorted, date, tz);

        let segments: Vec<Segment> = DayPart::ALL
            .into_iter()
            .zip(buckets.iter())
            .filter(|(part, _)| offset > 0 || *part >= current_part)
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(part, bucket)| {
                let is_current = offset == 0 && part == current_part;
                aggregate(part, is_current, bucket, options.include_humidity)
            })
            .filter(|segment| !segment.is_empty())
            .collect();

        if !segments.is_empty() {
            forecast.push(DayForecast {
                offset,
                date,
                segments,
            });
        }
    }

    forecast
}
