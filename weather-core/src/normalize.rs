//! Reduces a provider location record into an ordered list of forecast
//! intervals.
//!
//! The provider ships one time series per weather element (`Wx`, `PoP`, ...)
//! and relies on every series being index aligned. We walk the first series
//! for timing and fold each recognized element into the matching interval
//! field. Unknown element names are skipped so upstream additions never break
//! existing clients.

use crate::{
    error::ForecastError,
    model::{ForecastInterval, LocationRecord},
};

type FieldSlot = fn(&mut ForecastInterval) -> &mut String;

fn weather(i: &mut ForecastInterval) -> &mut String {
    &mut i.weather
}

fn rain(i: &mut ForecastInterval) -> &mut String {
    &mut i.rain
}

fn min_temp(i: &mut ForecastInterval) -> &mut String {
    &mut i.min_temp
}

fn max_temp(i: &mut ForecastInterval) -> &mut String {
    &mut i.max_temp
}

fn comfort(i: &mut ForecastInterval) -> &mut String {
    &mut i.comfort
}

fn wind_speed(i: &mut ForecastInterval) -> &mut String {
    &mut i.wind_speed
}

/// Recognized element tags, the field each one fills, and the suffix appended
/// to its value.
const ELEMENT_FIELDS: &[(&str, FieldSlot, &str)] = &[
    ("Wx", weather, ""),
    ("PoP", rain, "%"),
    ("MinT", min_temp, "°C"),
    ("MaxT", max_temp, "°C"),
    ("CI", comfort, ""),
    ("WS", wind_speed, ""),
];

fn field_for(tag: &str) -> Option<(FieldSlot, &'static str)> {
    ELEMENT_FIELDS
        .iter()
        .find(|(name, _, _)| *name == tag)
        .map(|(_, slot, suffix)| (*slot, *suffix))
}

/// Normalize one location record.
///
/// Fails with [`ForecastError::MalformedUpstreamData`] if the record has no
/// elements or if any element's series is not aligned with the first one.
/// No partial output is produced on failure.
pub fn normalize(location: &LocationRecord) -> Result<Vec<ForecastInterval>, ForecastError> {
    let elements = &location.weather_element;
    let first = elements.first().ok_or_else(|| {
        ForecastError::MalformedUpstreamData(format!(
            "location '{}' has no weather elements",
            location.location_name
        ))
    })?;
    let len = first.time.len();

    for element in elements {
        if element.time.len() != len {
            return Err(ForecastError::MalformedUpstreamData(format!(
                "element '{}' has {} time entries, expected {}",
                element.element_name,
                element.time.len(),
                len
            )));
        }

        let misaligned = element.time.iter().zip(&first.time).position(|(entry, anchor)| {
            entry.start_time != anchor.start_time || entry.end_time != anchor.end_time
        });
        if let Some(index) = misaligned {
            return Err(ForecastError::MalformedUpstreamData(format!(
                "element '{}' is misaligned at time index {index}",
                element.element_name
            )));
        }
    }

    let intervals = (0..len)
        .map(|index| {
            let anchor = &first.time[index];
            let mut interval = ForecastInterval {
                start_time: anchor.start_time.clone(),
                end_time: anchor.end_time.clone(),
                ..Default::default()
            };

            for element in elements {
                let Some((slot, suffix)) = field_for(&element.element_name) else {
                    continue;
                };
                let value = &element.time[index].parameter.parameter_name;
                *slot(&mut interval) = format!("{value}{suffix}");
            }

            interval
        })
        .collect();

    Ok(intervals)
}
