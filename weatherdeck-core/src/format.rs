//! Projection of the raw `/current` payload into a render-ready report.

use crate::model::{CurrentPayload, ReportConditions, ReportLocation, WeatherReport};

/// Flatten a `/current` payload into a [`WeatherReport`].
///
/// Pure projection: field renaming and selection only, no unit conversion.
/// Returns `None` when the payload has no `current` block, which is the
/// caller's "no data" signal.
pub fn format_report(payload: &CurrentPayload) -> Option<WeatherReport> {
    let current = payload.current.as_ref()?;

    let location = payload.location.as_ref().map_or_else(ReportLocation::default, |loc| {
        ReportLocation {
            name: loc.name.clone(),
            country: loc.country.clone(),
            region: loc.region.clone(),
            lat: loc.lat,
            lon: loc.lon,
            timezone: loc.timezone_id.clone(),
            localtime: loc.localtime.clone(),
        }
    });

    let description = current
        .weather_descriptions
        .first()
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());

    Some(WeatherReport {
        location,
        current: ReportConditions {
            temperature: current.temperature,
            feels_like: current.feelslike,
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            wind_dir: current.wind_dir.clone(),
            pressure: current.pressure,
            precipitation: current.precip,
            cloud_cover: current.cloudcover,
            visibility: current.visibility,
            uv_index: current.uv_index,
            description,
            icon: current.weather_icons.first().cloned(),
            is_day: current.is_day.as_deref() == Some("yes"),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, LocationInfo};

    fn sample_payload() -> CurrentPayload {
        CurrentPayload {
            location: Some(LocationInfo {
                name: Some("Paris".to_string()),
                country: Some("France".to_string()),
                region: Some("Ile-de-France".to_string()),
                lat: Some(48.867),
                lon: Some(2.333),
                timezone_id: Some("Europe/Paris".to_string()),
                localtime: Some("2026-08-26 14:00".to_string()),
            }),
            current: Some(CurrentConditions {
                temperature: Some(18.0),
                feelslike: Some(17.0),
                humidity: Some(72.0),
                wind_speed: Some(11.0),
                wind_dir: Some("WSW".to_string()),
                pressure: Some(1012.0),
                precip: Some(0.2),
                cloudcover: Some(75.0),
                visibility: Some(10.0),
                uv_index: Some(4.0),
                weather_descriptions: vec!["Partly cloudy".to_string()],
                weather_icons: vec!["https://cdn.example/icon.png".to_string()],
                is_day: Some("yes".to_string()),
            }),
        }
    }

    #[test]
    fn missing_current_block_yields_none() {
        assert!(format_report(&CurrentPayload::default()).is_none());

        let location_only = CurrentPayload {
            location: Some(LocationInfo::default()),
            current: None,
        };
        assert!(format_report(&location_only).is_none());
    }

    #[test]
    fn projection_renames_fields() {
        let report = format_report(&sample_payload()).expect("payload has current block");

        assert_eq!(report.location.name.as_deref(), Some("Paris"));
        assert_eq!(report.location.timezone.as_deref(), Some("Europe/Paris"));
        assert_eq!(report.current.temperature, Some(18.0));
        assert_eq!(report.current.feels_like, Some(17.0));
        assert_eq!(report.current.precipitation, Some(0.2));
        assert_eq!(report.current.cloud_cover, Some(75.0));
        assert_eq!(report.current.description, "Partly cloudy");
        assert!(report.current.is_day);
    }

    #[test]
    fn projection_is_pure() {
        let payload = sample_payload();
        let first = format_report(&payload);
        let second = format_report(&payload);
        assert_eq!(first, second);
    }

    #[test]
    fn sparse_current_defaults() {
        let payload = CurrentPayload {
            location: None,
            current: Some(CurrentConditions::default()),
        };
        let report = format_report(&payload).expect("empty current block still formats");

        assert_eq!(report.location, ReportLocation::default());
        assert_eq!(report.current.description, "Unknown");
        assert_eq!(report.current.icon, None);
        assert!(!report.current.is_day);
    }

    #[test]
    fn is_day_no_maps_to_false() {
        let payload = CurrentPayload {
            location: None,
            current: Some(CurrentConditions {
                is_day: Some("no".to_string()),
                ..CurrentConditions::default()
            }),
        };
        assert!(!format_report(&payload).unwrap().current.is_day);
    }
}
