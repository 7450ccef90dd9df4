use chrono::NaiveDate;
use dayboard::api::weather::{bucket_hourly, describe, HourlyWire};

#[test]
fn known_codes_map_to_descriptions() {
    assert_eq!(describe(0), "Clear sky");
    assert_eq!(describe(3), "Overcast");
    assert_eq!(describe(61), "Slight rain");
    assert_eq!(describe(95), "Thunderstorm");
}

#[test]
fn unknown_codes_fall_back_to_unknown() {
    assert_eq!(describe(42), "Unknown");
    assert_eq!(describe(100), "Unknown");
}

#[test]
fn hourly_forecast_is_bucketed_into_today_and_tomorrow() {
    let hourly = HourlyWire {
        time: vec![
            "2025-03-10T08:00".to_string(), // already past
            "2025-03-10T14:00".to_string(),
            "2025-03-10T18:00".to_string(),
            "2025-03-11T09:00".to_string(),
        ],
        temperature_2m: vec![5.4, 8.6, 7.2, 6.1],
        apparent_temperature: vec![3.0, 7.5, 6.0, 4.4],
        precipitation_probability: vec![Some(10.0), Some(35.0), None, Some(80.0)],
        weathercode: vec![0, 2, 3, 61],
        windspeed_10m: vec![12.0, 15.5, 14.0, 20.1],
    };
    let now = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(12, 0, 0).unwrap();

    let (today, tomorrow) = bucket_hourly(&hourly, now);

    let today_times: Vec<&str> = today.iter().map(|hour| hour.time.as_str()).collect();
    assert_eq!(today_times, vec!["14:00", "18:00"]);
    assert_eq!(tomorrow.len(), 1);
    assert_eq!(tomorrow[0].time, "09:00");

    // Temperatures are rounded, codes described, precipitation optional
    assert_eq!(today[0].temp, 9);
    assert_eq!(today[0].feels_like, 8);
    assert_eq!(today[0].description, "Partly cloudy");
    assert_eq!(today[1].precipitation_prob, None);
    assert_eq!(tomorrow[0].description, "Slight rain");
}
