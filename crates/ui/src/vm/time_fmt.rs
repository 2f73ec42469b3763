use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Clock time of a received event, e.g. `14:03:27`.
#[must_use]
pub fn format_clock(value: DateTime<Utc>) -> String {
    value.format("%H:%M:%S").to_string()
}

/// Scheduled slot, e.g. `Tue, Jan 7 at 18:00`.
#[must_use]
pub fn format_schedule(value: NaiveDateTime) -> String {
    value.format("%a, %b %-d at %H:%M").to_string()
}

#[must_use]
pub fn format_day(value: NaiveDateTime) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// Value for an `<input type="date">`.
#[must_use]
pub fn format_date_input(value: Option<NaiveDate>) -> String {
    value.map(|date| date.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

#[must_use]
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0} h")
    } else {
        format!("{hours:.1} h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn schedule_reads_naturally() {
        assert_eq!(format_schedule(at(7, 18, 0)), "Tue, Jan 7 at 18:00");
        assert_eq!(format_day(at(7, 18, 0)), "Jan 7, 2025");
    }

    #[test]
    fn durations_pick_units() {
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(60), "1 h");
        assert_eq!(format_minutes(90), "1 h 30 min");
        assert_eq!(format_hours(3.0), "3 h");
        assert_eq!(format_hours(2.5), "2.5 h");
    }

    #[test]
    fn date_input_is_blank_when_unset() {
        assert_eq!(format_date_input(None), "");
        assert_eq!(
            format_date_input(NaiveDate::from_ymd_opt(2025, 3, 1)),
            "2025-03-01"
        );
    }
}
