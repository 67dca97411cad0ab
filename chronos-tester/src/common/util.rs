use chrono::{DateTime, Utc};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// RFC 3339 timestamp stamped on generated reports.
pub fn report_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,full-win,  timeout ");
        assert_eq!(parts, vec!["smoke", "full-win", "timeout"]);
    }

    #[test]
    fn timestamps_are_utc_seconds() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        assert_eq!(report_timestamp(at), "2025-03-14T15:09:26Z");
    }
}
