/// Formats a duration given in seconds as "MM:SSs".
pub fn format_time(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    let minutes = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}s", minutes, secs)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00s");
        assert_eq!(format_time(65.0), "01:05s");
        assert_eq!(format_time(3600.0), "60:00s");
    }
}
