use chrono::{NaiveTime, Timelike};

pub fn greeting(time: NaiveTime) -> &'static str {
    match time.hour() {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// 12-hour clock without a leading zero, e.g. `3:07 PM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAnnouncement {
    pub display: String,
    pub utterance: String,
}

pub fn time_announcement(time: NaiveTime) -> TimeAnnouncement {
    let display = format_time(time);
    let utterance = format!("{}. The time is {display}", greeting(time));
    TimeAnnouncement { display, utterance }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn greeting_follows_time_of_day() {
        assert_eq!(greeting(at(0, 0)), "Good morning");
        assert_eq!(greeting(at(11, 59)), "Good morning");
        assert_eq!(greeting(at(12, 0)), "Good afternoon");
        assert_eq!(greeting(at(17, 59)), "Good afternoon");
        assert_eq!(greeting(at(18, 0)), "Good evening");
        assert_eq!(greeting(at(23, 30)), "Good evening");
    }

    #[test]
    fn formats_twelve_hour_time() {
        assert_eq!(format_time(at(15, 7)), "3:07 PM");
        assert_eq!(format_time(at(0, 5)), "12:05 AM");
        assert_eq!(format_time(at(9, 30)), "9:30 AM");
    }

    #[test]
    fn announcement_combines_greeting_and_time() {
        let announcement = time_announcement(at(8, 15));
        assert_eq!(announcement.display, "8:15 AM");
        assert_eq!(announcement.utterance, "Good morning. The time is 8:15 AM");
    }
}
