//! In-game clock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Days in every month of the game calendar.
pub const DAYS_PER_MONTH: i64 = 30;
/// Months in a year.
pub const MONTHS_PER_YEAR: i64 = 12;
/// Days in a year (12 x 30).
pub const DAYS_PER_YEAR: i64 = DAYS_PER_MONTH * MONTHS_PER_YEAR;

const MINUTES_PER_DAY: i64 = 24 * 60;
/// Years beyond this would overflow minute arithmetic.
const MAX_YEAR: i64 = i64::MAX / (DAYS_PER_YEAR * MINUTES_PER_DAY * 2);

/// Season of the year, derived from the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// Months 3-5.
    Spring,
    /// Months 6-8.
    Summer,
    /// Months 9-11.
    Autumn,
    /// Months 12, 1 and 2.
    Winter,
}

impl Season {
    /// Season for a 1-based month.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    /// Lowercase name used in conditions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    /// Day 0.
    Sunday,
    /// Day 1.
    Monday,
    /// Day 2.
    Tuesday,
    /// Day 3.
    Wednesday,
    /// Day 4.
    Thursday,
    /// Day 5.
    Friday,
    /// Day 6.
    Saturday,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Weekday from a 0-based index, Sunday = 0.
    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % 7) as usize]
    }

    /// Capitalized name, as written in conditions (`time.weekday==Saturday`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Saturday or Sunday.
    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

/// Coarse part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPeriod {
    /// 05:00-11:59.
    Morning,
    /// 12:00-17:59.
    Afternoon,
    /// 18:00-21:59.
    Evening,
    /// 22:00-04:59.
    Night,
}

impl DayPeriod {
    /// Period containing the given hour.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Lowercase name used in conditions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

/// The in-game date and time.
///
/// Uses a simplified 360-day year (12 months x 30 days). Time only moves
/// when a caller invokes [`GameClock::advance_minutes`]. Deserialized
/// clocks are normalized the same way [`GameClock::new`] clamps its inputs,
/// and `season` is recomputed from `month`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ClockFields")]
pub struct GameClock {
    /// Year number.
    pub year: i64,
    /// Month, 1-12.
    pub month: u32,
    /// Day of the month, 1-30.
    pub day_of_month: u32,
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
    /// Free-form weather tag (`clear`, `rain`, ...).
    pub weather: String,
    /// Season, kept in step with `month`.
    pub season: Season,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(1, 3, 1, 8, 0)
    }
}

/// Wire form of [`GameClock`], accepted as-is and normalized on conversion.
#[derive(Deserialize)]
#[serde(default)]
struct ClockFields {
    year: i64,
    month: u32,
    day_of_month: u32,
    hour: u32,
    minute: u32,
    weather: String,
}

impl Default for ClockFields {
    fn default() -> Self {
        let clock = GameClock::default();
        Self {
            year: clock.year,
            month: clock.month,
            day_of_month: clock.day_of_month,
            hour: clock.hour,
            minute: clock.minute,
            weather: clock.weather,
        }
    }
}

impl From<ClockFields> for GameClock {
    fn from(raw: ClockFields) -> Self {
        let mut clock = GameClock::new(
            raw.year.clamp(-MAX_YEAR, MAX_YEAR),
            raw.month,
            raw.day_of_month,
            raw.hour,
            raw.minute,
        );
        clock.weather = raw.weather;
        clock
    }
}

impl GameClock {
    /// Create a clock at the given date and time with clear weather.
    pub fn new(year: i64, month: u32, day_of_month: u32, hour: u32, minute: u32) -> Self {
        let month = month.clamp(1, 12);
        Self {
            year: year.clamp(-MAX_YEAR, MAX_YEAR),
            month,
            day_of_month: day_of_month.clamp(1, DAYS_PER_MONTH as u32),
            hour: hour.min(23),
            minute: minute.min(59),
            weather: "clear".to_string(),
            season: Season::from_month(month),
        }
    }

    /// Days since year 0, month 1, day 1.
    pub fn absolute_day(&self) -> i64 {
        self.year
            .saturating_mul(DAYS_PER_YEAR)
            .saturating_add((self.month as i64 - 1) * DAYS_PER_MONTH)
            .saturating_add(self.day_of_month as i64 - 1)
    }

    fn absolute_minute(&self) -> i64 {
        self.absolute_day()
            .saturating_mul(MINUTES_PER_DAY)
            .saturating_add(self.hour as i64 * 60 + self.minute as i64)
    }

    /// Move the clock forward, rolling over days, months, and years.
    pub fn advance_minutes(&mut self, minutes: u64) {
        let minutes = i64::try_from(minutes).unwrap_or(i64::MAX / 2);
        let total = self.absolute_minute().saturating_add(minutes);

        let abs_day = total.div_euclid(MINUTES_PER_DAY);
        let minute_of_day = total.rem_euclid(MINUTES_PER_DAY);

        self.year = abs_day.div_euclid(DAYS_PER_YEAR);
        let day_of_year = abs_day.rem_euclid(DAYS_PER_YEAR);
        self.month = (day_of_year / DAYS_PER_MONTH + 1) as u32;
        self.day_of_month = (day_of_year % DAYS_PER_MONTH + 1) as u32;
        self.hour = (minute_of_day / 60) as u32;
        self.minute = (minute_of_day % 60) as u32;
        self.season = Season::from_month(self.month);
    }

    /// Day of the week.
    ///
    /// Every month is treated as starting `(month-1)*30 % 7` days into the
    /// week; the year does not shift the weekday. Job shift scheduling relies
    /// on this exact arithmetic.
    pub fn weekday(&self) -> Weekday {
        let month_offset = (self.month.saturating_sub(1) * 30) % 7;
        Weekday::from_index((month_offset + self.day_of_month.saturating_sub(1)) % 7)
    }

    /// Part of the day for the current hour.
    pub fn period(&self) -> DayPeriod {
        DayPeriod::from_hour(self.hour)
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year {}, month {}, day {} ({}), {:02}:{:02}",
            self.year,
            self.month,
            self.day_of_month,
            self.weekday().name(),
            self.hour,
            self.minute
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_follows_thirty_day_months() {
        assert_eq!(GameClock::new(1, 1, 1, 0, 0).weekday(), Weekday::Sunday);
        assert_eq!(GameClock::new(1, 1, 7, 0, 0).weekday(), Weekday::Saturday);
        // (30 % 7) = 2, so month 2 starts on a Tuesday.
        assert_eq!(GameClock::new(1, 2, 1, 0, 0).weekday(), Weekday::Tuesday);
        // (330 % 7) = 1, and day 5 adds 4.
        assert_eq!(GameClock::new(9, 12, 5, 0, 0).weekday(), Weekday::Friday);
    }

    #[test]
    fn weekday_ignores_year() {
        let a = GameClock::new(1, 4, 10, 0, 0).weekday();
        let b = GameClock::new(7, 4, 10, 0, 0).weekday();
        assert_eq!(a, b);
    }

    #[test]
    fn advance_rolls_over_midnight() {
        let mut clock = GameClock::new(1, 3, 1, 23, 30);
        clock.advance_minutes(45);
        assert_eq!(clock.day_of_month, 2);
        assert_eq!(clock.hour, 0);
        assert_eq!(clock.minute, 15);
    }

    #[test]
    fn advance_rolls_over_year_and_updates_season() {
        let mut clock = GameClock::new(1, 12, 30, 12, 0);
        clock.advance_minutes(24 * 60);
        assert_eq!(clock.year, 2);
        assert_eq!(clock.month, 1);
        assert_eq!(clock.day_of_month, 1);
        assert_eq!(clock.season, Season::Winter);

        clock.advance_minutes(60 * 24 * 60);
        assert_eq!(clock.month, 3);
        assert_eq!(clock.season, Season::Spring);
    }

    #[test]
    fn absolute_day_counts_whole_calendar() {
        let clock = GameClock::new(2, 3, 5, 0, 0);
        assert_eq!(clock.absolute_day(), 2 * 360 + 60 + 4);
    }

    #[test]
    fn deserialized_clock_is_normalized() {
        let clock: GameClock =
            serde_json::from_str(r#"{"month":0,"day_of_month":0,"hour":40,"minute":99}"#)
                .unwrap();
        assert_eq!((clock.month, clock.day_of_month), (1, 1));
        assert_eq!((clock.hour, clock.minute), (23, 59));
        assert_eq!(clock.season, Season::Winter);
        assert_eq!(clock.weekday(), Weekday::Sunday);

        let clock: GameClock = serde_json::from_str(r#"{"month":7,"season":"winter"}"#).unwrap();
        assert_eq!(clock.season, Season::Summer);
        assert_eq!(clock.day_of_month, 1);
        assert_eq!(clock.weather, "clear");
    }

    #[test]
    fn huge_year_does_not_overflow() {
        let mut clock: GameClock =
            serde_json::from_str(&format!(r#"{{"year":{}}}"#, i64::MAX)).unwrap();
        clock.advance_minutes(u64::MAX);
        assert!(clock.absolute_day() > 0);
    }

    #[test]
    fn periods() {
        assert_eq!(DayPeriod::from_hour(6), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(12), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(20), DayPeriod::Evening);
        assert_eq!(DayPeriod::from_hour(2), DayPeriod::Night);
    }
}
