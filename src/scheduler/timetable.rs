//! Clock-time parsing and the half-hour-block occupancy bitmap.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::scheduler::errors::SchedulerError;

/// A day of the instructional week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    fn index(self) -> usize {
        match self {
            Day::Mon => 0,
            Day::Tue => 1,
            Day::Wed => 2,
            Day::Thu => 3,
            Day::Fri => 4,
        }
    }

    fn from_code(c: char) -> Option<Day> {
        match c {
            'M' => Some(Day::Mon),
            'T' => Some(Day::Tue),
            'W' => Some(Day::Wed),
            'R' => Some(Day::Thu),
            'F' => Some(Day::Fri),
            _ => None,
        }
    }

    /// Parses a day-code string such as `"MWF"` or `"TR"` into the set of days it names.
    pub fn parse_set(days: &str) -> Result<Vec<Day>, SchedulerError> {
        days.chars()
            .map(|c| Day::from_code(c).ok_or_else(|| SchedulerError::BadTime(format!("unrecognized day code '{c}' in '{days}'"))))
            .collect()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Day::Mon => "M",
            Day::Tue => "T",
            Day::Wed => "W",
            Day::Thu => "R",
            Day::Fri => "F",
        };
        write!(f, "{s}")
    }
}

/// A parsed wall-clock time, represented as the half-hour block it falls into.
///
/// Block 0 is 12:00-12:30 AM; block 24 is 12:00-12:30 PM; block 47 is 11:30 PM-midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockTime(pub u8);

impl BlockTime {
    /// Parses a clock string of the exact form `HH:MM AM` / `HH:MM PM`.
    pub fn parse(s: &str) -> Result<BlockTime, SchedulerError> {
        let (time_part, meridiem) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| SchedulerError::BadTime(format!("malformed clock time '{s}'")))?;

        let is_pm = match meridiem {
            "AM" => false,
            "PM" => true,
            _ => return Err(SchedulerError::BadTime(format!("expected AM/PM, got '{meridiem}' in '{s}'"))),
        };

        let (hh, mm) = time_part
            .split_once(':')
            .ok_or_else(|| SchedulerError::BadTime(format!("malformed clock time '{s}'")))?;

        let hh: u32 = hh
            .parse()
            .map_err(|_| SchedulerError::BadTime(format!("malformed hour in '{s}'")))?;
        let mm: u32 = mm
            .parse()
            .map_err(|_| SchedulerError::BadTime(format!("malformed minute in '{s}'")))?;

        if !(1..=12).contains(&hh) || mm > 59 {
            return Err(SchedulerError::BadTime(format!("hour/minute out of range in '{s}'")));
        }

        let block = (hh % 12 + if is_pm { 12 } else { 0 }) * 2 + mm / 30;
        Ok(BlockTime(block as u8))
    }
}

/// Per-day half-hour occupancy bitmap. Bits above 47 are reserved and always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableRange {
    words: [u64; 5],
}

impl TimetableRange {
    pub fn empty() -> Self {
        TimetableRange::default()
    }

    /// Builds a range covering the closed block interval `[start, end]` on every day in `days`.
    pub fn from_days(days: &[Day], start: BlockTime, end: BlockTime) -> Result<Self, SchedulerError> {
        if start.0 > end.0 {
            return Err(SchedulerError::BadTime(format!(
                "start block {} is after end block {}",
                start.0, end.0
            )));
        }
        let mut words = [0u64; 5];
        let mask = interval_mask(start.0, end.0);
        for day in days {
            words[day.index()] |= mask;
        }
        Ok(TimetableRange { words })
    }

    /// True iff any day has a bit set in both ranges.
    pub fn overlaps(&self, other: &TimetableRange) -> bool {
        Day::ALL
            .iter()
            .any(|d| self.words[d.index()] & other.words[d.index()] != 0)
    }
}

/// `(2^(end+1) - 2^start)`: all bits in the closed interval `[start, end]` set.
fn interval_mask(start: u8, end: u8) -> u64 {
    let high = if end >= 63 { u64::MAX } else { (1u64 << (end + 1)) - 1 };
    let low = (1u64 << start) - 1;
    high & !low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_midnight_and_noon() {
        assert_eq!(BlockTime::parse("12:00 AM").unwrap().0, 0);
        assert_eq!(BlockTime::parse("12:00 PM").unwrap().0, 24);
    }

    #[test]
    fn parses_half_hour_increments_across_the_day() {
        let mut blocks: Vec<u8> = Vec::new();
        for hh in 1..=12u32 {
            for mm in [0u32, 30] {
                for ampm in ["AM", "PM"] {
                    let s = format!("{hh:02}:{mm:02} {ampm}");
                    blocks.push(BlockTime::parse(&s).unwrap().0);
                }
            }
        }
        blocks.sort_unstable();
        blocks.dedup();
        assert_eq!(blocks.len(), 48);
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(BlockTime::parse("25:00 AM").is_err());
        assert!(BlockTime::parse("9:00").is_err());
        assert!(BlockTime::parse("9:00 XM").is_err());
    }

    #[test]
    fn mwf_range_overlaps_itself_not_tr() {
        let mwf = Day::parse_set("MWF").unwrap();
        let tr = Day::parse_set("TR").unwrap();
        let a = TimetableRange::from_days(&mwf, BlockTime::parse("09:00 AM").unwrap(), BlockTime::parse("09:50 AM").unwrap()).unwrap();
        let b = TimetableRange::from_days(&tr, BlockTime::parse("09:00 AM").unwrap(), BlockTime::parse("09:50 AM").unwrap()).unwrap();
        assert!(a.overlaps(&a));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn shared_half_hour_block_overlaps() {
        let mwf = Day::parse_set("MWF").unwrap();
        let m = Day::parse_set("M").unwrap();
        let a = TimetableRange::from_days(&mwf, BlockTime::parse("09:00 AM").unwrap(), BlockTime::parse("09:50 AM").unwrap()).unwrap();
        let b = TimetableRange::from_days(&m, BlockTime::parse("09:30 AM").unwrap(), BlockTime::parse("10:20 AM").unwrap()).unwrap();
        assert!(a.overlaps(&b));
    }

    #[test]
    fn abutting_times_overlap_within_shared_block() {
        let m = Day::parse_set("M").unwrap();
        let a = TimetableRange::from_days(&m, BlockTime::parse("10:00 AM").unwrap(), BlockTime::parse("10:50 AM").unwrap()).unwrap();
        let b = TimetableRange::from_days(&m, BlockTime::parse("10:30 AM").unwrap(), BlockTime::parse("11:20 AM").unwrap()).unwrap();
        assert!(a.overlaps(&b));
    }
}
