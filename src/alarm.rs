//! RTC alarm records.
//!
//! The alarm is made of three time registers starting at
//! [`RegAddr::AlarmSeconds`](crate::RegAddr::AlarmSeconds) and one day/date
//! register at [`RegAddr::AlarmDayDate`](crate::RegAddr::AlarmDayDate).
//! Every register carries a mask flag in bit 7: a masked field is ignored
//! when the alarm is compared against the clock.

use crate::{
    datetime::{from_bcd, to_bcd},
    AlarmDayDateRegister, AlarmTimeRegister,
};

/// Alarm time of day.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    /// Ignore seconds when matching
    pub mask_seconds: bool,
    /// Ignore minutes when matching
    pub mask_minutes: bool,
    /// Ignore hours when matching
    pub mask_hours: bool,
}

fn decode_time_field(raw: AlarmTimeRegister) -> (u8, bool) {
    (from_bcd(raw.value()), raw.masked())
}

fn encode_time_field(value: u8, masked: bool) -> AlarmTimeRegister {
    let mut raw = AlarmTimeRegister::default();
    raw.set_value(to_bcd(value) & 0x7F);
    raw.set_masked(masked);
    raw
}

impl From<[u8; 3]> for AlarmTime {
    fn from(data: [u8; 3]) -> Self {
        let (seconds, mask_seconds) = decode_time_field(AlarmTimeRegister::from(data[0]));
        let (minutes, mask_minutes) = decode_time_field(AlarmTimeRegister::from(data[1]));
        let (hours, mask_hours) = decode_time_field(AlarmTimeRegister::from(data[2]));
        AlarmTime {
            seconds,
            minutes,
            hours,
            mask_seconds,
            mask_minutes,
            mask_hours,
        }
    }
}

impl From<&AlarmTime> for [u8; 3] {
    fn from(alarm: &AlarmTime) -> [u8; 3] {
        [
            encode_time_field(alarm.seconds, alarm.mask_seconds).into(),
            encode_time_field(alarm.minutes, alarm.mask_minutes).into(),
            encode_time_field(alarm.hours, alarm.mask_hours).into(),
        ]
    }
}

/// Alarm day of week or day of month.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmDayDate {
    /// Weekday (0-7) when `is_weekday_alarm` is set, day of month otherwise
    pub value: u8,
    pub is_weekday_alarm: bool,
    /// Ignore the day/date when matching
    pub day_date_masked: bool,
}

impl From<AlarmDayDateRegister> for AlarmDayDate {
    fn from(raw: AlarmDayDateRegister) -> Self {
        let value = if raw.weekday() {
            raw.value() & 0x07
        } else {
            from_bcd(raw.value())
        };
        AlarmDayDate {
            value,
            is_weekday_alarm: raw.weekday(),
            day_date_masked: raw.masked(),
        }
    }
}

impl From<AlarmDayDate> for AlarmDayDateRegister {
    fn from(alarm: AlarmDayDate) -> Self {
        let mut raw = AlarmDayDateRegister::default();
        raw.set_masked(alarm.day_date_masked);
        raw.set_weekday(alarm.is_weekday_alarm);
        if alarm.is_weekday_alarm {
            raw.set_value(alarm.value & 0x07);
        } else {
            // the setter keeps the BCD value out of the weekday flag
            raw.set_value(to_bcd(alarm.value & 0x3F));
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_time_decode() {
        let alarm = AlarmTime::from([0xD9, 0x30, 0x80 | 0x23]);
        assert_eq!(alarm.seconds, 59);
        assert!(alarm.mask_seconds);
        assert_eq!(alarm.minutes, 30);
        assert!(!alarm.mask_minutes);
        assert_eq!(alarm.hours, 23);
        assert!(alarm.mask_hours);
    }

    #[test]
    fn test_alarm_time_encode() {
        let alarm = AlarmTime {
            seconds: 0,
            minutes: 45,
            hours: 7,
            mask_seconds: true,
            mask_minutes: false,
            mask_hours: false,
        };
        let data: [u8; 3] = (&alarm).into();
        assert_eq!(data, [0x80, 0x45, 0x07]);
    }

    #[test]
    fn test_alarm_time_round_trip() {
        for value in 0..=79u8 {
            for masked in [false, true] {
                let alarm = AlarmTime {
                    seconds: value,
                    minutes: value,
                    hours: value,
                    mask_seconds: masked,
                    mask_minutes: !masked,
                    mask_hours: masked,
                };
                let data: [u8; 3] = (&alarm).into();
                assert_eq!(AlarmTime::from(data), alarm);
            }
        }
    }

    #[test]
    fn test_alarm_day_date_weekday() {
        let alarm = AlarmDayDate {
            value: 5,
            is_weekday_alarm: true,
            day_date_masked: false,
        };
        assert_eq!(u8::from(AlarmDayDateRegister::from(alarm)), 0b0100_0101);

        // weekday keeps 3 bits only
        let alarm = AlarmDayDate {
            value: 0x0D,
            is_weekday_alarm: true,
            day_date_masked: true,
        };
        assert_eq!(u8::from(AlarmDayDateRegister::from(alarm)), 0b1100_0101);
    }

    #[test]
    fn test_alarm_day_date_day_of_month() {
        let alarm = AlarmDayDate {
            value: 31,
            is_weekday_alarm: false,
            day_date_masked: true,
        };
        assert_eq!(u8::from(AlarmDayDateRegister::from(alarm)), 0b1011_0001);
        assert_eq!(
            AlarmDayDate::from(AlarmDayDateRegister::from(0b1011_0001)),
            alarm
        );
    }

    #[test]
    fn test_alarm_day_date_round_trip() {
        for day_date_masked in [false, true] {
            for value in 0..8u8 {
                let alarm = AlarmDayDate {
                    value,
                    is_weekday_alarm: true,
                    day_date_masked,
                };
                assert_eq!(AlarmDayDate::from(AlarmDayDateRegister::from(alarm)), alarm);
            }
            for value in 0..=39u8 {
                let alarm = AlarmDayDate {
                    value,
                    is_weekday_alarm: false,
                    day_date_masked,
                };
                assert_eq!(AlarmDayDate::from(AlarmDayDateRegister::from(alarm)), alarm);
            }
        }
    }

    #[test]
    fn test_alarm_day_date_out_of_range_keeps_mode_flag() {
        let alarm = AlarmDayDate {
            value: 45,
            is_weekday_alarm: false,
            day_date_masked: false,
        };
        let raw = AlarmDayDateRegister::from(alarm);
        assert!(!raw.weekday());
        assert!(!raw.masked());
    }
}
