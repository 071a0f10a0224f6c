//! Register definitions and bitfield structures for the OnOffBTN.
//!
//! This module contains the register map, the enums stored in register
//! fields, and raw bitfield images of every packed register.

use bitfield::bitfield;

/// Default 7-bit I2C address of the OnOffBTN.
pub const DEFAULT_ADDRESS: u8 = 0x59;

/// Bus clock the OnOffBTN is specified for (fast mode).
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Number of pixels on the LED ring.
pub const NUM_PIXELS: usize = 9;

/// Number of subpixels (R, G, B per pixel) in the framebuffer.
pub const NUM_SUBPIXELS: usize = NUM_PIXELS * 3;

/// Size of the user EEPROM region in bytes.
pub const USER_EEPROM_SIZE: usize = 16;

/// Address distance between the on-state and off-state animation registers.
pub const ANIMATION_STRIDE: u8 = 3;

/// Register addresses for the OnOffBTN.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Button status, flags are cleared on read
    Status = 0x00,
    /// Latch and reset triggers
    LatchControl = 0x01,
    /// Long press threshold in ms (16 bit, big endian)
    LongPressThreshold = 0x02,
    /// Hard reset behavior
    HardResetBehavior = 0x04,
    /// Power behavior
    PowerBehavior = 0x05,
    /// Delay between a latch event and power on, in ms (16 bit, big endian)
    OnDelay = 0x06,
    /// Delay between a latch event and power off, in ms (16 bit, big endian)
    OffDelay = 0x08,
    /// Animation selection while powered on
    OnAnimationSelection = 0x0A,
    /// Animation tick speed while powered on
    OnAnimationTickSpeed = 0x0B,
    /// Animation configuration while powered on
    OnAnimationConfiguration = 0x0C,
    /// Animation selection while powered off
    OffAnimationSelection = 0x0D,
    /// Animation tick speed while powered off
    OffAnimationTickSpeed = 0x0E,
    /// Animation configuration while powered off
    OffAnimationConfiguration = 0x0F,
    /// Framebuffer persistence control
    FramebufferControl = 0x10,
    /// First byte of the user EEPROM region
    UserEeprom = 0x30,
    /// Button status mirror, reading does not clear the flags
    StatusPoll = 0x50,
    /// RTC control
    RtcControl = 0xB0,
    /// RTC seconds, first of the 7 date/time registers
    RtcSeconds = 0xB1,
    /// RTC minutes
    RtcMinutes = 0xB2,
    /// RTC hours
    RtcHours = 0xB3,
    /// RTC day of month
    RtcDayOfMonth = 0xB4,
    /// RTC month
    RtcMonth = 0xB5,
    /// RTC year
    RtcYear = 0xB6,
    /// RTC day of week
    RtcDayOfWeek = 0xB7,
    /// Alarm seconds, first of the 3 alarm time registers
    AlarmSeconds = 0xB8,
    /// Alarm minutes
    AlarmMinutes = 0xB9,
    /// Alarm hours
    AlarmHours = 0xBA,
    /// Alarm day/date
    AlarmDayDate = 0xBB,
    /// First byte of the framebuffer
    Framebuffer = 0xD0,
}

impl From<RegAddr> for u8 {
    fn from(v: RegAddr) -> Self {
        v as u8
    }
}

/// Power state selecting one of the two per-state register sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Output is powered
    On = 0,
    /// Output is not powered
    Off = 1,
}

/// One of the three animation registers that exist per power state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationRegister {
    Selection = 0,
    TickSpeed = 1,
    Configuration = 2,
}

impl AnimationRegister {
    /// Address of this register for the given power state.
    pub fn address(self, state: PowerState) -> u8 {
        RegAddr::OnAnimationSelection as u8 + ANIMATION_STRIDE * state as u8 + self as u8
    }
}

/// Delay choices shared by the hard reset and RTC control registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DelayValue {
    Delay100ms = 0b00,
    Delay1000ms = 0b01,
    Delay5000ms = 0b10,
    Delay10000ms = 0b11,
}
impl From<u8> for DelayValue {
    /// Creates a `DelayValue` from a raw 2 bit field, upper bits are ignored.
    fn from(v: u8) -> Self {
        match v & 0b11 {
            0b00 => DelayValue::Delay100ms,
            0b01 => DelayValue::Delay1000ms,
            0b10 => DelayValue::Delay5000ms,
            _ => DelayValue::Delay10000ms,
        }
    }
}
impl From<DelayValue> for u8 {
    fn from(v: DelayValue) -> Self {
        v as u8
    }
}

/// What the OnOffBTN does when the RTC alarm fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcAlarmAction {
    PowerOn = 0b00,
    PowerOff = 0b01,
    Reset = 0b10,
    Toggle = 0b11,
}
impl From<u8> for RtcAlarmAction {
    /// Creates a `RtcAlarmAction` from a raw 2 bit field, upper bits are ignored.
    fn from(v: u8) -> Self {
        match v & 0b11 {
            0b00 => RtcAlarmAction::PowerOn,
            0b01 => RtcAlarmAction::PowerOff,
            0b10 => RtcAlarmAction::Reset,
            _ => RtcAlarmAction::Toggle,
        }
    }
}
impl From<RtcAlarmAction> for u8 {
    fn from(v: RtcAlarmAction) -> Self {
        v as u8
    }
}

/// LED ring animations.
///
/// The selection register is a full byte and the device does not validate
/// it, so values without a name are kept as [`Animation::Other`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Animation {
    None,
    Breath,
    Spinner,
    Flash,
    Flicker,
    Spooky,
    Rainbow,
    LinearFade,
    /// A selection value with no defined animation
    Other(u8),
}
impl From<u8> for Animation {
    fn from(v: u8) -> Self {
        match v {
            0 => Animation::None,
            1 => Animation::Breath,
            2 => Animation::Spinner,
            3 => Animation::Flash,
            4 => Animation::Flicker,
            5 => Animation::Spooky,
            6 => Animation::Rainbow,
            7 => Animation::LinearFade,
            other => Animation::Other(other),
        }
    }
}
impl From<Animation> for u8 {
    fn from(v: Animation) -> Self {
        match v {
            Animation::None => 0,
            Animation::Breath => 1,
            Animation::Spinner => 2,
            Animation::Flash => 3,
            Animation::Flicker => 4,
            Animation::Spooky => 5,
            Animation::Rainbow => 6,
            Animation::LinearFade => 7,
            Animation::Other(other) => other,
        }
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Button status register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct StatusRegister(u8);
    impl Debug;
    /// RTC alarm fired
    pub rtc_alarm, set_rtc_alarm: 5;
    /// Output is powered
    pub power_on, set_power_on: 4;
    /// Double click detected
    pub double_click, set_double_click: 3;
    /// Long press detected
    pub long_press, set_long_press: 2;
    /// Short press detected
    pub short_press, set_short_press: 1;
    /// Button is currently held down
    pub down, set_down: 0;
}
from_register_u8!(StatusRegister);

bitfield! {
    /// Latch and reset trigger register, write only.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct LatchControl(u8);
    impl Debug;
    /// Reset without waiting
    pub reset_immediate, set_reset_immediate: 3;
    /// Reset after the configured delay
    pub reset, set_reset: 2;
    /// Toggle the power state without waiting
    pub latch_immediate, set_latch_immediate: 1;
    /// Toggle the power state after the configured delay
    pub latch, set_latch: 0;
}
from_register_u8!(LatchControl);

bitfield! {
    /// Hard reset behavior register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct HardResetBehaviorRegister(u8);
    impl Debug;
    /// Delay before restarting
    pub from into DelayValue, auto_restart_delay, set_auto_restart_delay: 7, 6;
    /// Restart automatically after a hard reset
    pub auto_restart_after_reset, set_auto_restart_after_reset: 5;
    /// Seconds the button must be held to force a hard reset (0-15)
    pub hold_duration, set_hold_duration: 4, 1;
    /// Disable the hard reset
    pub disable_hard_reset, set_disable_hard_reset: 0;
}
from_register_u8!(HardResetBehaviorRegister);

bitfield! {
    /// Power behavior register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct PowerBehaviorRegister(u8);
    impl Debug;
    /// Latch off automatically when pressed while on
    pub auto_latch_on_off_press, set_auto_latch_on_off_press: 3;
    /// Latch on automatically when pressed while off
    pub auto_latch_on_on_press, set_auto_latch_on_on_press: 2;
    /// Restore the stored framebuffer after power on reset
    pub restore_framebuffer, set_restore_framebuffer: 1;
    /// Power the output after power on reset
    pub default_on, set_default_on: 0;
}
from_register_u8!(PowerBehaviorRegister);

bitfield! {
    /// Framebuffer persistence control register, write only.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct FramebufferControl(u8);
    impl Debug;
    /// Restore the stored off-state framebuffer now
    pub restore_off, set_restore_off: 7;
    /// Restore the stored on-state framebuffer now
    pub restore_on, set_restore_on: 6;
    /// Clear the stored off-state framebuffer
    pub clear_off, set_clear_off: 5;
    /// Clear the stored on-state framebuffer
    pub clear_on, set_clear_on: 4;
    /// Store the current framebuffer as the off-state framebuffer
    pub save_off, set_save_off: 3;
    /// Store the current framebuffer as the on-state framebuffer
    pub save_on, set_save_on: 2;
    /// Restore the off-state framebuffer whenever the button latches off
    pub restore_off_on_latch, set_restore_off_on_latch: 1;
    /// Restore the on-state framebuffer whenever the button latches on
    pub restore_on_on_latch, set_restore_on_on_latch: 0;
}
from_register_u8!(FramebufferControl);

impl FramebufferControl {
    /// Command to store the current framebuffer for `state`.
    pub fn save(state: PowerState) -> Self {
        let mut value = Self::default();
        match state {
            PowerState::On => value.set_save_on(true),
            PowerState::Off => value.set_save_off(true),
        }
        value
    }

    /// Command to clear the stored framebuffer for `state`.
    pub fn clear(state: PowerState) -> Self {
        let mut value = Self::default();
        match state {
            PowerState::On => value.set_clear_on(true),
            PowerState::Off => value.set_clear_off(true),
        }
        value
    }

    /// Command to restore the stored framebuffer for `state`.
    pub fn restore(state: PowerState) -> Self {
        let mut value = Self::default();
        match state {
            PowerState::On => value.set_restore_on(true),
            PowerState::Off => value.set_restore_off(true),
        }
        value
    }

    /// Restore behavior applied on every latch.
    pub fn restore_behavior(restore_on_state: bool, restore_off_state: bool) -> Self {
        let mut value = Self::default();
        value.set_restore_on_on_latch(restore_on_state);
        value.set_restore_off_on_latch(restore_off_state);
        value
    }
}

bitfield! {
    /// RTC control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct RtcControlRegister(u8);
    impl Debug;
    /// Delay before an alarm action can no longer be cancelled
    pub from into DelayValue, alarm_cancellation_delay, set_alarm_cancellation_delay: 6, 5;
    /// Hours are kept in 12 hour AM/PM format
    pub use_am_pm_format, set_use_am_pm_format: 4;
    /// Re-arm the alarm after it fired
    pub alarm_auto_rearm, set_alarm_auto_rearm: 3;
    /// Action taken when the alarm fires
    pub from into RtcAlarmAction, alarm_action, set_alarm_action: 2, 1;
    /// Alarm enabled
    pub alarm_enabled, set_alarm_enabled: 0;
}
from_register_u8!(RtcControlRegister);

bitfield! {
    /// One of the three alarm time registers (seconds, minutes, hours).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmTimeRegister(u8);
    impl Debug;
    /// Field is ignored when comparing against the clock
    pub masked, set_masked: 7;
    /// BCD encoded value
    pub value, set_value: 6, 0;
}
from_register_u8!(AlarmTimeRegister);

bitfield! {
    /// Alarm day/date register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDayDateRegister(u8);
    impl Debug;
    /// Day/date is ignored when comparing against the clock
    pub masked, set_masked: 7;
    /// Value is a weekday (1) or a BCD day of month (0)
    pub weekday, set_weekday: 6;
    /// Weekday in bits 2-0, or BCD day of month
    pub value, set_value: 5, 0;
}
from_register_u8!(AlarmDayDateRegister);
