//! A platform-agnostic driver for the OnOffBTN power button.
//!
//! The OnOffBTN is an I2C power controller with a 9 pixel RGB LED ring,
//! 16 bytes of user EEPROM and a battery backed real-time clock. This crate
//! exposes its register map through typed operations on top of the
//! `embedded-hal` I2C traits.
//!
//! # Features
//!
//! - `async`: async driver in [`asynch`] built on `embedded-hal-async`
//! - `log`: log through the `log` crate
//! - `defmt`: log through `defmt` and derive `defmt::Format` for public types
//!
//! # Example
//!
//! ```rust,ignore
//! use onoffbtn::{OnOffBtn, DEFAULT_ADDRESS, PowerState, Animation};
//!
//! // the HAL is responsible for running the bus at I2C_FREQUENCY_HZ
//! let mut button = OnOffBtn::new(i2c, DEFAULT_ADDRESS);
//!
//! button.set_pixel(0, 255, 0, 0)?;
//! button.select_animation(PowerState::On, Animation::Breath)?;
//! if button.button_status()?.double_click {
//!     button.trigger_latch(false)?;
//! }
//! ```
//!
//! # Bus usage
//!
//! Every operation performs its I2C transactions immediately and returns
//! once they complete. Nothing is cached and nothing is retried. Writes to
//! non-volatile configuration may keep the device busy for up to 500ms; on
//! platforms without clock stretching the caller must wait before the next
//! transaction.

#![no_std]

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}
#[cfg(feature = "log")]
macro_rules! warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}
#[cfg(feature = "log")]
macro_rules! error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}
#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}
#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! error {
    ($($arg:tt)*) => { defmt::error!($($arg)*) };
}

// Without a logger the arguments are still evaluated so they count as used.
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! debug {
    ($($arg:tt)*) => {{ let _ = ($($arg)*); }};
}
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! warn {
    ($($arg:tt)*) => {{ let _ = ($($arg)*); }};
}
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! error {
    ($($arg:tt)*) => {{ let _ = ($($arg)*); }};
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod config;
pub mod datetime;
pub mod registers;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

pub use alarm::{AlarmDayDate, AlarmTime};
pub use config::{ButtonStatus, HardResetBehavior, PowerBehavior, RtcConfig};
pub use datetime::{from_bcd, to_bcd, DateTime, DateTimeError};
pub use registers::*;

/// Error type for OnOffBTN operations.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnOffBtnError<I2CE> {
    /// I2C bus error
    I2c(I2CE),
    /// `DateTime` conversion error
    DateTime(DateTimeError),
}

impl<I2CE> From<I2CE> for OnOffBtnError<I2CE> {
    fn from(e: I2CE) -> Self {
        OnOffBtnError::I2c(e)
    }
}

/// Number of subpixels `set_pixels` writes for the given offset and length.
///
/// Returns `None` when the offset is outside the framebuffer.
pub(crate) fn subpixel_span(offset: usize, len: usize) -> Option<usize> {
    if offset >= NUM_SUBPIXELS {
        return None;
    }
    Some(len.min(NUM_SUBPIXELS - offset))
}

/// OnOffBTN driver.
///
/// Owns the I2C bus and the 7-bit device address. All operations block
/// until their bus transactions complete.
pub struct OnOffBtn<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> OnOffBtn<I2C> {
    /// Creates a new driver instance.
    ///
    /// The device is not probed, the bus is touched only by later
    /// operations.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation, clocked at [`I2C_FREQUENCY_HZ`]
    /// * `address` - The I2C address of the device (typically [`DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Creates a new driver instance at [`DEFAULT_ADDRESS`].
    pub fn with_default_address(i2c: I2C) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }

    /// The I2C address this driver talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_byte(&mut self, reg: u8) -> Result<u8, OnOffBtnError<I2C::Error>> {
        let mut data = [0];
        self.i2c.write_read(self.address, &[reg], &mut data)?;
        Ok(data[0])
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value])?;
        Ok(())
    }

    fn read_short(&mut self, reg: u8) -> Result<u16, OnOffBtnError<I2C::Error>> {
        let mut data = [0; 2];
        self.i2c.write_read(self.address, &[reg], &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    fn write_short(&mut self, reg: u8, value: u16) -> Result<(), OnOffBtnError<I2C::Error>> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c.write(self.address, &[reg, msb, lsb])?;
        Ok(())
    }

    /// Writes up to [`NUM_SUBPIXELS`] bytes in one transaction starting at `reg`.
    fn write_block(&mut self, reg: u8, data: &[u8]) -> Result<(), OnOffBtnError<I2C::Error>> {
        let len = data.len().min(NUM_SUBPIXELS);
        let mut buffer = [0u8; NUM_SUBPIXELS + 1];
        buffer[0] = reg;
        buffer[1..=len].copy_from_slice(&data[..len]);
        self.i2c.write(self.address, &buffer[..=len])?;
        Ok(())
    }

    /// Sets every pixel to black.
    pub fn clear_framebuffer(&mut self) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_block(RegAddr::Framebuffer as u8, &[0; NUM_SUBPIXELS])
    }

    /// Sets a single pixel to the given color.
    ///
    /// Indices at or beyond [`NUM_PIXELS`] are ignored.
    pub fn set_pixel(
        &mut self,
        pixel: u8,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        if usize::from(pixel) >= NUM_PIXELS {
            warn!("OnOffBTN: ignoring pixel {} out of range", pixel);
            return Ok(());
        }
        self.write_block(RegAddr::Framebuffer as u8 + pixel * 3, &[r, g, b])
    }

    /// Writes a run of subpixels (R, G, B, R, ...) starting at subpixel `offset`.
    ///
    /// The run is cut at the end of the framebuffer. Nothing is written if
    /// `offset` is outside the framebuffer.
    pub fn set_pixels(
        &mut self,
        subpixels: &[u8],
        offset: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        let Some(len) = subpixel_span(usize::from(offset), subpixels.len()) else {
            warn!("OnOffBTN: ignoring subpixel offset {} out of range", offset);
            return Ok(());
        };
        if len < subpixels.len() {
            debug!(
                "OnOffBTN: truncating {} subpixels to {}",
                subpixels.len(),
                len
            );
        }
        if len == 0 {
            return Ok(());
        }
        self.write_block(RegAddr::Framebuffer as u8 + offset, &subpixels[..len])
    }

    /// Toggles the power state.
    ///
    /// Triggering again while the configured delay is pending cancels the
    /// toggle.
    ///
    /// # Arguments
    /// * `immediate` - Skip the configured on/off delay
    pub fn trigger_latch(&mut self, immediate: bool) -> Result<(), OnOffBtnError<I2C::Error>> {
        let mut control = LatchControl::default();
        if immediate {
            control.set_latch_immediate(true);
        } else {
            control.set_latch(true);
        }
        self.write_byte(RegAddr::LatchControl as u8, control.into())
    }

    /// Starts a reset: power is cut and, depending on the hard reset
    /// configuration, restored afterwards.
    ///
    /// # Arguments
    /// * `immediate` - Skip any waiting time before cutting power
    pub fn trigger_reset(&mut self, immediate: bool) -> Result<(), OnOffBtnError<I2C::Error>> {
        let mut control = LatchControl::default();
        if immediate {
            control.set_reset_immediate(true);
        } else {
            control.set_reset(true);
        }
        self.write_byte(RegAddr::LatchControl as u8, control.into())
    }

    /// Reads the button status. Reading clears the press and click flags.
    pub fn button_status(&mut self) -> Result<ButtonStatus, OnOffBtnError<I2C::Error>> {
        let raw = StatusRegister::from(self.read_byte(RegAddr::Status as u8)?);
        Ok(raw.into())
    }

    /// Reads the button status without clearing the press and click flags.
    pub fn poll_button_status(&mut self) -> Result<ButtonStatus, OnOffBtnError<I2C::Error>> {
        let raw = StatusRegister::from(self.read_byte(RegAddr::StatusPoll as u8)?);
        Ok(raw.into())
    }

    /// Selects the animation played in the given power state.
    pub fn select_animation(
        &mut self,
        state: PowerState,
        animation: Animation,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            AnimationRegister::Selection.address(state),
            animation.into(),
        )
    }

    /// Reads the animation selected for the given power state.
    pub fn selected_animation(
        &mut self,
        state: PowerState,
    ) -> Result<Animation, OnOffBtnError<I2C::Error>> {
        let raw = self.read_byte(AnimationRegister::Selection.address(state))?;
        Ok(Animation::from(raw))
    }

    /// Sets the animation speed, roughly the milliseconds one animation tick takes.
    pub fn set_animation_speed(
        &mut self,
        state: PowerState,
        tick_speed: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(AnimationRegister::TickSpeed.address(state), tick_speed)
    }

    /// Reads the animation speed for the given power state.
    pub fn animation_speed(&mut self, state: PowerState) -> Result<u8, OnOffBtnError<I2C::Error>> {
        self.read_byte(AnimationRegister::TickSpeed.address(state))
    }

    /// Sets the animation specific configuration value for the given power state.
    pub fn set_animation_configuration(
        &mut self,
        state: PowerState,
        value: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(AnimationRegister::Configuration.address(state), value)
    }

    /// Reads the animation specific configuration value for the given power state.
    pub fn animation_configuration(
        &mut self,
        state: PowerState,
    ) -> Result<u8, OnOffBtnError<I2C::Error>> {
        self.read_byte(AnimationRegister::Configuration.address(state))
    }

    /// Stores the current framebuffer in EEPROM for the given power state.
    pub fn save_animation_framebuffer(
        &mut self,
        state: PowerState,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::save(state).into(),
        )
    }

    /// Clears the stored framebuffer for the given power state.
    pub fn clear_stored_animation_framebuffer(
        &mut self,
        state: PowerState,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::clear(state).into(),
        )
    }

    /// Loads the stored framebuffer for the given power state.
    pub fn restore_stored_animation_framebuffer(
        &mut self,
        state: PowerState,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::restore(state).into(),
        )
    }

    /// Chooses which stored framebuffers are restored when the button latches.
    ///
    /// # Arguments
    /// * `restore_on_state` - Restore the "on" framebuffer when latching on
    /// * `restore_off_state` - Restore the "off" framebuffer when latching off
    pub fn set_framebuffer_restore_behavior(
        &mut self,
        restore_on_state: bool,
        restore_off_state: bool,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::restore_behavior(restore_on_state, restore_off_state).into(),
        )
    }

    /// Reads a byte of user EEPROM.
    ///
    /// Returns 255 without touching the bus if `index` is at or beyond
    /// [`USER_EEPROM_SIZE`].
    pub fn user_eeprom_byte(&mut self, index: u8) -> Result<u8, OnOffBtnError<I2C::Error>> {
        if usize::from(index) >= USER_EEPROM_SIZE {
            warn!("OnOffBTN: EEPROM index {} out of range", index);
            return Ok(0xFF);
        }
        self.read_byte(RegAddr::UserEeprom as u8 + index)
    }

    /// Writes a byte of user EEPROM. Out of range indices are ignored.
    pub fn set_user_eeprom_byte(
        &mut self,
        index: u8,
        value: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        if usize::from(index) >= USER_EEPROM_SIZE {
            warn!("OnOffBTN: EEPROM index {} out of range", index);
            return Ok(());
        }
        self.write_byte(RegAddr::UserEeprom as u8 + index, value)
    }

    /// Reads the RTC date and time.
    pub fn datetime(&mut self) -> Result<DateTime, OnOffBtnError<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::RtcSeconds as u8], &mut data)?;
        Ok(data.into())
    }

    /// Sets the RTC date and time.
    pub fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), OnOffBtnError<I2C::Error>> {
        let data: [u8; 7] = datetime.into();
        debug!("OnOffBTN: writing datetime {:?}", data);
        self.write_block(RegAddr::RtcSeconds as u8, &data)
    }

    /// Reads the RTC date and time as a chrono `NaiveDateTime`.
    pub fn naive_datetime(&mut self) -> Result<NaiveDateTime, OnOffBtnError<I2C::Error>> {
        self.datetime()?
            .to_naive()
            .map_err(OnOffBtnError::DateTime)
    }

    /// Sets the RTC date and time from a chrono `NaiveDateTime`.
    pub fn set_naive_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        let raw = DateTime::from_naive(datetime).map_err(OnOffBtnError::DateTime)?;
        self.set_datetime(&raw)
    }

    /// Reads the alarm time.
    pub fn alarm_time(&mut self) -> Result<AlarmTime, OnOffBtnError<I2C::Error>> {
        let mut data = [0; 3];
        self.i2c
            .write_read(self.address, &[RegAddr::AlarmSeconds as u8], &mut data)?;
        Ok(data.into())
    }

    /// Sets the alarm time.
    pub fn set_alarm_time(&mut self, alarm: &AlarmTime) -> Result<(), OnOffBtnError<I2C::Error>> {
        let data: [u8; 3] = alarm.into();
        self.write_block(RegAddr::AlarmSeconds as u8, &data)
    }
}

// Accessors for the 16 bit big endian registers
macro_rules! impl_short_access {
    ($(($name:ident, $regaddr:expr)),+ $(,)?) => {
        impl<I2C: I2c> OnOffBtn<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register (ms).")]
                    pub fn $name(&mut self) -> Result<u16, OnOffBtnError<I2C::Error>> {
                        self.read_short($regaddr as u8)
                    }

                    #[doc = concat!("Sets the ", stringify!($name), " register (ms).")]
                    pub fn [<set_ $name>](&mut self, value: u16) -> Result<(), OnOffBtnError<I2C::Error>> {
                        self.write_short($regaddr as u8, value)
                    }
                }
            )+
        }
    };
}

// Accessors for the packed single byte registers
macro_rules! impl_packed_access {
    ($(($name:ident, $regaddr:expr, $raw:ty, $typ:ty)),+ $(,)?) => {
        impl<I2C: I2c> OnOffBtn<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, OnOffBtnError<I2C::Error>> {
                        let raw = <$raw>::from(self.read_byte($regaddr as u8)?);
                        Ok(raw.into())
                    }

                    #[doc = concat!("Sets the ", stringify!($name), " register.")]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), OnOffBtnError<I2C::Error>> {
                        let raw = u8::from(<$raw>::from(value));
                        debug!("OnOffBTN: writing {} to {:?}", raw, $regaddr);
                        self.write_byte($regaddr as u8, raw)
                    }
                }
            )+
        }
    };
}

impl_short_access!(
    (long_press_threshold, RegAddr::LongPressThreshold),
    (on_delay, RegAddr::OnDelay),
    (off_delay, RegAddr::OffDelay),
);

impl_packed_access!(
    (
        hard_reset_behavior,
        RegAddr::HardResetBehavior,
        HardResetBehaviorRegister,
        HardResetBehavior
    ),
    (
        power_behavior,
        RegAddr::PowerBehavior,
        PowerBehaviorRegister,
        PowerBehavior
    ),
    (
        rtc_configuration,
        RegAddr::RtcControl,
        RtcControlRegister,
        RtcConfig
    ),
    (
        alarm_day_date,
        RegAddr::AlarmDayDate,
        AlarmDayDateRegister,
        AlarmDayDate
    ),
);
