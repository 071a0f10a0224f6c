//! Async implementation of the OnOffBTN driver.
//!
//! This module provides an async interface to the OnOffBTN using
//! `embedded-hal-async` traits. It is only available when the `async` feature
//! is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use onoffbtn::asynch::OnOffBtn;
//!
//! let mut button = OnOffBtn::new(i2c, onoffbtn::DEFAULT_ADDRESS);
//!
//! let status = button.button_status().await?;
//! let now = button.naive_datetime().await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::{
    subpixel_span, AlarmDayDate, AlarmDayDateRegister, AlarmTime, Animation, AnimationRegister,
    ButtonStatus, DateTime, FramebufferControl, HardResetBehavior, HardResetBehaviorRegister,
    LatchControl, OnOffBtnError, PowerBehavior, PowerBehaviorRegister, PowerState, RegAddr,
    RtcConfig, RtcControlRegister, StatusRegister, DEFAULT_ADDRESS, NUM_PIXELS, NUM_SUBPIXELS,
    USER_EEPROM_SIZE,
};

/// OnOffBTN async driver.
///
/// This struct provides the async interface to the OnOffBTN.
/// It supports async I2C operations through the `embedded-hal-async` traits.
pub struct OnOffBtn<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> OnOffBtn<I2C> {
    /// Creates a new OnOffBTN async driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `address` - The I2C address of the device (typically 0x59)
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

    async fn read_byte(&mut self, reg: u8) -> Result<u8, OnOffBtnError<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[reg], &mut data)
            .await?;
        Ok(data[0])
    }

    async fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value]).await?;
        Ok(())
    }

    async fn read_short(&mut self, reg: u8) -> Result<u16, OnOffBtnError<I2C::Error>> {
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut data)
            .await?;
        Ok(u16::from_be_bytes(data))
    }

    async fn write_short(&mut self, reg: u8, value: u16) -> Result<(), OnOffBtnError<I2C::Error>> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c.write(self.address, &[reg, msb, lsb]).await?;
        Ok(())
    }

    async fn write_block(&mut self, reg: u8, data: &[u8]) -> Result<(), OnOffBtnError<I2C::Error>> {
        let len = data.len().min(NUM_SUBPIXELS);
        let mut buffer = [0u8; NUM_SUBPIXELS + 1];
        buffer[0] = reg;
        buffer[1..=len].copy_from_slice(&data[..len]);
        self.i2c.write(self.address, &buffer[..=len]).await?;
        Ok(())
    }

    /// Sets every pixel to black.
    pub async fn clear_framebuffer(&mut self) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_block(RegAddr::Framebuffer as u8, &[0; NUM_SUBPIXELS])
            .await
    }

    /// Sets a single pixel to the given color. Indices at or beyond
    /// [`NUM_PIXELS`] are ignored.
    pub async fn set_pixel(
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
            .await
    }

    /// Writes a run of subpixels starting at subpixel `offset`, cut at the
    /// end of the framebuffer.
    pub async fn set_pixels(
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
            .await
    }

    /// Toggles the power state, optionally skipping the configured delay.
    pub async fn trigger_latch(&mut self, immediate: bool) -> Result<(), OnOffBtnError<I2C::Error>> {
        let mut control = LatchControl::default();
        if immediate {
            control.set_latch_immediate(true);
        } else {
            control.set_latch(true);
        }
        self.write_byte(RegAddr::LatchControl as u8, control.into())
            .await
    }

    /// Starts a reset, optionally without waiting.
    pub async fn trigger_reset(&mut self, immediate: bool) -> Result<(), OnOffBtnError<I2C::Error>> {
        let mut control = LatchControl::default();
        if immediate {
            control.set_reset_immediate(true);
        } else {
            control.set_reset(true);
        }
        self.write_byte(RegAddr::LatchControl as u8, control.into())
            .await
    }

    /// Reads the button status. Reading clears the press and click flags.
    pub async fn button_status(&mut self) -> Result<ButtonStatus, OnOffBtnError<I2C::Error>> {
        let raw = StatusRegister::from(self.read_byte(RegAddr::Status as u8).await?);
        Ok(raw.into())
    }

    /// Reads the button status without clearing the press and click flags.
    pub async fn poll_button_status(&mut self) -> Result<ButtonStatus, OnOffBtnError<I2C::Error>> {
        let raw = StatusRegister::from(self.read_byte(RegAddr::StatusPoll as u8).await?);
        Ok(raw.into())
    }

    pub async fn select_animation(
        &mut self,
        state: PowerState,
        animation: Animation,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            AnimationRegister::Selection.address(state),
            animation.into(),
        )
        .await
    }

    pub async fn selected_animation(
        &mut self,
        state: PowerState,
    ) -> Result<Animation, OnOffBtnError<I2C::Error>> {
        let raw = self
            .read_byte(AnimationRegister::Selection.address(state))
            .await?;
        Ok(Animation::from(raw))
    }

    pub async fn set_animation_speed(
        &mut self,
        state: PowerState,
        tick_speed: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(AnimationRegister::TickSpeed.address(state), tick_speed)
            .await
    }

    pub async fn animation_speed(
        &mut self,
        state: PowerState,
    ) -> Result<u8, OnOffBtnError<I2C::Error>> {
        self.read_byte(AnimationRegister::TickSpeed.address(state))
            .await
    }

    pub async fn set_animation_configuration(
        &mut self,
        state: PowerState,
        value: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(AnimationRegister::Configuration.address(state), value)
            .await
    }

    pub async fn animation_configuration(
        &mut self,
        state: PowerState,
    ) -> Result<u8, OnOffBtnError<I2C::Error>> {
        self.read_byte(AnimationRegister::Configuration.address(state))
            .await
    }

    pub async fn save_animation_framebuffer(
        &mut self,
        state: PowerState,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::save(state).into(),
        )
        .await
    }

    pub async fn clear_stored_animation_framebuffer(
        &mut self,
        state: PowerState,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::clear(state).into(),
        )
        .await
    }

    pub async fn restore_stored_animation_framebuffer(
        &mut self,
        state: PowerState,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::restore(state).into(),
        )
        .await
    }

    pub async fn set_framebuffer_restore_behavior(
        &mut self,
        restore_on_state: bool,
        restore_off_state: bool,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        self.write_byte(
            RegAddr::FramebufferControl as u8,
            FramebufferControl::restore_behavior(restore_on_state, restore_off_state).into(),
        )
        .await
    }

    /// Reads a byte of user EEPROM, 255 for out of range indices.
    pub async fn user_eeprom_byte(&mut self, index: u8) -> Result<u8, OnOffBtnError<I2C::Error>> {
        if usize::from(index) >= USER_EEPROM_SIZE {
            warn!("OnOffBTN: EEPROM index {} out of range", index);
            return Ok(0xFF);
        }
        self.read_byte(RegAddr::UserEeprom as u8 + index).await
    }

    /// Writes a byte of user EEPROM. Out of range indices are ignored.
    pub async fn set_user_eeprom_byte(
        &mut self,
        index: u8,
        value: u8,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        if usize::from(index) >= USER_EEPROM_SIZE {
            warn!("OnOffBTN: EEPROM index {} out of range", index);
            return Ok(());
        }
        self.write_byte(RegAddr::UserEeprom as u8 + index, value)
            .await
    }

    pub async fn datetime(&mut self) -> Result<DateTime, OnOffBtnError<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::RtcSeconds as u8], &mut data)
            .await?;
        Ok(data.into())
    }

    pub async fn set_datetime(
        &mut self,
        datetime: &DateTime,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        let data: [u8; 7] = datetime.into();
        self.write_block(RegAddr::RtcSeconds as u8, &data).await
    }

    pub async fn naive_datetime(&mut self) -> Result<NaiveDateTime, OnOffBtnError<I2C::Error>> {
        self.datetime()
            .await?
            .to_naive()
            .map_err(OnOffBtnError::DateTime)
    }

    pub async fn set_naive_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        let raw = DateTime::from_naive(datetime).map_err(OnOffBtnError::DateTime)?;
        self.set_datetime(&raw).await
    }

    pub async fn alarm_time(&mut self) -> Result<AlarmTime, OnOffBtnError<I2C::Error>> {
        let mut data = [0; 3];
        self.i2c
            .write_read(self.address, &[RegAddr::AlarmSeconds as u8], &mut data)
            .await?;
        Ok(data.into())
    }

    pub async fn set_alarm_time(
        &mut self,
        alarm: &AlarmTime,
    ) -> Result<(), OnOffBtnError<I2C::Error>> {
        let data: [u8; 3] = alarm.into();
        self.write_block(RegAddr::AlarmSeconds as u8, &data).await
    }
}

// Register access implementations
macro_rules! impl_short_access {
    ($(($name:ident, $regaddr:expr)),+ $(,)?) => {
        impl<I2C: I2c> OnOffBtn<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register (ms).")]
                    pub async fn $name(&mut self) -> Result<u16, OnOffBtnError<I2C::Error>> {
                        self.read_short($regaddr as u8).await
                    }

                    #[doc = concat!("Sets the ", stringify!($name), " register (ms).")]
                    pub async fn [<set_ $name>](&mut self, value: u16) -> Result<(), OnOffBtnError<I2C::Error>> {
                        self.write_short($regaddr as u8, value).await
                    }
                }
            )+
        }
    };
}

macro_rules! impl_packed_access {
    ($(($name:ident, $regaddr:expr, $raw:ty, $typ:ty)),+ $(,)?) => {
        impl<I2C: I2c> OnOffBtn<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, OnOffBtnError<I2C::Error>> {
                        let raw = <$raw>::from(self.read_byte($regaddr as u8).await?);
                        Ok(raw.into())
                    }

                    #[doc = concat!("Sets the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), OnOffBtnError<I2C::Error>> {
                        let raw = u8::from(<$raw>::from(value));
                        debug!("OnOffBTN: writing {} to {:?}", raw, $regaddr);
                        self.write_byte($regaddr as u8, raw).await
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
