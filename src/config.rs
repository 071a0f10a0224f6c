//! Typed views of the OnOffBTN configuration and status registers.
//!
//! Each record maps 1:1 onto one packed register from [`crate::registers`]
//! and converts to and from it without touching the bus.

use crate::registers::{
    DelayValue, HardResetBehaviorRegister, PowerBehaviorRegister, RtcAlarmAction,
    RtcControlRegister, StatusRegister,
};

/// Button status flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonStatus {
    /// Button is currently held down
    pub down: bool,
    pub short_press: bool,
    pub long_press: bool,
    pub double_click: bool,
    /// Output is powered
    pub power_on: bool,
    /// RTC alarm fired
    pub rtc_alarm: bool,
}

impl From<StatusRegister> for ButtonStatus {
    fn from(reg: StatusRegister) -> Self {
        Self {
            down: reg.down(),
            short_press: reg.short_press(),
            long_press: reg.long_press(),
            double_click: reg.double_click(),
            power_on: reg.power_on(),
            rtc_alarm: reg.rtc_alarm(),
        }
    }
}

impl From<ButtonStatus> for StatusRegister {
    fn from(status: ButtonStatus) -> Self {
        let mut reg = StatusRegister::default();
        reg.set_down(status.down);
        reg.set_short_press(status.short_press);
        reg.set_long_press(status.long_press);
        reg.set_double_click(status.double_click);
        reg.set_power_on(status.power_on);
        reg.set_rtc_alarm(status.rtc_alarm);
        reg
    }
}

/// What happens when the button is held long enough to force a hard reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardResetBehavior {
    pub disable_hard_reset: bool,
    /// Hold duration in seconds, only the low 4 bits are stored
    pub hold_duration: u8,
    pub auto_restart_after_reset: bool,
    pub auto_restart_delay: DelayValue,
}

impl From<HardResetBehaviorRegister> for HardResetBehavior {
    fn from(reg: HardResetBehaviorRegister) -> Self {
        Self {
            disable_hard_reset: reg.disable_hard_reset(),
            hold_duration: reg.hold_duration(),
            auto_restart_after_reset: reg.auto_restart_after_reset(),
            auto_restart_delay: reg.auto_restart_delay(),
        }
    }
}

impl From<HardResetBehavior> for HardResetBehaviorRegister {
    fn from(config: HardResetBehavior) -> Self {
        let mut reg = HardResetBehaviorRegister::default();
        reg.set_disable_hard_reset(config.disable_hard_reset);
        reg.set_hold_duration(config.hold_duration & 0x0F);
        reg.set_auto_restart_after_reset(config.auto_restart_after_reset);
        reg.set_auto_restart_delay(config.auto_restart_delay);
        reg
    }
}

/// Power on reset and auto latch behavior.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerBehavior {
    /// Power the output after power on reset
    pub default_on: bool,
    /// Restore the stored framebuffer after power on reset
    pub restore_framebuffer: bool,
    pub auto_latch_on_on_press: bool,
    pub auto_latch_on_off_press: bool,
}

impl From<PowerBehaviorRegister> for PowerBehavior {
    fn from(reg: PowerBehaviorRegister) -> Self {
        Self {
            default_on: reg.default_on(),
            restore_framebuffer: reg.restore_framebuffer(),
            auto_latch_on_on_press: reg.auto_latch_on_on_press(),
            auto_latch_on_off_press: reg.auto_latch_on_off_press(),
        }
    }
}

impl From<PowerBehavior> for PowerBehaviorRegister {
    fn from(config: PowerBehavior) -> Self {
        let mut reg = PowerBehaviorRegister::default();
        reg.set_default_on(config.default_on);
        reg.set_restore_framebuffer(config.restore_framebuffer);
        reg.set_auto_latch_on_on_press(config.auto_latch_on_on_press);
        reg.set_auto_latch_on_off_press(config.auto_latch_on_off_press);
        reg
    }
}

/// RTC alarm and clock format configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcConfig {
    pub alarm_enabled: bool,
    pub alarm_action: RtcAlarmAction,
    pub alarm_auto_rearm: bool,
    pub use_am_pm_format: bool,
    pub alarm_cancellation_delay: DelayValue,
}

impl From<RtcControlRegister> for RtcConfig {
    fn from(reg: RtcControlRegister) -> Self {
        Self {
            alarm_enabled: reg.alarm_enabled(),
            alarm_action: reg.alarm_action(),
            alarm_auto_rearm: reg.alarm_auto_rearm(),
            use_am_pm_format: reg.use_am_pm_format(),
            alarm_cancellation_delay: reg.alarm_cancellation_delay(),
        }
    }
}

impl From<RtcConfig> for RtcControlRegister {
    fn from(config: RtcConfig) -> Self {
        let mut reg = RtcControlRegister::default();
        reg.set_alarm_enabled(config.alarm_enabled);
        reg.set_alarm_action(config.alarm_action);
        reg.set_alarm_auto_rearm(config.alarm_auto_rearm);
        reg.set_use_am_pm_format(config.use_am_pm_format);
        reg.set_alarm_cancellation_delay(config.alarm_cancellation_delay);
        reg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAYS: [DelayValue; 4] = [
        DelayValue::Delay100ms,
        DelayValue::Delay1000ms,
        DelayValue::Delay5000ms,
        DelayValue::Delay10000ms,
    ];

    const ACTIONS: [RtcAlarmAction; 4] = [
        RtcAlarmAction::PowerOn,
        RtcAlarmAction::PowerOff,
        RtcAlarmAction::Reset,
        RtcAlarmAction::Toggle,
    ];

    fn bit(value: u8, n: u8) -> bool {
        value & (1 << n) != 0
    }

    #[test]
    fn test_button_status_round_trip() {
        for raw in 0..64u8 {
            let status = ButtonStatus::from(StatusRegister::from(raw));
            assert_eq!(status.down, bit(raw, 0));
            assert_eq!(status.short_press, bit(raw, 1));
            assert_eq!(status.long_press, bit(raw, 2));
            assert_eq!(status.double_click, bit(raw, 3));
            assert_eq!(status.power_on, bit(raw, 4));
            assert_eq!(status.rtc_alarm, bit(raw, 5));
            assert_eq!(u8::from(StatusRegister::from(status)), raw);
        }
    }

    #[test]
    fn test_button_status_ignores_reserved_bits() {
        let status = ButtonStatus::from(StatusRegister::from(0b1100_0000));
        assert_eq!(status, ButtonStatus::default());
    }

    #[test]
    fn test_hard_reset_behavior_packing() {
        let config = HardResetBehavior {
            disable_hard_reset: true,
            hold_duration: 5,
            auto_restart_after_reset: false,
            auto_restart_delay: DelayValue::Delay1000ms,
        };
        assert_eq!(u8::from(HardResetBehaviorRegister::from(config)), 0x4B);
    }

    #[test]
    fn test_hard_reset_behavior_round_trip() {
        for disable_hard_reset in [false, true] {
            for hold_duration in 0..16u8 {
                for auto_restart_after_reset in [false, true] {
                    for auto_restart_delay in DELAYS {
                        let config = HardResetBehavior {
                            disable_hard_reset,
                            hold_duration,
                            auto_restart_after_reset,
                            auto_restart_delay,
                        };
                        let reg = HardResetBehaviorRegister::from(config);
                        assert_eq!(HardResetBehavior::from(reg), config);
                    }
                }
            }
        }
    }

    #[test]
    fn test_hard_reset_hold_duration_is_four_bits() {
        let config = HardResetBehavior {
            disable_hard_reset: false,
            hold_duration: 0x15,
            auto_restart_after_reset: false,
            auto_restart_delay: DelayValue::Delay100ms,
        };
        // 0x15 & 0x0F == 5, bit 5 (auto restart) stays clear
        assert_eq!(u8::from(HardResetBehaviorRegister::from(config)), 0b0000_1010);
    }

    #[test]
    fn test_power_behavior_round_trip() {
        for raw in 0..16u8 {
            let config = PowerBehavior::from(PowerBehaviorRegister::from(raw));
            assert_eq!(config.default_on, bit(raw, 0));
            assert_eq!(config.restore_framebuffer, bit(raw, 1));
            assert_eq!(config.auto_latch_on_on_press, bit(raw, 2));
            assert_eq!(config.auto_latch_on_off_press, bit(raw, 3));
            assert_eq!(u8::from(PowerBehaviorRegister::from(config)), raw);
        }
    }

    #[test]
    fn test_rtc_config_round_trip() {
        for alarm_enabled in [false, true] {
            for alarm_action in ACTIONS {
                for alarm_auto_rearm in [false, true] {
                    for use_am_pm_format in [false, true] {
                        for alarm_cancellation_delay in DELAYS {
                            let config = RtcConfig {
                                alarm_enabled,
                                alarm_action,
                                alarm_auto_rearm,
                                use_am_pm_format,
                                alarm_cancellation_delay,
                            };
                            let reg = RtcControlRegister::from(config);
                            assert_eq!(u8::from(reg) & 0x80, 0);
                            assert_eq!(RtcConfig::from(reg), config);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rtc_config_packing() {
        let config = RtcConfig {
            alarm_enabled: true,
            alarm_action: RtcAlarmAction::Toggle,
            alarm_auto_rearm: false,
            use_am_pm_format: true,
            alarm_cancellation_delay: DelayValue::Delay1000ms,
        };
        assert_eq!(u8::from(RtcControlRegister::from(config)), 0b0011_0111);
    }
}
