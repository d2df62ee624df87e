//! Configuration types for the TX scheduler

use crate::internal::constants::{
    DEFAULT_DATA_WINDOW_PKTS, DEFAULT_FC_SCALE, DEFAULT_PKT_LIMIT, MAX_FRAME_SIZE, MAX_PORTS,
    MAX_TCS,
};
use crate::driver::error::{ConfigError, ConfigResult};

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not yet configured
    #[default]
    Uninitialized,
    /// Init walk clearing the queue store is in progress
    Initializing,
    /// Operational; the enable bit gates request admission
    Running,
}

// =============================================================================
// Channel Configuration
// =============================================================================

/// Per-channel flow-control configuration.
///
/// A channel is one (port, traffic class) pair; limits and budgets are
/// expressed in packets and in credits of `2^fc_scale` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Channel participates in scheduling
    pub enabled: bool,
    /// Destination hint carried in every request this channel issues
    pub dest: u16,
    /// Ceiling on packets in flight (fetch + transmit windows)
    pub pkt_limit: u16,
    /// Ceiling on credits in the transmit window
    pub data_limit: u32,
    /// Reserved packet budget field.
    ///
    /// Read-write and observable through the register file but not
    /// consulted by the credit engine; retained for software that
    /// programs it.
    pub pkt_budget: u16,
    /// Estimated credits per not-yet-measured packet in the fetch window
    pub data_budget: u16,
}

impl ChannelConfig {
    /// Create a channel configuration with defaults derived from a
    /// flow-control scale exponent.
    #[must_use]
    pub const fn for_scale(fc_scale: u8) -> Self {
        let credit = 1u32 << fc_scale;
        let frame_credits = (MAX_FRAME_SIZE as u32).div_ceil(credit);
        Self {
            enabled: true,
            dest: 0,
            pkt_limit: DEFAULT_PKT_LIMIT,
            data_limit: frame_credits * DEFAULT_DATA_WINDOW_PKTS,
            pkt_budget: 0,
            data_budget: frame_credits as u16,
        }
    }

    /// Set the destination hint
    #[must_use]
    pub const fn with_dest(mut self, dest: u16) -> Self {
        self.dest = dest;
        self
    }

    /// Set the in-flight packet limit
    #[must_use]
    pub const fn with_pkt_limit(mut self, pkt_limit: u16) -> Self {
        self.pkt_limit = pkt_limit;
        self
    }

    /// Set the in-flight data limit in credits
    #[must_use]
    pub const fn with_data_limit(mut self, data_limit: u32) -> Self {
        self.data_limit = data_limit;
        self
    }

    /// Set the per-packet data budget in credits
    #[must_use]
    pub const fn with_data_budget(mut self, data_budget: u16) -> Self {
        self.data_budget = data_budget;
        self
    }

    /// Set the channel enable
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::for_scale(DEFAULT_FC_SCALE)
    }
}

// =============================================================================
// Scheduler Configuration
// =============================================================================

/// Top-level scheduler configuration.
///
/// # Example
/// ```ignore
/// let config = SchedConfig::new()
///     .with_ports(2)
///     .with_tcs(4)
///     .with_fc_scale(6);
/// let mut sched: Scheduler<64, 8, 16> = Scheduler::new();
/// sched.init(config)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedConfig {
    /// Number of egress ports (1..=3)
    pub port_count: u8,
    /// Number of traffic classes per port (1..=8)
    pub tc_count: u8,
    /// Flow-control scale exponent: 1 credit = 2^fc_scale bytes
    pub fc_scale: u8,
    /// Template applied to every channel at init
    pub channel: ChannelConfig,
}

impl SchedConfig {
    /// Create a single-port, single-TC configuration with default flow
    /// control.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            port_count: 1,
            tc_count: 1,
            fc_scale: DEFAULT_FC_SCALE,
            channel: ChannelConfig::for_scale(DEFAULT_FC_SCALE),
        }
    }

    /// Set the port count
    #[must_use]
    pub const fn with_ports(mut self, port_count: u8) -> Self {
        self.port_count = port_count;
        self
    }

    /// Set the traffic class count
    #[must_use]
    pub const fn with_tcs(mut self, tc_count: u8) -> Self {
        self.tc_count = tc_count;
        self
    }

    /// Set the flow-control scale exponent and rescale the channel template
    #[must_use]
    pub const fn with_fc_scale(mut self, fc_scale: u8) -> Self {
        self.fc_scale = fc_scale;
        self.channel = ChannelConfig::for_scale(fc_scale);
        self
    }

    /// Replace the channel template
    #[must_use]
    pub const fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }

    /// Number of channels this configuration describes.
    #[inline(always)]
    #[must_use]
    pub const fn channel_count(&self) -> usize {
        self.port_count as usize * self.tc_count as usize
    }

    /// Validate against a scheduler instantiated with `channels` channels.
    ///
    /// # Errors
    /// - `InvalidPortCount` / `InvalidTcCount` - zero or above the maximum
    /// - `InvalidFcScale` - exponent above 15
    /// - `ChannelMismatch` - port x TC product differs from `channels`
    pub fn validate(&self, channels: usize) -> ConfigResult<()> {
        if self.port_count == 0 || self.port_count as usize > MAX_PORTS {
            return Err(ConfigError::InvalidPortCount);
        }
        if self.tc_count == 0 || self.tc_count as usize > MAX_TCS {
            return Err(ConfigError::InvalidTcCount);
        }
        if self.fc_scale > 15 {
            return Err(ConfigError::InvalidFcScale);
        }
        if self.channel_count() != channels {
            return Err(ConfigError::ChannelMismatch);
        }
        Ok(())
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_single_channel() {
        let config = SchedConfig::default();
        assert_eq!(config.port_count, 1);
        assert_eq!(config.tc_count, 1);
        assert_eq!(config.channel_count(), 1);
        assert!(config.validate(1).is_ok());
    }

    #[test]
    fn builder_sets_geometry() {
        let config = SchedConfig::new().with_ports(2).with_tcs(4);
        assert_eq!(config.channel_count(), 8);
        assert!(config.validate(8).is_ok());
        assert_eq!(config.validate(4), Err(ConfigError::ChannelMismatch));
    }

    #[test]
    fn validate_rejects_zero_ports() {
        let config = SchedConfig::new().with_ports(0);
        assert_eq!(config.validate(0), Err(ConfigError::InvalidPortCount));
    }

    #[test]
    fn validate_rejects_excess_ports_and_tcs() {
        let config = SchedConfig::new().with_ports(4);
        assert_eq!(config.validate(4), Err(ConfigError::InvalidPortCount));

        let config = SchedConfig::new().with_tcs(9);
        assert_eq!(config.validate(9), Err(ConfigError::InvalidTcCount));
    }

    #[test]
    fn validate_rejects_wide_fc_scale() {
        let mut config = SchedConfig::new();
        config.fc_scale = 16;
        assert_eq!(config.validate(1), Err(ConfigError::InvalidFcScale));
    }

    #[test]
    fn channel_defaults_follow_scale() {
        // 64-byte credits: a 1522-byte frame occupies 24 credits.
        let ch = ChannelConfig::for_scale(6);
        assert_eq!(ch.data_budget, 24);
        assert_eq!(ch.data_limit, 24 * DEFAULT_DATA_WINDOW_PKTS);
        assert_eq!(ch.pkt_limit, DEFAULT_PKT_LIMIT);
        assert!(ch.enabled);

        // 8-byte credits.
        let ch = ChannelConfig::for_scale(3);
        assert_eq!(ch.data_budget, 191);
    }

    #[test]
    fn with_fc_scale_rescales_channel_template() {
        let config = SchedConfig::new().with_fc_scale(3);
        assert_eq!(config.fc_scale, 3);
        assert_eq!(config.channel.data_budget, 191);
    }

    #[test]
    fn channel_builder_round_trip() {
        let ch = ChannelConfig::default()
            .with_dest(0x0105)
            .with_pkt_limit(4)
            .with_data_limit(128)
            .with_data_budget(24)
            .with_enabled(false);
        assert_eq!(ch.dest, 0x0105);
        assert_eq!(ch.pkt_limit, 4);
        assert_eq!(ch.data_limit, 128);
        assert_eq!(ch.data_budget, 24);
        assert!(!ch.enabled);
    }
}
