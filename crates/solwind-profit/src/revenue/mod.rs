//! Revenue models
//!
//! - Commission strategies (development fee, legacy market rate)
//! - Progressive resource-fee tiers

pub mod commission;
pub mod tiers;

pub use commission::{
    CommissionContext, CommissionStrategy, DevelopmentFeeCommission, LegacyMarketRateCommission,
};
pub use tiers::{Tier, TierSchedule};
