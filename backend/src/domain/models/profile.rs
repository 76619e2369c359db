//! Domain model for the user's budget profile.

use serde::{Deserialize, Serialize};

/// Monthly budget parameters for the single user session.
///
/// All amounts are Colombian pesos - non-negative integers, no sub-unit
/// precision.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetProfile {
    /// Monthly income
    pub income: u64,
    /// Monthly savings target, subtracted from available funds
    pub savings_target: u64,
    pub onboarding_complete: bool,
}
