use serde::{Deserialize, Serialize};

const DEFAULT_SINGLE_MIN_AGE: u8 = 35;
const DEFAULT_MARRIED_MIN_AGE: u8 = 21;

/// Age thresholds applied by the eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub single_min_age: u8,
    pub married_min_age: u8,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            single_min_age: DEFAULT_SINGLE_MIN_AGE,
            married_min_age: DEFAULT_MARRIED_MIN_AGE,
        }
    }
}
