//! Marketing recommendation types

use serde::{Deserialize, Serialize};

/// One actionable marketing recommendation for a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketingAction {
    /// Short, compelling title
    pub title: String,
    /// The action to be taken
    pub description: String,
    /// Why this action suits this customer
    pub rationale: String,
}
