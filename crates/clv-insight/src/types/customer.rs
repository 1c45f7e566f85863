//! Customer record types
//!
//! Field names serialize as camelCase, matching both the schema declared to the
//! extraction model and the JSON served to dashboard clients.

use serde::{Deserialize, Serialize};

/// Customer segment assigned by the extraction model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerSegment {
    Champion,
    Loyal,
    #[serde(rename = "At Risk")]
    AtRisk,
    Lost,
    Newcomer,
}

impl CustomerSegment {
    /// All segments in display order
    pub const ALL: [CustomerSegment; 5] = [
        CustomerSegment::Champion,
        CustomerSegment::Loyal,
        CustomerSegment::AtRisk,
        CustomerSegment::Lost,
        CustomerSegment::Newcomer,
    ];

    /// Label as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerSegment::Champion => "Champion",
            CustomerSegment::Loyal => "Loyal",
            CustomerSegment::AtRisk => "At Risk",
            CustomerSegment::Lost => "Lost",
            CustomerSegment::Newcomer => "Newcomer",
        }
    }
}

impl std::fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Named, signed contribution of one feature to the CLV estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapValue {
    pub feature: String,
    pub value: f64,
}

/// CLV estimate with RFM proxies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClvData {
    /// Point estimate of lifetime value
    pub clv_estimate: f64,
    /// 95% interval as `[lower, upper]`
    pub confidence_interval: [f64; 2],
    /// Months since last claim
    pub recency: u32,
    /// Number of policies
    pub frequency: u32,
    /// Monthly premium
    pub monetary: f64,
    /// Likelihood of renewal or buying another policy (0.0-1.0)
    pub purchase_probability: f64,
    /// Expected future policies or renewals
    pub expected_purchases: f64,
    /// CLV drivers, in the order the model ranked them
    pub shap_values: Vec<ShapValue>,
}

/// Fully processed insurance customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Customer {
    /// The `Customer` column of the source CSV
    pub id: String,
    pub state: String,
    /// Response to the last marketing campaign; not always present in source data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub coverage: String,
    pub education: String,
    pub employment_status: String,
    pub gender: Gender,
    pub income: f64,
    pub location_code: String,
    pub marital_status: String,
    pub monthly_premium_auto: f64,
    pub months_since_last_claim: u32,
    pub months_since_policy_inception: u32,
    pub number_of_open_complaints: u32,
    pub number_of_policies: u32,
    pub policy_type: String,
    pub policy: String,
    pub renew_offer_type: String,
    pub sales_channel: String,
    pub total_claim_amount: f64,
    pub vehicle_class: String,
    pub vehicle_size: String,
    pub segment: CustomerSegment,
    pub clv_data: ClvData,
}

/// Sparse attribute set for a customer entered by hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCustomer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_premium_auto: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_since_last_claim: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_since_policy_inception: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_policies: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_class: Option<String>,
}

impl PartialCustomer {
    /// Known attributes as `(label, value)` pairs, in prompt order
    pub fn known_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        let mut push = |label: &'static str, value: Option<String>| {
            if let Some(value) = value {
                attrs.push((label, value));
            }
        };

        push("Customer ID", self.id.clone());
        push("State", self.state.clone());
        push("Coverage", self.coverage.clone());
        push("Education", self.education.clone());
        push("Employment Status", self.employment_status.clone());
        push("Gender", self.gender.map(|g| g.as_str().to_string()));
        push("Income", self.income.map(|v| v.to_string()));
        push("Marital Status", self.marital_status.clone());
        push("Monthly Premium Auto", self.monthly_premium_auto.map(|v| v.to_string()));
        push("Months Since Last Claim", self.months_since_last_claim.map(|v| v.to_string()));
        push(
            "Months Since Policy Inception",
            self.months_since_policy_inception.map(|v| v.to_string()),
        );
        push("Number of Policies", self.number_of_policies.map(|v| v.to_string()));
        push("Policy Type", self.policy_type.clone());
        push("Vehicle Class", self.vehicle_class.clone());

        attrs
    }
}
