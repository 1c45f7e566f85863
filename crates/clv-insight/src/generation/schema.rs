//! Response schemas declared to the model
//!
//! These use the Gemini `responseSchema` dialect (upper-case type names). They
//! mirror the serde types in `crate::types`; `crate::ingestion::validate` is
//! the authority on what is accepted.

use serde_json::{json, Map, Value};

use crate::types::{CustomerSegment, Gender};

/// Fields every customer object must carry (`response` is optional)
pub const REQUIRED_CUSTOMER_FIELDS: [&str; 23] = [
    "id",
    "state",
    "coverage",
    "education",
    "employmentStatus",
    "gender",
    "income",
    "locationCode",
    "maritalStatus",
    "monthlyPremiumAuto",
    "monthsSinceLastClaim",
    "monthsSincePolicyInception",
    "numberOfOpenComplaints",
    "numberOfPolicies",
    "policyType",
    "policy",
    "renewOfferType",
    "salesChannel",
    "totalClaimAmount",
    "vehicleClass",
    "vehicleSize",
    "segment",
    "clvData",
];

/// Fields every `clvData` object must carry
pub const REQUIRED_CLV_FIELDS: [&str; 8] = [
    "clvEstimate",
    "confidenceInterval",
    "recency",
    "frequency",
    "monetary",
    "purchaseProbability",
    "expectedPurchases",
    "shapValues",
];

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn number() -> Value {
    json!({ "type": "NUMBER" })
}

fn integer() -> Value {
    json!({ "type": "INTEGER" })
}

fn described(kind: &str, description: &str) -> Value {
    json!({ "type": kind, "description": description })
}

fn object(properties: Vec<(&str, Value)>, required: &[&str]) -> Value {
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required
    })
}

fn shap_values_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": object(
            vec![("feature", string()), ("value", number())],
            &["feature", "value"]
        )
    })
}

fn clv_data_schema() -> Value {
    let interval = json!({
        "type": "ARRAY",
        "items": number(),
        "minItems": 2,
        "maxItems": 2
    });

    object(
        vec![
            ("clvEstimate", number()),
            ("confidenceInterval", interval),
            (
                "recency",
                described("INTEGER", "Use the value from 'Months Since Last Claim'."),
            ),
            (
                "frequency",
                described("INTEGER", "Use the value from 'Number of Policies'."),
            ),
            (
                "monetary",
                described("NUMBER", "Use the value from 'Monthly Premium Auto'."),
            ),
            ("purchaseProbability", number()),
            ("expectedPurchases", number()),
            ("shapValues", shap_values_schema()),
        ],
        &REQUIRED_CLV_FIELDS,
    )
}

/// Schema for one customer object
pub fn customer_schema() -> Value {
    let segments: Vec<&str> = CustomerSegment::ALL.iter().map(|s| s.as_str()).collect();
    let genders: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();

    object(
        vec![
            ("id", described("STRING", "The 'Customer' ID from the CSV.")),
            ("state", string()),
            ("response", string()),
            ("coverage", string()),
            ("education", string()),
            ("employmentStatus", string()),
            ("gender", json!({ "type": "STRING", "enum": genders })),
            ("income", number()),
            ("locationCode", string()),
            ("maritalStatus", string()),
            ("monthlyPremiumAuto", number()),
            ("monthsSinceLastClaim", integer()),
            ("monthsSincePolicyInception", integer()),
            ("numberOfOpenComplaints", integer()),
            ("numberOfPolicies", integer()),
            ("policyType", string()),
            ("policy", string()),
            ("renewOfferType", string()),
            ("salesChannel", string()),
            ("totalClaimAmount", number()),
            ("vehicleClass", string()),
            ("vehicleSize", string()),
            ("segment", json!({ "type": "STRING", "enum": segments })),
            ("clvData", clv_data_schema()),
        ],
        &REQUIRED_CUSTOMER_FIELDS,
    )
}

/// Schema for a batch response
pub fn customer_array_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": customer_schema()
    })
}

/// Schema for a recommendation response
pub fn recommendation_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": string(),
                "description": string(),
                "rationale": string()
            },
            "required": ["title", "description", "rationale"]
        }
    })
}
