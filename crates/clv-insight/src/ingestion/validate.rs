//! Strict parsing of model responses
//!
//! Responses are deserialized into typed records (required fields, enum values
//! and integer counters are enforced by serde) and then checked for the value
//! constraints serde cannot express. Nothing is coerced: any mismatch is an
//! `Error::SchemaViolation`.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::types::{Customer, MarketingAction};

/// Parse a JSON array of customers
pub fn parse_customers(text: &str) -> Result<Vec<Customer>> {
    let customers: Vec<Customer> = parse_json(text, "customer array")?;
    for (i, customer) in customers.iter().enumerate() {
        check_customer(customer).map_err(|e| Error::schema(format!("customer #{}: {}", i, e)))?;
    }
    Ok(customers)
}

/// Parse a single JSON customer object
pub fn parse_customer(text: &str) -> Result<Customer> {
    let customer: Customer = parse_json(text, "customer object")?;
    check_customer(&customer).map_err(Error::schema)?;
    Ok(customer)
}

/// Parse a non-empty JSON array of marketing actions
pub fn parse_recommendations(text: &str) -> Result<Vec<MarketingAction>> {
    let actions: Vec<MarketingAction> = parse_json(text, "recommendation array")?;
    if actions.is_empty() {
        return Err(Error::schema("recommendation array is empty"));
    }

    for (i, action) in actions.iter().enumerate() {
        for (field, value) in [
            ("title", &action.title),
            ("description", &action.description),
            ("rationale", &action.rationale),
        ] {
            if value.trim().is_empty() {
                return Err(Error::schema(format!(
                    "recommendation #{}: `{}` is empty",
                    i, field
                )));
            }
        }
    }

    Ok(actions)
}

fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text.trim())
        .map_err(|e| Error::schema(format!("response is not a valid {}: {}", what, e)))
}

/// Value constraints on an already well-typed customer
fn check_customer(customer: &Customer) -> std::result::Result<(), String> {
    if customer.id.trim().is_empty() {
        return Err("`id` is empty".to_string());
    }

    let clv = &customer.clv_data;
    let numbers = [
        ("income", customer.income),
        ("monthlyPremiumAuto", customer.monthly_premium_auto),
        ("totalClaimAmount", customer.total_claim_amount),
        ("clvData.clvEstimate", clv.clv_estimate),
        ("clvData.confidenceInterval[0]", clv.confidence_interval[0]),
        ("clvData.confidenceInterval[1]", clv.confidence_interval[1]),
        ("clvData.monetary", clv.monetary),
        ("clvData.purchaseProbability", clv.purchase_probability),
        ("clvData.expectedPurchases", clv.expected_purchases),
    ];
    for (field, value) in numbers {
        if !value.is_finite() {
            return Err(format!("`{}` is not a finite number", field));
        }
    }
    if let Some(shap) = clv.shap_values.iter().find(|s| !s.value.is_finite()) {
        return Err(format!("SHAP value for `{}` is not a finite number", shap.feature));
    }

    let [lower, upper] = clv.confidence_interval;
    if lower > upper {
        return Err(format!(
            "confidence interval is inverted: [{}, {}]",
            lower, upper
        ));
    }
    if !(0.0..=1.0).contains(&clv.purchase_probability) {
        return Err(format!(
            "purchaseProbability {} is outside 0..=1",
            clv.purchase_probability
        ));
    }
    if clv.expected_purchases < 0.0 {
        return Err("expectedPurchases is negative".to_string());
    }

    // RFM proxies are copies of source columns, not estimates
    if clv.recency != customer.months_since_last_claim {
        return Err(format!(
            "recency {} does not match monthsSinceLastClaim {}",
            clv.recency, customer.months_since_last_claim
        ));
    }
    if clv.frequency != customer.number_of_policies {
        return Err(format!(
            "frequency {} does not match numberOfPolicies {}",
            clv.frequency, customer.number_of_policies
        ));
    }
    let tolerance = 1e-6 * customer.monthly_premium_auto.abs().max(1.0);
    if (clv.monetary - customer.monthly_premium_auto).abs() > tolerance {
        return Err(format!(
            "monetary {} does not match monthlyPremiumAuto {}",
            clv.monetary, customer.monthly_premium_auto
        ));
    }

    Ok(())
}
