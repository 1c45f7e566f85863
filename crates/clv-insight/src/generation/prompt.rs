//! Prompt templates for customer extraction and recommendations

use crate::types::{Customer, PartialCustomer};

/// Number of recommendations requested per customer
pub const RECOMMENDATION_COUNT: usize = 3;

const SEGMENT_RULES: &str = "Assign a customer 'segment' ('Champion', 'Loyal', 'At Risk', 'Lost', 'Newcomer') that logically follows from the data. Customers with long policy inception, many policies, and low months since last claim are 'Champion'. Customers with very high months since last claim are 'At Risk' or 'Lost'.";

const RFM_RULES: &str = "Generate the 'clvData' object using specific columns as proxies for Recency, Frequency, and Monetary (RFM) values:
    - recency: use the exact value from 'Months Since Last Claim'.
    - frequency: use the exact value from 'Number of Policies'.
    - monetary: use the exact value from 'Monthly Premium Auto'.";

const ESTIMATION_RULES: &str = "Based on all available customer data (income, policy details, RFM proxies), estimate a plausible Customer Lifetime Value ('clvEstimate'). A customer with high income, multiple policies, and a high premium should have a high CLV.
Generate a realistic 95% confidence interval for the CLV estimate as [lower, upper] with lower <= upper.
Estimate a 'purchaseProbability' between 0 and 1 (likelihood of renewal or buying another policy) and 'expectedPurchases' (number of future policies or renewals).";

/// Prompt builder for extraction and recommendation requests
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt for one CSV batch (header plus rows)
    pub fn build_batch_prompt(csv_batch: &str) -> String {
        format!(
            r#"You are a data science expert specializing in the insurance industry. Transform the raw CSV customer data below into a structured JSON array of customer objects.

For each customer row:
1. Create exactly one JSON object. The 'id' field must be the 'Customer' value from the CSV.
2. Map the columns directly to the corresponding fields of the object.
3. {rfm}
4. {estimation}
5. {segments}
6. Generate a list of SHAP values (CLV drivers) consistent with the customer's profile. Key drivers will likely be 'Income', 'Number of Policies', 'Monthly Premium Auto', and 'Months Since Policy Inception'.

Keep the customers in the same order as the CSV rows and do not skip or merge rows.

CSV DATA:
```csv
{csv}
```

Return ONLY the JSON array of customer objects, adhering strictly to the provided JSON schema."#,
            rfm = RFM_RULES,
            estimation = ESTIMATION_RULES,
            segments = SEGMENT_RULES,
            csv = csv_batch
        )
    }

    /// Prompt for completing one partially known customer
    pub fn build_single_customer_prompt(partial: &PartialCustomer) -> String {
        let known = partial
            .known_attributes()
            .into_iter()
            .map(|(label, value)| format!("- {}: {}", label, value))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a data science expert specializing in the insurance industry. Complete the profile of a single new customer from partial data and return it as one structured JSON object.

KNOWN INFORMATION:
{known}

Steps:
1. Complete the full JSON object for this customer. Keep every known value unchanged, including the 'id'. Generate sensible defaults for missing fields such as 'employmentStatus', 'gender' and 'maritalStatus'.
2. {rfm}
3. {estimation}
4. {segments}
5. Generate a list of SHAP values (CLV drivers) consistent with the customer's profile.

Return ONLY the single, complete JSON object for this customer, adhering strictly to the provided JSON schema."#,
            known = known,
            rfm = RFM_RULES,
            estimation = ESTIMATION_RULES,
            segments = SEGMENT_RULES
        )
    }

    /// Prompt for marketing recommendations for one customer
    pub fn build_recommendation_prompt(customer: &Customer) -> String {
        let drivers = customer
            .clv_data
            .shap_values
            .iter()
            .map(|s| {
                let impact = if s.value > 0.0 {
                    "Positive impact"
                } else {
                    "Negative impact"
                };
                format!("  - {}: {}", s.feature, impact)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are an expert marketing strategist for an insurance company. Your goal is to increase customer lifetime value and retention.

CUSTOMER PROFILE:
- Customer ID: {id}
- State: {state}
- Segment: {segment}
- Predicted CLV: ${clv:.2}
- Employment Status: {employment}
- Income: ${income}
- Policies: {policies} ({policy_type})
- Coverage Level: {coverage}
- Monthly Premium: ${premium}
- Months Since Last Claim: {last_claim}
- Months Since Policy Inception: {inception}
- Key CLV Drivers (SHAP values):
{drivers}

Provide {count} distinct, actionable marketing recommendations to improve this customer's retention and increase their lifetime value. For each one give a short, compelling title, a clear description of the action, and a concise rationale explaining why it suits this specific customer.

Return ONLY a JSON array of objects with "title", "description" and "rationale" keys."#,
            id = customer.id,
            state = customer.state,
            segment = customer.segment,
            clv = customer.clv_data.clv_estimate,
            employment = customer.employment_status,
            income = customer.income,
            policies = customer.number_of_policies,
            policy_type = customer.policy_type,
            coverage = customer.coverage,
            premium = customer.monthly_premium_auto,
            last_claim = customer.months_since_last_claim,
            inception = customer.months_since_policy_inception,
            drivers = drivers,
            count = RECOMMENDATION_COUNT
        )
    }
}
