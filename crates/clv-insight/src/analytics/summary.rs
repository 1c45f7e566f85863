//! Aggregates computed over the loaded customer collection

use std::cmp::Ordering;

use crate::types::{Customer, CustomerSummary, DashboardSummary, SegmentCount};

/// Build the dashboard summary, listing the `top_n` highest-CLV customers
pub fn summarize(customers: &[Customer], top_n: usize) -> DashboardSummary {
    let total_predicted_clv: f64 = customers.iter().map(|c| c.clv_data.clv_estimate).sum();
    let average_clv = if customers.is_empty() {
        0.0
    } else {
        total_predicted_clv / customers.len() as f64
    };

    let mut segment_counts: Vec<SegmentCount> = Vec::new();
    for customer in customers {
        match segment_counts.iter_mut().find(|s| s.name == customer.segment) {
            Some(entry) => entry.value += 1,
            None => segment_counts.push(SegmentCount {
                name: customer.segment,
                value: 1,
            }),
        }
    }

    let mut ranked: Vec<&Customer> = customers.iter().collect();
    // stable sort keeps upload order among equal estimates
    ranked.sort_by(|a, b| {
        b.clv_data
            .clv_estimate
            .partial_cmp(&a.clv_data.clv_estimate)
            .unwrap_or(Ordering::Equal)
    });
    let top_customers = ranked
        .into_iter()
        .take(top_n)
        .map(CustomerSummary::from)
        .collect();

    DashboardSummary {
        total_customers: customers.len(),
        total_predicted_clv,
        average_clv,
        segment_counts,
        top_customers,
    }
}

/// Case-insensitive substring match on id, state and policy type
///
/// A blank term matches everything.
pub fn filter_customers<'a>(customers: &'a [Customer], term: &str) -> Vec<&'a Customer> {
    let term = term.trim().to_lowercase();
    customers
        .iter()
        .filter(|c| {
            term.is_empty()
                || c.id.to_lowercase().contains(&term)
                || c.state.to_lowercase().contains(&term)
                || c.policy_type.to_lowercase().contains(&term)
        })
        .collect()
}
