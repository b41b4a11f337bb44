//! Business-metric estimates: conversion, churn, and lifetime value.
//!
//! Run with: `cargo run --example conversion_rate`
use conjugate::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn main() {
    let mut rng = SmallRng::seed_from_u64(0xC14);
    let metrics = BusinessMetrics::new();

    let conversion = metrics
        .conversion_rate(120, 1000, &mut rng)
        .expect("counts are valid");
    let (lo, hi) = conversion.ci95();
    println!(
        "Conversion rate: {:.4} [{:.4}, {:.4}]",
        conversion.mean(),
        lo,
        hi
    );

    let orders = [48.0, 52.5, 39.9, 61.0, 44.3, 55.7, 49.9, 58.2];
    let aov = metrics
        .average_order_value(&orders, &mut rng)
        .expect("enough orders");
    println!("Average order value: {:.2}", aov.mean());

    let churn = metrics
        .churn_probability(870, 130, &mut rng)
        .expect("counts are valid");
    println!("Churn probability: {:.4}", churn.mean());

    let clv = metrics.customer_lifetime_value(&aov, &conversion, &churn);
    let (clv_lo, clv_hi) = clv.ci95();
    println!("CLV: {:.2} [{:.2}, {:.2}]", clv.mean(), clv_lo, clv_hi);

    let history = [1_000.0, 1_150.0, 1_220.0, 1_310.0, 1_400.0, 1_490.0];
    let projections = metrics
        .revenue_projection(&history, 3, &mut rng)
        .expect("enough history");
    for (t, projection) in projections.iter().enumerate() {
        let (p_lo, p_hi) = projection.ci95();
        println!(
            "Revenue t+{}: {:.0} [{:.0}, {:.0}]",
            t + 1,
            projection.mean(),
            p_lo,
            p_hi
        );
    }
}
