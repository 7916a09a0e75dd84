// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned conversations for integration tests.

use strata_core::TurnInput;

/// A ten-turn finance review where early facts are asked about again later.
pub fn finance_review() -> Vec<TurnInput> {
    [
        (
            "What was our Q1 revenue?",
            "Q1 revenue was $4.5M, up 10% year over year.",
            &["Q1", "revenue"][..],
        ),
        (
            "And Q2?",
            "Q2 revenue reached $5.2M, 15% growth on Q1.",
            &["Q2", "revenue"][..],
        ),
        (
            "Who are the largest customers?",
            "Acme Corp at $1M and TechStart at $800K lead the list.",
            &["Acme Corp", "TechStart", "customers"][..],
        ),
        (
            "What is churn doing?",
            "Churn is 3.2%, down from 4.5% last quarter.",
            &["churn"][..],
        ),
        (
            "How does our pricing compare?",
            "Competitors charge about 20% more; we hold a cost advantage.",
            &["pricing", "competitors"][..],
        ),
        (
            "What are the Q3 projections?",
            "Q3 is projected at $6M on the current pipeline.",
            &["Q3", "projections"][..],
        ),
        (
            "Name the main competitors.",
            "CompX, DataCo and CloudTech.",
            &["CompX", "DataCo", "CloudTech", "competitors"][..],
        ),
        (
            "Remind me of Q2 revenue.",
            "Q2 revenue was $5.2M.",
            &["Q2", "revenue"][..],
        ),
        (
            "Compare Q1 and Q2.",
            "Q2 at $5.2M was 15.5% above Q1 at $4.5M.",
            &["Q1", "Q2"][..],
        ),
        (
            "What is our pricing strategy?",
            "Value-based pricing, 15-20% below competitors.",
            &["pricing", "strategy"][..],
        ),
    ]
    .into_iter()
    .map(|(user, assistant, entities)| {
        TurnInput::new(user, assistant).with_entities(entities.iter().copied())
    })
    .collect()
}

/// `n` short turns, each tagged with a unique entity `topic-{i}`.
pub fn numbered_turns(n: usize) -> Vec<TurnInput> {
    (1..=n)
        .map(|i| {
            TurnInput::new(format!("question {i}"), format!("answer {i}"))
                .with_entities([format!("topic-{i}")])
        })
        .collect()
}
