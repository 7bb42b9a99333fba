//! Balance calculation.
//!
//! Reduces the events of a group into one [`Balance`] per person:
//!
//! - `paid`: sum of the amounts of the events the person paid for;
//! - `owed`: sum of the person's allocated cost over every event they take
//!   part in;
//! - `net = paid - owed`.
//!
//! Allocation is exact to the cent: each participant gets
//! `amount * weight / total_weight` rounded half-to-even, and the last
//! weighted participant (ascending person id) absorbs the residual so the
//! allocations always add up to the event amount. Consequently the nets of a
//! group always sum to zero.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{EngineError, Event, MoneyCents, Person, ResultEngine};

/// A person's position in a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub person_id: i64,
    pub name: String,
    pub paid: MoneyCents,
    pub owed: MoneyCents,
    pub net: MoneyCents,
}

/// Computes the balance of every person, ordered by ascending person id.
///
/// People without any event get an all-zero balance.
pub fn compute_balances(people: &[Person], events: &[Event]) -> ResultEngine<Vec<Balance>> {
    let mut totals: BTreeMap<i64, (MoneyCents, MoneyCents)> = people
        .iter()
        .map(|person| (person.id, (MoneyCents::ZERO, MoneyCents::ZERO)))
        .collect();

    for event in events {
        let allocations = allocate(event)?;

        let (paid, _) = totals.get_mut(&event.payer_id).ok_or_else(|| {
            EngineError::UnknownPerson(format!(
                "payer {} of event {} is not a group member",
                event.payer_id, event.id
            ))
        })?;
        *paid = paid.checked_add(event.amount).ok_or_else(overflow)?;

        for (person_id, cost) in allocations {
            let (_, owed) = totals.get_mut(&person_id).ok_or_else(|| {
                EngineError::UnknownPerson(format!(
                    "participant {person_id} of event {} is not a group member",
                    event.id
                ))
            })?;
            *owed = owed.checked_add(cost).ok_or_else(overflow)?;
        }
    }

    let mut names: BTreeMap<i64, &str> = BTreeMap::new();
    for person in people {
        names.insert(person.id, person.name.as_str());
    }

    Ok(totals
        .into_iter()
        .map(|(person_id, (paid, owed))| Balance {
            person_id,
            name: names.get(&person_id).copied().unwrap_or_default().to_string(),
            paid,
            owed,
            net: paid - owed,
        })
        .collect())
}

/// Splits the amount of `event` among its participants.
///
/// Returns `(person_id, cost)` pairs in ascending person id order; the costs
/// sum exactly to `event.amount`.
pub fn allocate(event: &Event) -> ResultEngine<Vec<(i64, MoneyCents)>> {
    if !event.amount.is_positive() {
        return Err(EngineError::InvalidEvent(format!(
            "event {} amount must be > 0",
            event.id
        )));
    }
    if event.shares.is_empty() {
        return Err(EngineError::InvalidEvent(format!(
            "event {} has no participants",
            event.id
        )));
    }

    let mut shares = event.shares.clone();
    shares.sort_by_key(|share| share.person_id);
    if shares.windows(2).any(|pair| pair[0].person_id == pair[1].person_id) {
        return Err(EngineError::InvalidEvent(format!(
            "event {} lists a participant twice",
            event.id
        )));
    }
    if let Some(share) = shares.iter().find(|share| share.weight.is_negative()) {
        return Err(EngineError::InvalidEvent(format!(
            "event {} has a negative weight for person {}",
            event.id, share.person_id
        )));
    }

    let total_weight: i128 = shares
        .iter()
        .map(|share| i128::from(share.weight.micros()))
        .sum();
    if total_weight == 0 {
        return Err(EngineError::InvalidEvent(format!(
            "event {} has a total weight of zero",
            event.id
        )));
    }

    // The last participant with a non-zero weight takes the rounding residual;
    // zero-weight participants must stay at exactly zero.
    let residual_index = shares
        .iter()
        .rposition(|share| !share.weight.is_zero())
        .unwrap_or(shares.len() - 1);

    let amount = i128::from(event.amount.cents());
    let mut allocations = Vec::with_capacity(shares.len());
    let mut allocated: i128 = 0;
    for (index, share) in shares.iter().enumerate() {
        if index == residual_index {
            allocations.push((share.person_id, 0));
            continue;
        }
        let cost = div_round_half_even(amount * i128::from(share.weight.micros()), total_weight);
        allocated += cost;
        allocations.push((share.person_id, cost));
    }
    allocations[residual_index].1 = amount - allocated;

    allocations
        .into_iter()
        .map(|(person_id, cost)| {
            i64::try_from(cost)
                .map(|cents| (person_id, MoneyCents::new(cents)))
                .map_err(|_| overflow())
        })
        .collect()
}

/// Integer division of non-negative operands, rounding half to even.
fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    match (remainder * 2).cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
    }
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}
