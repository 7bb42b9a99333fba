//! Debt minimization.
//!
//! Turns a list of balances into transfers that bring every balance to zero,
//! by repeatedly matching the largest creditor with the largest debtor. Ties
//! go to the smallest person id, so the output is fully determined by the
//! input.
//!
//! The greedy matching is not optimal in every case (the exact minimum is
//! NP-hard) but never emits more than `k - 1` transfers for `k` people with a
//! non-zero balance.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{Balance, EngineError, MoneyCents, ResultEngine, Transaction};

/// Remaining amount of one side, ordered so the heap pops the largest
/// amount first and, among equal amounts, the smallest person id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    remaining: MoneyCents,
    person_id: Reverse<i64>,
}

/// Computes the transfers settling `balances`, in emission order.
///
/// Fails with [`EngineError::UnbalancedInput`] when the nets do not sum to
/// zero.
pub fn minimize(balances: &[Balance]) -> ResultEngine<Vec<Transaction>> {
    let total = balances
        .iter()
        .try_fold(MoneyCents::ZERO, |acc, balance| acc.checked_add(balance.net))
        .ok_or_else(|| EngineError::UnbalancedInput("balance total overflows".to_string()))?;
    if !total.is_zero() {
        return Err(EngineError::UnbalancedInput(format!(
            "balances sum to {total} instead of 0"
        )));
    }

    let name_of = |person_id: i64| {
        balances
            .iter()
            .find(|balance| balance.person_id == person_id)
            .map(|balance| balance.name.clone())
            .unwrap_or_default()
    };

    let mut creditors = BinaryHeap::new();
    let mut debtors = BinaryHeap::new();
    for balance in balances {
        let pending = Pending {
            remaining: balance.net.abs(),
            person_id: Reverse(balance.person_id),
        };
        if balance.net.is_positive() {
            creditors.push(pending);
        } else if balance.net.is_negative() {
            debtors.push(pending);
        }
    }

    let mut transactions = Vec::new();
    loop {
        let (mut creditor, mut debtor) = match (creditors.pop(), debtors.pop()) {
            (Some(creditor), Some(debtor)) => (creditor, debtor),
            (None, None) => break,
            // A zero total means both sides drain together.
            _ => {
                return Err(EngineError::UnbalancedInput(
                    "transfers left a balance unsettled".to_string(),
                ));
            }
        };

        let amount = creditor.remaining.min(debtor.remaining);
        let Reverse(from_id) = debtor.person_id;
        let Reverse(to_id) = creditor.person_id;
        transactions.push(Transaction {
            from_id,
            from_name: name_of(from_id),
            to_id,
            to_name: name_of(to_id),
            amount,
        });

        creditor.remaining -= amount;
        debtor.remaining -= amount;
        if creditor.remaining.is_positive() {
            creditors.push(creditor);
        }
        if debtor.remaining.is_positive() {
            debtors.push(debtor);
        }
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;

    fn balance(person_id: i64, net: i64) -> Balance {
        Balance {
            person_id,
            name: format!("p{person_id}"),
            paid: MoneyCents::ZERO,
            owed: MoneyCents::ZERO,
            net: MoneyCents::new(net),
        }
    }

    fn summary(transactions: &[Transaction]) -> Vec<(i64, i64, i64)> {
        transactions
            .iter()
            .map(|t| (t.from_id, t.to_id, t.amount.cents()))
            .collect()
    }

    #[test]
    fn dinner_debtors_pay_in_id_order() {
        let balances = vec![balance(1, 60_00), balance(2, -30_00), balance(3, -30_00)];
        let transactions = minimize(&balances).unwrap();
        assert_eq!(
            summary(&transactions),
            vec![(2, 1, 30_00), (3, 1, 30_00)]
        );
        assert_eq!(transactions[0].from_name, "p2");
        assert_eq!(transactions[0].to_name, "p1");
    }

    #[test]
    fn largest_creditor_and_debtor_are_matched_first() {
        let balances = vec![
            balance(1, 10_00),
            balance(2, 50_00),
            balance(3, -45_00),
            balance(4, -15_00),
        ];
        assert_eq!(
            summary(&minimize(&balances).unwrap()),
            vec![(3, 2, 45_00), (4, 1, 10_00), (4, 2, 5_00)]
        );
    }

    #[test]
    fn equal_creditors_break_ties_by_id() {
        let balances = vec![balance(5, 20_00), balance(2, 20_00), balance(9, -40_00)];
        assert_eq!(
            summary(&minimize(&balances).unwrap()),
            vec![(9, 2, 20_00), (9, 5, 20_00)]
        );
    }

    #[test]
    fn settled_group_needs_no_transactions() {
        assert!(minimize(&[]).unwrap().is_empty());
        assert!(minimize(&[balance(1, 0), balance(2, 0)]).unwrap().is_empty());
    }

    #[test]
    fn unbalanced_input_is_fatal() {
        let err = minimize(&[balance(1, 10_00), balance(2, -9_99)]).unwrap_err();
        assert!(matches!(err, EngineError::UnbalancedInput(_)));
    }

    #[test]
    fn output_is_stable_across_runs() {
        let balances = vec![
            balance(1, 7_00),
            balance(2, -3_50),
            balance(3, 7_00),
            balance(4, -3_50),
            balance(5, -7_00),
        ];
        let first = minimize(&balances).unwrap();
        let mut reversed = balances.clone();
        reversed.reverse();
        assert_eq!(first, minimize(&balances).unwrap());
        assert_eq!(first, minimize(&reversed).unwrap());
    }

    fn arb_balances() -> impl Strategy<Value = Vec<Balance>> {
        prop::collection::vec(-1_000_000i64..1_000_000, 1..12).prop_map(|mut nets| {
            let total: i64 = nets.iter().sum();
            nets.push(-total);
            nets.into_iter()
                .enumerate()
                .map(|(index, net)| balance(index as i64 + 1, net))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Applying every transfer brings every balance to exactly zero.
        #[test]
        fn transfers_zero_every_balance(balances in arb_balances()) {
            let transactions = minimize(&balances).unwrap();
            let mut remaining: BTreeMap<i64, i64> = balances
                .iter()
                .map(|b| (b.person_id, b.net.cents()))
                .collect();
            for t in &transactions {
                prop_assert!(t.amount.is_positive());
                *remaining.get_mut(&t.from_id).unwrap() += t.amount.cents();
                *remaining.get_mut(&t.to_id).unwrap() -= t.amount.cents();
            }
            prop_assert!(remaining.values().all(|net| *net == 0));
        }

        /// Never more than `k - 1` transfers for `k` non-zero balances.
        #[test]
        fn transaction_count_is_bounded(balances in arb_balances()) {
            let transactions = minimize(&balances).unwrap();
            let non_zero = balances.iter().filter(|b| !b.net.is_zero()).count();
            prop_assert!(transactions.len() <= non_zero.saturating_sub(1));
        }
    }
}
