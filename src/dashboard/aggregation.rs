//! Aggregation of transactions for the dashboard: the total spent and the
//! per-category breakdown.

use std::collections::HashMap;

use crate::{category::Category, transaction::Transaction};

/// One row of the category breakdown.
#[derive(Debug, PartialEq)]
pub(super) struct CategoryTotal {
    pub(super) category: Category,
    pub(super) total: f64,
    /// Share of the overall total, rounded to whole percent.
    pub(super) percent: i64,
}

/// Sum of all transaction amounts.
pub(super) fn total_spent(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|transaction| transaction.amount).sum()
}

/// Aggregate transaction amounts per category, largest first.
///
/// Only categories that actually occur are returned. Ties on the total are
/// broken by the category's position in the fixed display order, so the
/// breakdown is deterministic.
pub(super) fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, f64> = HashMap::new();

    for transaction in transactions {
        *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
    }

    let grand_total = total_spent(transactions);

    let mut breakdown: Vec<CategoryTotal> = crate::category::CATEGORIES
        .iter()
        .filter_map(|category| {
            totals.get(category).map(|&total| CategoryTotal {
                category: *category,
                total,
                percent: if grand_total > 0.0 {
                    (total / grand_total * 100.0).round() as i64
                } else {
                    0
                },
            })
        })
        .collect();

    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));

    breakdown
}

#[cfg(test)]
mod aggregation_tests {
    use crate::{category::Category, transaction::Transaction};

    use super::{category_breakdown, total_spent};

    fn create_test_transaction(amount: f64, category: Category) -> Transaction {
        Transaction::new("test", amount, category)
    }

    #[test]
    fn total_sums_all_amounts() {
        let transactions = vec![
            create_test_transaction(100.0, Category::Food),
            create_test_transaction(50.0, Category::Transport),
            create_test_transaction(30.0, Category::Food),
        ];

        assert_eq!(total_spent(&transactions), 180.0);
    }

    #[test]
    fn total_of_no_transactions_is_zero() {
        assert_eq!(total_spent(&[]), 0.0);
    }

    #[test]
    fn breakdown_groups_by_category_largest_first() {
        let transactions = vec![
            create_test_transaction(20.0, Category::Transport),
            create_test_transaction(100.0, Category::Food),
            create_test_transaction(60.0, Category::Food),
            create_test_transaction(20.0, Category::Health),
        ];

        let result = category_breakdown(&transactions);

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].category, Category::Food);
        assert_eq!(result[0].total, 160.0);
        assert_eq!(result[0].percent, 80);
        // Transport and Health tie on 20.0, display order breaks the tie.
        assert_eq!(result[1].category, Category::Transport);
        assert_eq!(result[2].category, Category::Health);
        assert_eq!(result[1].percent, 10);
    }

    #[test]
    fn breakdown_of_no_transactions_is_empty() {
        assert!(category_breakdown(&[]).is_empty());
    }

    #[test]
    fn breakdown_skips_unused_categories() {
        let transactions = vec![create_test_transaction(10.0, Category::Other)];

        let result = category_breakdown(&transactions);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::Other);
        assert_eq!(result[0].percent, 100);
    }
}
