//! Stock-adjustment planning for supply usage lines.
//!
//! Activities and production cycles carry editable sets of usage lines. When
//! such a set is created, edited or deleted, stock must move accordingly.
//! These functions turn (old lines, new lines) into a plan of adjustments;
//! the plan is applied atomically inside one SQL transaction by infra, where
//! each consume is a guarded decrement that fails on insufficient stock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmgate_core::{DomainError, DomainResult, Quantity, SupplyId};

/// One editable usage line: "this activity/production consumed `quantity` of
/// `supply_id` on `used_on`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLine {
    pub supply_id: SupplyId,
    pub quantity: Quantity,
    pub used_on: NaiveDate,
}

impl UsageLine {
    pub fn new(supply_id: SupplyId, quantity: Quantity, used_on: NaiveDate) -> DomainResult<Self> {
        if quantity.is_zero() {
            return Err(DomainError::validation(
                "usage quantity must be greater than zero",
            ));
        }
        Ok(Self {
            supply_id,
            quantity,
            used_on,
        })
    }
}

/// One planned stock mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockAdjustment {
    /// Decrement `supply_id` by `quantity`. Fails the whole plan when the
    /// supply has less than `quantity` available. Appends a history row.
    Consume {
        supply_id: SupplyId,
        quantity: Quantity,
    },
    /// Increment `supply_id` by `quantity` (line removed or shrunk).
    Restock {
        supply_id: SupplyId,
        quantity: Quantity,
    },
}

impl StockAdjustment {
    pub fn supply_id(&self) -> SupplyId {
        match self {
            StockAdjustment::Consume { supply_id, .. }
            | StockAdjustment::Restock { supply_id, .. } => *supply_id,
        }
    }
}

fn reject_duplicates(lines: &[UsageLine], which: &str) -> DomainResult<()> {
    for (i, line) in lines.iter().enumerate() {
        if lines[i + 1..].iter().any(|l| l.supply_id == line.supply_id) {
            return Err(DomainError::validation(format!(
                "duplicate supply {} in {} usage set",
                line.supply_id, which
            )));
        }
    }
    Ok(())
}

/// Plan for a fresh creation: consume every line in full.
pub fn consumption_plan(lines: &[UsageLine]) -> DomainResult<Vec<StockAdjustment>> {
    reject_duplicates(lines, "new")?;
    Ok(lines
        .iter()
        .map(|l| StockAdjustment::Consume {
            supply_id: l.supply_id,
            quantity: l.quantity,
        })
        .collect())
}

/// Diff-based reconciliation plan for an edit.
///
/// - supply only in `old`: restock its full previously-consumed quantity
/// - supply in both: consume the increase, or restock the decrease
/// - supply only in `new`: consume in full
///
/// Per supply, `consumed - restocked` across the plan equals the net delta
/// between the new and old quantity.
pub fn reconcile_usage(
    old: &[UsageLine],
    new: &[UsageLine],
) -> DomainResult<Vec<StockAdjustment>> {
    reject_duplicates(old, "old")?;
    reject_duplicates(new, "new")?;

    let mut plan = Vec::new();

    for removed in old
        .iter()
        .filter(|o| !new.iter().any(|n| n.supply_id == o.supply_id))
    {
        plan.push(StockAdjustment::Restock {
            supply_id: removed.supply_id,
            quantity: removed.quantity,
        });
    }

    for line in new {
        match old.iter().find(|o| o.supply_id == line.supply_id) {
            Some(existing) => {
                if line.quantity > existing.quantity {
                    plan.push(StockAdjustment::Consume {
                        supply_id: line.supply_id,
                        quantity: line.quantity.abs_diff(existing.quantity),
                    });
                } else if line.quantity < existing.quantity {
                    plan.push(StockAdjustment::Restock {
                        supply_id: line.supply_id,
                        quantity: existing.quantity.abs_diff(line.quantity),
                    });
                }
                // Equal quantities need no stock movement.
            }
            None => plan.push(StockAdjustment::Consume {
                supply_id: line.supply_id,
                quantity: line.quantity,
            }),
        }
    }

    Ok(plan)
}

/// Plan for deleting the owner of the lines: return everything to stock.
pub fn restock_plan(lines: &[UsageLine]) -> Vec<StockAdjustment> {
    lines
        .iter()
        .map(|l| StockAdjustment::Restock {
            supply_id: l.supply_id,
            quantity: l.quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn qty(d: Decimal) -> Quantity {
        Quantity::new(d).unwrap()
    }

    fn line(supply_id: SupplyId, d: Decimal) -> UsageLine {
        UsageLine::new(supply_id, qty(d), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).unwrap()
    }

    #[test]
    fn removed_line_restocks_full_quantity() {
        let s = SupplyId::new();
        let plan = reconcile_usage(&[line(s, dec!(5))], &[]).unwrap();
        assert_eq!(
            plan,
            vec![StockAdjustment::Restock {
                supply_id: s,
                quantity: qty(dec!(5)),
            }]
        );
    }

    #[test]
    fn increased_line_consumes_only_the_diff() {
        let s = SupplyId::new();
        let plan = reconcile_usage(&[line(s, dec!(2))], &[line(s, dec!(3.5))]).unwrap();
        assert_eq!(
            plan,
            vec![StockAdjustment::Consume {
                supply_id: s,
                quantity: qty(dec!(1.5)),
            }]
        );
    }

    #[test]
    fn decreased_line_restocks_the_diff() {
        let s = SupplyId::new();
        let plan = reconcile_usage(&[line(s, dec!(4))], &[line(s, dec!(1))]).unwrap();
        assert_eq!(
            plan,
            vec![StockAdjustment::Restock {
                supply_id: s,
                quantity: qty(dec!(3)),
            }]
        );
    }

    #[test]
    fn unchanged_line_moves_no_stock() {
        let s = SupplyId::new();
        let plan = reconcile_usage(&[line(s, dec!(4))], &[line(s, dec!(4))]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn fresh_line_consumes_in_full() {
        let s = SupplyId::new();
        let plan = reconcile_usage(&[], &[line(s, dec!(7))]).unwrap();
        assert_eq!(
            plan,
            vec![StockAdjustment::Consume {
                supply_id: s,
                quantity: qty(dec!(7)),
            }]
        );
    }

    #[test]
    fn duplicate_supplies_in_a_set_are_rejected() {
        let s = SupplyId::new();
        let dup = vec![line(s, dec!(1)), line(s, dec!(2))];
        assert!(reconcile_usage(&dup, &[]).is_err());
        assert!(reconcile_usage(&[], &dup).is_err());
        assert!(consumption_plan(&dup).is_err());
    }

    #[test]
    fn mixed_edit_produces_one_adjustment_per_touched_supply() {
        let removed = SupplyId::new();
        let grown = SupplyId::new();
        let fresh = SupplyId::new();
        let old = vec![line(removed, dec!(2)), line(grown, dec!(1))];
        let new = vec![line(grown, dec!(4)), line(fresh, dec!(0.25))];

        let plan = reconcile_usage(&old, &new).unwrap();
        assert_eq!(plan.len(), 3);
        assert!(plan.contains(&StockAdjustment::Restock {
            supply_id: removed,
            quantity: qty(dec!(2)),
        }));
        assert!(plan.contains(&StockAdjustment::Consume {
            supply_id: grown,
            quantity: qty(dec!(3)),
        }));
        assert!(plan.contains(&StockAdjustment::Consume {
            supply_id: fresh,
            quantity: qty(dec!(0.25)),
        }));
    }

    // Conservation: per supply, consumed - restocked across one edit equals
    // the net delta between the new and old usage sets.
    proptest! {
        #[test]
        fn reconciliation_conserves_stock(
            quantities in proptest::collection::vec((0u8..3, 0u32..10_000, 0u32..10_000), 1..8)
        ) {
            // Three fixed supply ids; each tuple picks one plus old/new
            // quantities in hundredths (0 = line absent from that set).
            let supplies = [SupplyId::new(), SupplyId::new(), SupplyId::new()];
            let mut old: Vec<UsageLine> = Vec::new();
            let mut new: Vec<UsageLine> = Vec::new();

            for (idx, old_cents, new_cents) in quantities {
                let s = supplies[idx as usize];
                if old.iter().chain(new.iter()).any(|l| l.supply_id == s) {
                    continue;
                }
                let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
                if old_cents > 0 {
                    old.push(UsageLine::new(s, qty(Decimal::new(old_cents as i64, 2)), date).unwrap());
                }
                if new_cents > 0 {
                    new.push(UsageLine::new(s, qty(Decimal::new(new_cents as i64, 2)), date).unwrap());
                }
            }

            let plan = reconcile_usage(&old, &new).unwrap();

            let mut net: BTreeMap<String, Decimal> = BTreeMap::new();
            for adj in &plan {
                let entry = net.entry(adj.supply_id().to_string()).or_default();
                match adj {
                    StockAdjustment::Consume { quantity, .. } => *entry += quantity.value(),
                    StockAdjustment::Restock { quantity, .. } => *entry -= quantity.value(),
                }
            }

            for s in supplies {
                let old_total: Decimal = old
                    .iter()
                    .filter(|l| l.supply_id == s)
                    .map(|l| l.quantity.value())
                    .sum();
                let new_total: Decimal = new
                    .iter()
                    .filter(|l| l.supply_id == s)
                    .map(|l| l.quantity.value())
                    .sum();
                let planned = net.get(&s.to_string()).copied().unwrap_or_default();
                prop_assert_eq!(planned, new_total - old_total);
            }
        }
    }
}
