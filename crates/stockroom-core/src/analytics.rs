//! # Analytics Module
//!
//! Read-only summaries over one owner's product set.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products (owner's full set, insertion order)                           │
//! │       │                                                                 │
//! │       ├──► stock_summary      Σ units, Σ units × price (stock > 1)      │
//! │       ├──► top_profitable     margin > 0, best 3                        │
//! │       ├──► least_profitable   margin <= 0, worst 3                      │
//! │       ├──► profit_report      stock cost, revenue potential, losses     │
//! │       └──► low_stock          stock < threshold                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All functions are pure folds: the caller loads the products once and
//! hands the slice in. Products without a known cost never appear in the
//! profitability rankings or the profit report.
//!
//! Inactive products are included everywhere; the flag only archives.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// Products must hold more than this many units to count as available.
pub const AVAILABLE_STOCK_FLOOR: i64 = 1;

/// Length of the top and bottom profitability rankings.
pub const RANKING_SIZE: usize = 3;

// =============================================================================
// Stock Summary
// =============================================================================

/// Units on hand and their value at sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockSummary {
    pub available_stock: i64,
    #[serde(rename = "total_price_cents")]
    pub total_price: Money,
}

/// Sums units and value over products holding more than one unit.
///
/// ## Example
/// ```text
/// stock  [0, 1, 2, 5]
/// price  [1, 1, 2, 3]
///         ✗  ✗  ✓  ✓   → 7 units, 2×2 + 5×3 = 19.00
/// ```
pub fn stock_summary(products: &[Product]) -> StockSummary {
    products
        .iter()
        .filter(|p| p.available_stock > AVAILABLE_STOCK_FLOOR)
        .fold(
            StockSummary {
                available_stock: 0,
                total_price: Money::zero(),
            },
            |mut acc, p| {
                acc.available_stock += p.available_stock;
                acc.total_price += p.stock_value();
                acc
            },
        )
}

// =============================================================================
// Profitability Rankings
// =============================================================================

/// One entry of a profitability ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductMargin {
    pub name: String,
    /// Price minus cost; negative for products sold at a loss.
    #[serde(rename = "profit_cents")]
    pub profit: Money,
}

fn margins<'a>(
    products: &'a [Product],
    keep: impl Fn(Money) -> bool + 'a,
) -> impl Iterator<Item = ProductMargin> + 'a {
    products.iter().filter_map(move |p| {
        let margin = p.margin()?;
        keep(margin).then(|| ProductMargin {
            name: p.name.clone(),
            profit: margin,
        })
    })
}

/// The three products with the highest positive margin, best first.
///
/// Ties keep insertion order.
pub fn top_profitable(products: &[Product]) -> Vec<ProductMargin> {
    let mut ranked: Vec<ProductMargin> = margins(products, |margin| margin.is_positive()).collect();
    ranked.sort_by(|a, b| b.profit.cmp(&a.profit));
    ranked.truncate(RANKING_SIZE);
    ranked
}

/// The three products with the lowest non-positive margin, worst first.
///
/// Break-even products (price equal to cost) are included.
pub fn least_profitable(products: &[Product]) -> Vec<ProductMargin> {
    let mut ranked: Vec<ProductMargin> =
        margins(products, |margin| !margin.is_positive()).collect();
    ranked.sort_by(|a, b| a.profit.cmp(&b.profit));
    ranked.truncate(RANKING_SIZE);
    ranked
}

// =============================================================================
// Profit Report
// =============================================================================

/// A product whose cost exceeds its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductLoss {
    pub name: String,
    #[serde(rename = "loss_per_unit_cents")]
    pub loss_per_unit: Money,
}

/// Aggregate valuation of the stock on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitReport {
    /// Σ cost × stock.
    #[serde(rename = "stock_cost_cents")]
    pub stock_cost: Money,
    /// Σ price × stock: what the stock brings in if it all sells.
    #[serde(rename = "profit_cents")]
    pub profit: Money,
    /// `profit - stock_cost`.
    #[serde(rename = "net_cents")]
    pub net: Money,
    pub losing_products: Vec<ProductLoss>,
}

/// Builds the profit report over products with a known cost.
pub fn profit_report(products: &[Product]) -> ProfitReport {
    let mut stock_cost = Money::zero();
    let mut profit = Money::zero();
    let mut losing_products = Vec::new();

    for product in products {
        let Some(cost) = product.cost() else {
            continue;
        };

        stock_cost += cost * product.available_stock;
        profit += product.stock_value();

        if cost > product.price() {
            losing_products.push(ProductLoss {
                name: product.name.clone(),
                loss_per_unit: cost - product.price(),
            });
        }
    }

    ProfitReport {
        stock_cost,
        profit,
        net: profit - stock_cost,
        losing_products,
    }
}

// =============================================================================
// Low Stock
// =============================================================================

/// When a low-stock check reports items instead of "stock is fine".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LowStockPolicy {
    /// Report as soon as one product is below the threshold.
    #[default]
    AnyMatch,
    /// Report only when two or more products are below the threshold.
    PluralOnly,
}

impl LowStockPolicy {
    fn triggers(&self, matches: usize) -> bool {
        match self {
            LowStockPolicy::AnyMatch => matches >= 1,
            LowStockPolicy::PluralOnly => matches > 1,
        }
    }
}

/// Unknown `LOW_STOCK_POLICY` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown low stock policy '{0}' (expected any_match or plural_only)")]
pub struct ParsePolicyError(String);

impl FromStr for LowStockPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any_match" => Ok(LowStockPolicy::AnyMatch),
            "plural_only" => Ok(LowStockPolicy::PluralOnly),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// A product below the requested stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LowStockItem {
    pub name: String,
    pub available_stock: i64,
}

/// Outcome of a low-stock check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum LowStockReport {
    /// These products need restocking.
    Restock(Vec<LowStockItem>),
    /// Nothing to report under the active policy.
    StockIsFine,
}

/// Finds every product with fewer than `threshold` units.
///
/// ## Example
/// ```rust
/// use stockroom_core::analytics::{low_stock, LowStockPolicy, LowStockReport};
///
/// let report = low_stock(&[], 5, LowStockPolicy::AnyMatch);
/// assert_eq!(report, LowStockReport::StockIsFine);
/// ```
pub fn low_stock(products: &[Product], threshold: i64, policy: LowStockPolicy) -> LowStockReport {
    let items: Vec<LowStockItem> = products
        .iter()
        .filter(|p| p.available_stock < threshold)
        .map(|p| LowStockItem {
            name: p.name.clone(),
            available_stock: p.available_stock,
        })
        .collect();

    if policy.triggers(items.len()) {
        LowStockReport::Restock(items)
    } else {
        LowStockReport::StockIsFine
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
