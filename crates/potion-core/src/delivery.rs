//! # Delivery Effects
//!
//! Plans are only intentions. When the supplier confirms a delivery, the
//! shop debits gold and credits ml (barrels), or debits ml and credits
//! potions (bottling). This module computes those effects; persisting them
//! is the caller's job.
//!
//! ```text
//! barrels delivered ──► BarrelDelivery { gold_paid, ml[r,g,b,d] }
//! potions delivered ──► BottlingUsage  { ml_used[r,g,b,d], potions }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::gold::Gold;
use crate::types::{Barrel, Color, PotionMix};

// =============================================================================
// Barrel Delivery
// =============================================================================

/// Effect of a confirmed barrel delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrelDelivery {
    /// `sum(price × quantity)`.
    pub gold_paid: Gold,
    /// ml gained per color, truncated once after summing.
    pub ml: [i64; 4],
}

impl BarrelDelivery {
    /// Summarizes delivered barrels.
    ///
    /// ## Example
    /// ```rust
    /// use potion_core::delivery::BarrelDelivery;
    /// use potion_core::types::Barrel;
    ///
    /// let delivered = vec![
    ///     Barrel::new("SMALL_RED_BARREL", 1000, [1.0, 0.0, 0.0, 0.0], 100, 10),
    ///     Barrel::new("SMALL_GREEN_BARREL", 1000, [0.0, 1.0, 0.0, 0.0], 150, 5),
    /// ];
    /// let summary = BarrelDelivery::from_barrels(&delivered);
    /// assert_eq!(summary.gold_paid.amount(), 1750);
    /// assert_eq!(summary.ml, [10_000, 5_000, 0, 0]);
    /// ```
    pub fn from_barrels(barrels: &[Barrel]) -> Self {
        let gold_paid = barrels.iter().map(|b| b.cost().times(b.quantity)).sum();

        let mut ml = [0i64; 4];
        for color in Color::ALL {
            let total: f64 = barrels
                .iter()
                .map(|b| b.ml_of(color) * b.quantity as f64)
                .sum();
            ml[color.index()] = total as i64;
        }

        BarrelDelivery { gold_paid, ml }
    }

    /// Total ml gained.
    pub fn total_ml(&self) -> i64 {
        self.ml.iter().sum()
    }

    /// Fails with [`CoreError::InsufficientGold`] when `gold` can't cover
    /// this delivery.
    pub fn ensure_affordable(&self, gold: Gold) -> CoreResult<()> {
        if !gold.can_afford(self.gold_paid) {
            return Err(CoreError::InsufficientGold {
                required: self.gold_paid.amount(),
                available: gold.amount(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Bottling Usage
// =============================================================================

/// Effect of a confirmed bottling delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottlingUsage {
    /// ml consumed per color: `sum(quantity × potion_type[c])`.
    pub ml_used: [i64; 4],
    /// Potions added to inventory.
    pub potions: i64,
}

impl BottlingUsage {
    /// Summarizes delivered potion mixes.
    pub fn from_mixes(mixes: &[PotionMix]) -> Self {
        let mut ml_used = [0i64; 4];
        for mix in mixes {
            for color in Color::ALL {
                ml_used[color.index()] += mix.ml_required(color);
            }
        }

        BottlingUsage {
            ml_used,
            potions: mixes.iter().map(|m| m.quantity).sum(),
        }
    }

    /// Fails with [`CoreError::InsufficientMl`] on the first color whose
    /// pool can't cover the usage.
    pub fn ensure_available(&self, pool: [i64; 4]) -> CoreResult<()> {
        for color in Color::ALL {
            let required = self.ml_used[color.index()];
            let available = pool[color.index()];
            if required > available {
                return Err(CoreError::InsufficientMl {
                    color,
                    required,
                    available,
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
