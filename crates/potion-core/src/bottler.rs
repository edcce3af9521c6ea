//! # Bottle Planner
//!
//! Decides how many potions to bottle from the ml in storage.
//!
//! Only pure red, green and blue potions are produced, in that priority
//! order. Each potion consumes [`ML_PER_POTION`] ml of its color, so the
//! count per color is `ml / 100` bounded by remaining potion capacity.
//! Red can use up all the capacity and starve blue even when blue ml is
//! plentiful. Dark ml is tracked but never bottled.

use tracing::debug;

use crate::types::{BottlingState, Color, PotionMix};
use crate::{MAX_MIX_QUANTITY, ML_PER_POTION};

/// Colors bottled by the planner, highest priority first.
pub const BOTTLING_PRIORITY: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

/// Produces a bottling plan for the given snapshot.
///
/// Returns one pure mix per color with a non-zero quantity, in
/// red/green/blue order. Empty when potion storage is already full.
///
/// ## Example
/// ```rust
/// use potion_core::bottler::plan_bottles;
/// use potion_core::types::{BottlingState, Color, PotionMix};
///
/// let state = BottlingState::new(1000).with_ml(Color::Red, 250);
/// assert_eq!(plan_bottles(&state), vec![PotionMix::pure(Color::Red, 2)]);
/// ```
pub fn plan_bottles(state: &BottlingState) -> Vec<PotionMix> {
    let mut capacity_remaining = state.maximum_potion_capacity - state.potions_in_stock();
    if capacity_remaining <= 0 {
        debug!(
            capacity = state.maximum_potion_capacity,
            in_stock = state.potions_in_stock(),
            "Potion storage full, nothing to bottle"
        );
        return Vec::new();
    }

    let mut plan = Vec::new();
    for color in BOTTLING_PRIORITY {
        let quantity = (state.ml(color) / ML_PER_POTION)
            .min(capacity_remaining)
            .min(MAX_MIX_QUANTITY);
        if quantity > 0 {
            debug!(color = %color, quantity, "Planned bottling");
            plan.push(PotionMix::pure(color, quantity));
            capacity_remaining -= quantity;
        }
    }

    plan
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bottles_floor_of_red_ml() {
        let state = BottlingState::new(1000).with_ml(Color::Red, 250);
        assert_eq!(plan_bottles(&state), vec![PotionMix::new([100, 0, 0, 0], 2)]);
    }

    #[test]
    fn bottles_green_only() {
        let state = BottlingState::new(1000).with_ml(Color::Green, 500);
        assert_eq!(plan_bottles(&state), vec![PotionMix::new([0, 100, 0, 0], 5)]);
    }

    #[test]
    fn bottles_each_color_in_priority_order() {
        let state = BottlingState::new(1000)
            .with_ml(Color::Red, 100)
            .with_ml(Color::Green, 200)
            .with_ml(Color::Blue, 300);
        assert_eq!(
            plan_bottles(&state),
            vec![
                PotionMix::pure(Color::Red, 1),
                PotionMix::pure(Color::Green, 2),
                PotionMix::pure(Color::Blue, 3),
            ]
        );
    }

    #[test]
    fn empty_when_capacity_already_met() {
        let state = BottlingState::new(1000)
            .with_ml(Color::Red, 500)
            .with_ml(Color::Green, 500)
            .with_ml(Color::Blue, 500)
            .with_ml(Color::Dark, 500)
            .with_inventory(vec![PotionMix::pure(Color::Red, 1000)]);
        assert!(plan_bottles(&state).is_empty());
    }

    #[test]
    fn empty_when_capacity_exceeded() {
        let state = BottlingState::new(10)
            .with_ml(Color::Red, 5000)
            .with_inventory(vec![PotionMix::pure(Color::Blue, 12)]);
        assert!(plan_bottles(&state).is_empty());
    }

    #[test]
    fn fills_only_the_remaining_capacity() {
        let state = BottlingState::new(1000)
            .with_ml(Color::Red, 1000)
            .with_inventory(vec![PotionMix::pure(Color::Red, 995)]);
        assert_eq!(plan_bottles(&state), vec![PotionMix::pure(Color::Red, 5)]);
    }

    #[test]
    fn red_can_starve_blue() {
        let state = BottlingState::new(3)
            .with_ml(Color::Red, 300)
            .with_ml(Color::Blue, 10_000);
        assert_eq!(plan_bottles(&state), vec![PotionMix::pure(Color::Red, 3)]);
    }

    #[test]
    fn small_pools_and_dark_are_omitted() {
        let state = BottlingState::new(50)
            .with_ml(Color::Red, 99)
            .with_ml(Color::Green, 150)
            .with_ml(Color::Dark, 10_000);
        assert_eq!(plan_bottles(&state), vec![PotionMix::pure(Color::Green, 1)]);
    }

    #[test]
    fn quantities_are_clamped_to_mix_limit() {
        let state = BottlingState::new(1_000_000).with_ml(Color::Red, 5_000_000);
        assert_eq!(
            plan_bottles(&state),
            vec![PotionMix::pure(Color::Red, MAX_MIX_QUANTITY)]
        );
    }

    fn arb_state() -> impl Strategy<Value = BottlingState> {
        (
            1i64..2000,
            prop::array::uniform4(0i64..100_000),
            prop::collection::vec((0usize..3, 1i64..500), 0..4),
        )
            .prop_map(|(capacity, ml, stock)| BottlingState {
                red_ml: ml[0],
                green_ml: ml[1],
                blue_ml: ml[2],
                dark_ml: ml[3],
                maximum_potion_capacity: capacity,
                current_potion_inventory: stock
                    .into_iter()
                    .map(|(c, q)| PotionMix::pure(BOTTLING_PRIORITY[c], q))
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn plan_fits_potion_capacity(state in arb_state()) {
            let planned: i64 = plan_bottles(&state).iter().map(|m| m.quantity).sum();
            prop_assert!(
                planned == 0
                    || planned + state.potions_in_stock() <= state.maximum_potion_capacity
            );
        }

        #[test]
        fn plan_never_uses_more_ml_than_stored(state in arb_state()) {
            for mix in plan_bottles(&state) {
                for color in Color::ALL {
                    prop_assert!(mix.ml_required(color) <= state.ml(color));
                }
            }
        }

        #[test]
        fn plan_mixes_are_valid(state in arb_state()) {
            for mix in plan_bottles(&state) {
                prop_assert!(crate::validation::validate_potion_mix(&mix).is_ok());
            }
        }

        #[test]
        fn planning_is_deterministic(state in arb_state()) {
            prop_assert_eq!(plan_bottles(&state), plan_bottles(&state));
        }
    }
}
