//! Wheel service.

use std::sync::Arc;

use jiff::Timestamp;
use rand::Rng;
use tracing::info;

use tonda::{catalog::{Catalog, Offer}, cooldown, wheel};

use crate::domain::orders::service::WheelState;

/// Why a spin attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinBlock {
    /// An unconfirmed wheel offer already sits in the cart.
    OfferInCart,
    /// The 24-hour window has not elapsed.
    Cooldown {
        /// Milliseconds until the wheel reopens.
        remaining_ms: i64,
        /// `HH:MM:SS` countdown for the cooldown dialog.
        clock: String,
    },
    /// The catalog defines no wheel offers.
    NoOffers,
}

/// Result of a spin attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    /// The wheel span; the winning offer and the terminal rotation in
    /// degrees.
    Won {
        /// The offer under the pointer when the wheel stopped.
        offer: Offer,
        /// Total clockwise rotation drawn for the animation.
        rotation: f64,
    },
    /// Refused without mutating anything.
    Blocked(SpinBlock),
}

/// Gate-then-draw wheel over the offer catalog.
pub struct WheelService {
    catalog: Arc<Catalog>,
}

impl WheelService {
    /// Create a wheel over `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Attempt a spin. A refusal carries the cooldown-dialog payload and
    /// mutates nothing. A win only picks the offer: the caller adds it to
    /// the cart, and the cooldown clock moves only once an order
    /// containing it is confirmed.
    pub fn attempt_spin<R: Rng>(
        &self,
        state: WheelState,
        now: Timestamp,
        rng: &mut R,
    ) -> SpinOutcome {
        if !cooldown::can_spin(
            state.has_offer_in_cart,
            state.redeemed_any,
            state.last_spin,
            now,
        ) {
            if state.has_offer_in_cart {
                return SpinOutcome::Blocked(SpinBlock::OfferInCart);
            }

            let remaining_ms = cooldown::remaining_ms(state.last_spin, now);

            return SpinOutcome::Blocked(SpinBlock::Cooldown {
                remaining_ms,
                clock: cooldown::clock_format(remaining_ms),
            });
        }

        // 5 to 8 full turns plus a uniform resting angle.
        let turns: f64 = rng.gen_range(5.0..8.0);
        let angle: f64 = rng.gen_range(0.0..360.0);
        let rotation = turns * 360.0 + angle;

        let Some(index) = wheel::winning_index(rotation, self.catalog.offers().len()) else {
            return SpinOutcome::Blocked(SpinBlock::NoOffers);
        };

        let Some(offer) = self.catalog.offers().get(index) else {
            return SpinOutcome::Blocked(SpinBlock::NoOffers);
        };

        info!(offer = %offer.id, rotation, "wheel spin won an offer");

        SpinOutcome::Won {
            offer: offer.clone(),
            rotation,
        }
    }
}
