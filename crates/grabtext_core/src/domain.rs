//! crates/grabtext_core/src/domain.rs
//!
//! Defines the pure, core data structures for the ordering dialog.
//! These structs are independent of any transport or serialization format.
//! All prices are integers in minor currency units (pesewas).

use std::time::Instant;

/// The dialog stage a sender's session is currently in.
///
/// `Start` is both the initial state and the re-entry point after a
/// completed or failed order; the machine loops, it does not halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    AwaitingRestaurantCode,
    MenuViewChoice,
    AwaitingItem,
    AwaitingAddon,
    AwaitingAddress,
    /// The sender chose the external catalog; the dialog is suspended until
    /// the out-of-band resume-address operation hands control back.
    WaitForCatalogSubmission,
}

/// An optional extra for a catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addon {
    pub name: String,
    pub price: u64,
}

/// A single orderable item as returned by the catalog provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: String,
    pub price: u64,
    pub addons: Vec<Addon>,
}

/// A restaurant's menu, frozen at fetch time so later selections stay
/// stable even if the backend catalog changes mid-conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub restaurant: String,
    pub menu: Vec<CatalogItem>,
}

/// The scratch record assembled step by step over a dialog.
///
/// Fields relevant to a stage are fully populated before the stage
/// transitions forward; `AwaitingAddress` implies `unit_price`, `quantity`
/// and `idempotency_key` are set.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub restaurant_code: Option<String>,
    pub catalog: Option<Catalog>,
    pub selected_item: Option<String>,
    pub unit_price: Option<u64>,
    pub quantity: Option<u32>,
    pub available_addons: Vec<Addon>,
    pub selected_addons: Vec<Addon>,
    pub idempotency_key: Option<String>,
}

/// One sender's conversation state.
#[derive(Debug, Clone)]
pub struct Session {
    pub stage: Stage,
    pub draft: OrderDraft,
    /// Refreshed on every turn; drives idle eviction.
    pub last_activity: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            stage: Stage::Start,
            draft: OrderDraft::default(),
            last_activity: Instant::now(),
        }
    }

    /// Resets to `Start` and empties the draft. Every reset clears the
    /// draft, including the unmatched-input default branch.
    pub fn reset(&mut self) {
        self.stage = Stage::Start;
        self.draft = OrderDraft::default();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A finalized order, produced once per completed dialog and submitted
/// exactly once. Not stored after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub sender_id: String,
    pub item: String,
    pub quantity: u32,
    pub address: String,
    /// `unit_price * quantity + sum(addon prices)`, minor units.
    pub amount: u64,
    pub addons: Vec<Addon>,
    pub restaurant_code: Option<String>,
    /// Minted on entry into `AwaitingAddress` so the backend can
    /// deduplicate a resend after a timeout.
    pub idempotency_key: String,
}

/// The order fields handed back by an external catalog checkout when it
/// returns control to the conversational flow for address collection.
#[derive(Debug, Clone)]
pub struct ResumeOrder {
    pub sender_id: String,
    pub order_reference: String,
    pub item: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub addons: Vec<Addon>,
}

/// Computes the payable amount in minor units. Prices and quantities
/// arrive unbounded from the wire, so an overflowing total is `None` and
/// the caller treats it as a validation failure.
pub fn order_amount(unit_price: u64, quantity: u32, addons: &[Addon]) -> Option<u64> {
    let mut total = unit_price.checked_mul(u64::from(quantity))?;
    for addon in addons {
        total = total.checked_add(addon.price)?;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_is_unit_times_quantity_plus_addons() {
        let addons = vec![Addon {
            name: "extra cheese".into(),
            price: 200,
        }];
        assert_eq!(order_amount(1500, 2, &addons), Some(3200));
    }

    #[test]
    fn amount_without_addons() {
        assert_eq!(order_amount(4000, 1, &[]), Some(4000));
    }

    #[test]
    fn overflowing_multiplication_is_rejected() {
        assert_eq!(order_amount(u64::MAX / 2, 3, &[]), None);
    }

    #[test]
    fn overflowing_addon_sum_is_rejected() {
        let addons = vec![Addon {
            name: "extra".into(),
            price: u64::MAX,
        }];
        assert_eq!(order_amount(1, 1, &addons), None);
    }

    #[test]
    fn reset_clears_draft_and_stage() {
        let mut session = Session::new();
        session.stage = Stage::AwaitingAddress;
        session.draft.unit_price = Some(4000);
        session.draft.quantity = Some(2);
        session.reset();
        assert_eq!(session.stage, Stage::Start);
        assert!(session.draft.unit_price.is_none());
        assert!(session.draft.quantity.is_none());
    }
}
