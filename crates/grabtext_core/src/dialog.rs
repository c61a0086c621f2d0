//! crates/grabtext_core/src/dialog.rs
//!
//! The conversation state machine. One call to `handle_message` is one
//! dialog turn: it locks the sender's session, dispatches on the current
//! stage, talks to the catalog/order ports as needed and writes the new
//! session state back before releasing the lock. Payment confirmation and
//! the resume-address entry point live here too, since they share the
//! session store and the outbound channel.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{order_amount, Order, OrderDraft, ResumeOrder, Session, Stage};
use crate::input::{format_price, parse_index, select_addons};
use crate::ports::{
    MenuCatalogService, OrderSubmissionService, OutboundMessenger, PortError, PortResult,
};
use crate::store::SessionStore;

const GREETING: &str = "Hi! 👋 Welcome to Grab Text.\n\nPlease type your *restaurant code* to see the menu.";
const FALLBACK: &str = "👋 Hi! To start a new order, just type *hi*.";
const VIEW_CHOICE_REPROMPT: &str =
    "❌ Please reply *1* to view the menu here, or *2* to open the online catalog.";
const CATALOG_FAILED: &str =
    "❌ We couldn't find a menu for that code. Type *hi* to try again.";
const ADDRESS_PROMPT: &str = "📍 Please enter your *delivery address*.";
const PROCESSING: &str = "⏳ Processing your order...";
const SUBMISSION_FAILED: &str =
    "⚠️ Something went wrong. Could not create your order. Type *hi* to try again.";

/// The dialog engine, shared across all senders. Per-sender ordering is
/// provided by the session store's per-key lock; the engine itself holds
/// no mutable state.
pub struct DialogEngine {
    store: Arc<SessionStore>,
    catalog: Arc<dyn MenuCatalogService>,
    orders: Arc<dyn OrderSubmissionService>,
    outbound: Arc<dyn OutboundMessenger>,
}

impl DialogEngine {
    pub fn new(
        store: Arc<SessionStore>,
        catalog: Arc<dyn MenuCatalogService>,
        orders: Arc<dyn OrderSubmissionService>,
        outbound: Arc<dyn OutboundMessenger>,
    ) -> Self {
        Self {
            store,
            catalog,
            orders,
            outbound,
        }
    }

    /// Runs one dialog turn for an inbound message. The per-sender lock is
    /// held for the whole turn, including the catalog fetch and order
    /// submission, so two near-simultaneous messages from the same sender
    /// apply strictly one after the other.
    pub async fn handle_message(&self, sender_id: &str, body: &str) {
        let slot = self.store.entry(sender_id).await;
        let mut session = slot.lock().await;
        session.last_activity = Instant::now();

        // Escape hatch from any stuck state: evaluated before stage dispatch.
        if body.trim().eq_ignore_ascii_case("hi") {
            session.stage = Stage::AwaitingRestaurantCode;
            session.draft = OrderDraft::default();
            self.send(sender_id, GREETING).await;
            return;
        }

        match session.stage {
            Stage::AwaitingRestaurantCode => {
                self.on_restaurant_code(sender_id, &mut session, body.trim()).await
            }
            Stage::MenuViewChoice => {
                self.on_view_choice(sender_id, &mut session, body.trim()).await
            }
            Stage::AwaitingItem => {
                self.on_item_choice(sender_id, &mut session, body.trim()).await
            }
            Stage::AwaitingAddon => {
                self.on_addon_choice(sender_id, &mut session, body.trim()).await
            }
            // The address is the raw body, verbatim.
            Stage::AwaitingAddress => self.on_address(sender_id, &mut session, body).await,
            // "wait_for_catalog_submission" resumes via resume_address, not
            // via an inbound message; anything typed here falls through.
            Stage::Start | Stage::WaitForCatalogSubmission => {
                session.reset();
                self.send(sender_id, FALLBACK).await;
            }
        }
    }

    async fn on_restaurant_code(&self, sender_id: &str, session: &mut Session, code: &str) {
        if code.is_empty() {
            session.reset();
            self.send(sender_id, FALLBACK).await;
            return;
        }

        match self.catalog.fetch_menu(code).await {
            Ok(catalog) if !catalog.menu.is_empty() => {
                info!(sender_id, code, restaurant = %catalog.restaurant, "catalog fetched");
                let prompt = format!(
                    "🍽 *{}*\n\nReply *1* to view the menu here, or *2* to open our online catalog.",
                    catalog.restaurant
                );
                session.draft.restaurant_code = Some(code.to_string());
                session.draft.catalog = Some(catalog);
                session.stage = Stage::MenuViewChoice;
                self.send(sender_id, &prompt).await;
            }
            Ok(_) => {
                warn!(sender_id, code, "catalog has no menu entries");
                session.reset();
                self.send(sender_id, CATALOG_FAILED).await;
            }
            Err(err) => {
                warn!(sender_id, code, error = %err, "catalog fetch failed");
                session.reset();
                self.send(sender_id, CATALOG_FAILED).await;
            }
        }
    }

    async fn on_view_choice(&self, sender_id: &str, session: &mut Session, choice: &str) {
        let (Some(catalog), Some(code)) = (
            session.draft.catalog.clone(),
            session.draft.restaurant_code.clone(),
        ) else {
            // Stage invariant violated; treat as an unrecognized state.
            session.reset();
            self.send(sender_id, FALLBACK).await;
            return;
        };

        match choice {
            "1" => {
                let mut lines = vec![format!("🍔 *{} menu*", catalog.restaurant)];
                for (i, item) in catalog.menu.iter().enumerate() {
                    lines.push(format!("{}. {} ({})", i + 1, item.name, format_price(item.price)));
                }
                lines.push(String::new());
                lines.push("Reply with the *number* of the item you'd like to order.".to_string());
                session.stage = Stage::AwaitingItem;
                self.send(sender_id, &lines.join("\n")).await;
            }
            "2" => {
                let url = self.catalog.catalog_url(sender_id, &code);
                session.stage = Stage::WaitForCatalogSubmission;
                self.send(
                    sender_id,
                    &format!("🛒 Browse the menu and check out here:\n{url}"),
                )
                .await;
            }
            _ => self.send(sender_id, VIEW_CHOICE_REPROMPT).await,
        }
    }

    async fn on_item_choice(&self, sender_id: &str, session: &mut Session, choice: &str) {
        let Some(catalog) = session.draft.catalog.clone() else {
            session.reset();
            self.send(sender_id, FALLBACK).await;
            return;
        };

        let selected = parse_index(choice)
            .filter(|n| (1..=catalog.menu.len()).contains(n))
            .map(|n| catalog.menu[n - 1].clone());
        let Some(item) = selected else {
            self.send(
                sender_id,
                &format!(
                    "❌ Please reply with a number between 1 and {}.",
                    catalog.menu.len()
                ),
            )
            .await;
            return;
        };

        session.draft.selected_item = Some(item.name.clone());
        session.draft.unit_price = Some(item.price);
        session.draft.quantity = Some(1);
        session.draft.available_addons = item.addons.clone();

        if item.addons.is_empty() {
            enter_address_stage(session);
            self.send(sender_id, ADDRESS_PROMPT).await;
        } else {
            let mut lines = vec![format!("➕ *Add-ons for {}*", item.name)];
            for (i, addon) in item.addons.iter().enumerate() {
                lines.push(format!("{}. {} ({})", i + 1, addon.name, format_price(addon.price)));
            }
            lines.push(String::new());
            lines.push(
                "Reply with numbers separated by commas, or *0* for none.".to_string(),
            );
            session.stage = Stage::AwaitingAddon;
            self.send(sender_id, &lines.join("\n")).await;
        }
    }

    async fn on_addon_choice(&self, sender_id: &str, session: &mut Session, input: &str) {
        // Never rejects: malformed tokens are dropped, an empty selection
        // is a valid selection.
        let selected = select_addons(input, &session.draft.available_addons);
        let ack = if selected.is_empty() {
            ADDRESS_PROMPT.to_string()
        } else {
            let names: Vec<&str> = selected.iter().map(|a| a.name.as_str()).collect();
            format!("➕ Added: {}\n\n{ADDRESS_PROMPT}", names.join(", "))
        };
        session.draft.selected_addons = selected;
        enter_address_stage(session);
        self.send(sender_id, &ack).await;
    }

    async fn on_address(&self, sender_id: &str, session: &mut Session, address: &str) {
        let (Some(item), Some(unit_price), Some(quantity), Some(idempotency_key)) = (
            session.draft.selected_item.clone(),
            session.draft.unit_price,
            session.draft.quantity,
            session.draft.idempotency_key.clone(),
        ) else {
            session.reset();
            self.send(sender_id, FALLBACK).await;
            return;
        };

        let addons = session.draft.selected_addons.clone();
        let Some(amount) = order_amount(unit_price, quantity, &addons) else {
            error!(sender_id, unit_price, quantity, "order amount overflows");
            session.reset();
            self.send(sender_id, SUBMISSION_FAILED).await;
            return;
        };
        let order = Order {
            sender_id: sender_id.to_string(),
            item: item.clone(),
            quantity,
            address: address.to_string(),
            amount,
            addons,
            restaurant_code: session.draft.restaurant_code.clone(),
            idempotency_key,
        };

        // Acknowledge before awaiting the backend so the sender is not
        // left silent during network latency.
        self.send(sender_id, PROCESSING).await;

        match self.orders.submit(&order).await {
            Ok(submitted) => {
                info!(sender_id, amount = order.amount, "order submitted");
                let mut text = format!(
                    "✅ Order received!\n🛒 {} x {}",
                    order.quantity, order.item
                );
                for addon in &order.addons {
                    text.push_str(&format!("\n➕ {}", addon.name));
                }
                text.push_str(&format!(
                    "\n📍 {}\n💰 Total: {}\n\n💳 Please pay here:\n{}",
                    order.address,
                    format_price(order.amount),
                    submitted.order_url
                ));
                self.send(sender_id, &text).await;
            }
            Err(err) => {
                // The raw cause stays in the logs; the sender only sees a
                // generic message. No automatic retry.
                error!(sender_id, error = %err, "order submission failed");
                self.send(sender_id, SUBMISSION_FAILED).await;
            }
        }
        session.reset();
    }

    /// Relays an out-of-band payment confirmation to the sender. Does not
    /// touch session state; the sender may be mid-dialog or idle.
    pub async fn confirm_payment(&self, sender_id: &str, order_reference: &str) -> PortResult<()> {
        info!(sender_id, order_reference, "payment confirmed");
        self.outbound
            .send(
                sender_id,
                &format!("✅ Payment confirmed for order *{order_reference}*. Thank you! 🛵"),
            )
            .await
    }

    /// Hands control back to the conversational flow after an external
    /// catalog checkout: unconditionally overwrites (or creates) the
    /// sender's session at `AwaitingAddress` with a draft built from the
    /// supplied order fields, then prompts for the address.
    pub async fn resume_address(&self, resume: ResumeOrder) -> PortResult<()> {
        // Validated before any session mutation; the supplied fields come
        // straight off the wire.
        let Some(amount) = order_amount(resume.unit_price, resume.quantity, &resume.addons)
        else {
            return Err(PortError::Rejected("order amount overflows".to_string()));
        };

        let slot = self.store.entry(&resume.sender_id).await;
        let mut session = slot.lock().await;
        session.last_activity = Instant::now();
        session.draft = OrderDraft {
            restaurant_code: None,
            catalog: None,
            selected_item: Some(resume.item.clone()),
            unit_price: Some(resume.unit_price),
            quantity: Some(resume.quantity),
            available_addons: Vec::new(),
            selected_addons: resume.addons.clone(),
            idempotency_key: None,
        };
        enter_address_stage(&mut session);
        info!(
            sender_id = %resume.sender_id,
            order_reference = %resume.order_reference,
            "address collection resumed from external checkout"
        );

        let mut text = format!(
            "🧾 Order *{}*\n🛒 {} x {}",
            resume.order_reference, resume.quantity, resume.item
        );
        for addon in &resume.addons {
            text.push_str(&format!("\n➕ {}", addon.name));
        }
        text.push_str(&format!(
            "\n💰 Total: {}\n\n{ADDRESS_PROMPT}",
            format_price(amount)
        ));
        self.outbound.send(&resume.sender_id, &text).await
    }

    /// Fire-and-forget with an observable failure: delivery problems are
    /// logged, never allowed to stall the dialog.
    async fn send(&self, sender_id: &str, text: &str) {
        if let Err(err) = self.outbound.send(sender_id, text).await {
            warn!(sender_id, error = %err, "failed to deliver outbound message");
        }
    }
}

/// Entering `AwaitingAddress` always mints a fresh idempotency key, so the
/// eventual submission can be deduplicated by the backend.
fn enter_address_stage(session: &mut Session) {
    session.draft.idempotency_key = Some(Uuid::new_v4().to_string());
    session.stage = Stage::AwaitingAddress;
}
