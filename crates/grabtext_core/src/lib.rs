pub mod dialog;
pub mod domain;
pub mod input;
pub mod ports;
pub mod store;

pub use dialog::DialogEngine;
pub use domain::{order_amount, Addon, Catalog, CatalogItem, Order, OrderDraft, ResumeOrder, Session, Stage};
pub use ports::{
    MenuCatalogService, OrderSubmissionService, OutboundMessenger, PortError, PortResult,
    SubmittedOrder,
};
pub use store::SessionStore;
