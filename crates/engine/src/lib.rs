//! Point-of-sale engine.
//!
//! The [`Engine`] owns the database handle and exposes the catalog
//! (categories, items), customer and invoice operations. Every operation is a
//! short, self-contained unit of work against the injected
//! [`sea_orm::DatabaseConnection`].

pub use categories::{Category, CategoryInput};
pub use customers::{Customer, CustomerInput};
pub use error::{EngineError, EntityKind};
pub use invoices::{
    Invoice, InvoiceLine, InvoiceTotals, ItemSummary, NewInvoice, NewInvoiceLine, PricedLine,
};
pub use items::{CategoryRef, Item, ItemInput};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use sea_orm::DbErr;
pub use tax_rate::TaxRate;

mod categories;
mod customers;
mod error;
mod invoice_items;
mod invoices;
mod items;
mod money;
mod ops;
mod tax_rate;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
