//! Invoices and the arithmetic behind their totals.
//!
//! An invoice is a write-once record: a header with derived totals plus an
//! ordered list of [`InvoiceLine`]s. Each line keeps the unit price observed
//! when the invoice was created, while the embedded customer and item details
//! are joined at read time and always reflect the current rows.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Customer, EngineError, MoneyCents, ResultEngine, TaxRate};

/// A fully assembled invoice.
#[derive(Clone, Debug, PartialEq)]
pub struct Invoice {
    pub id: i32,
    pub number: String,
    pub customer_id: i32,
    pub date: DateTime<Utc>,
    pub sub_total: MoneyCents,
    pub tax_rate: TaxRate,
    pub tax_amount: MoneyCents,
    pub total_amount: MoneyCents,
    pub customer: Option<Customer>,
    pub lines: Vec<InvoiceLine>,
}

/// One line of an invoice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceLine {
    pub id: i32,
    pub invoice_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    /// Price snapshot taken at invoice creation.
    pub unit_price: MoneyCents,
    pub total_price: MoneyCents,
    pub item: Option<ItemSummary>,
}

/// The item on a line as it is now. `base_price` is the current price, which
/// may differ from the line's `unit_price`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSummary {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub base_price: MoneyCents,
    pub description: Option<String>,
}

/// Request to create an invoice.
#[derive(Clone, Debug)]
pub struct NewInvoice {
    pub customer_id: i32,
    pub tax_rate: TaxRate,
    pub lines: Vec<NewInvoiceLine>,
}

#[derive(Clone, Copy, Debug)]
pub struct NewInvoiceLine {
    pub item_id: i32,
    pub quantity: i32,
}

/// A requested line once its unit price has been looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricedLine {
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: MoneyCents,
}

impl PricedLine {
    pub fn total(&self) -> ResultEngine<MoneyCents> {
        self.unit_price
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| {
                EngineError::Validation(format!("line total too large for item {}", self.item_id))
            })
    }
}

/// Derived amounts of an invoice header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub sub_total: MoneyCents,
    pub tax_amount: MoneyCents,
    pub total_amount: MoneyCents,
}

impl InvoiceTotals {
    /// Sums the line totals, then applies the tax rate once on the subtotal.
    ///
    /// ```rust
    /// use engine::{InvoiceTotals, MoneyCents, PricedLine, TaxRate};
    ///
    /// let lines = [
    ///     PricedLine { item_id: 1, quantity: 2, unit_price: MoneyCents::new(10_00) },
    ///     PricedLine { item_id: 2, quantity: 3, unit_price: MoneyCents::new(5_00) },
    /// ];
    /// let totals = InvoiceTotals::compute(&lines, "10".parse::<TaxRate>().unwrap()).unwrap();
    /// assert_eq!(totals.sub_total, MoneyCents::new(35_00));
    /// assert_eq!(totals.tax_amount, MoneyCents::new(3_50));
    /// assert_eq!(totals.total_amount, MoneyCents::new(38_50));
    /// ```
    pub fn compute(lines: &[PricedLine], tax_rate: TaxRate) -> ResultEngine<Self> {
        let overflow = || EngineError::Validation("invoice total too large".to_string());

        let mut sub_total = MoneyCents::ZERO;
        for line in lines {
            sub_total = sub_total.checked_add(line.total()?).ok_or_else(overflow)?;
        }
        let tax_amount = tax_rate.apply(sub_total)?;
        let total_amount = sub_total.checked_add(tax_amount).ok_or_else(overflow)?;

        Ok(Self {
            sub_total,
            tax_amount,
            total_amount,
        })
    }
}

impl Invoice {
    pub(crate) fn from_models(
        model: Model,
        customer: Option<super::customers::Model>,
        lines: Vec<InvoiceLine>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            number: model.invoice_number,
            customer_id: model.customer_id,
            date: model.invoice_date,
            sub_total: MoneyCents::new(model.sub_total_minor),
            tax_rate: TaxRate::from_ppm(model.tax_rate_ppm)?,
            tax_amount: MoneyCents::new(model.tax_amount_minor),
            total_amount: MoneyCents::new(model.total_amount_minor),
            customer: customer.map(Customer::from),
            lines,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub customer_id: i32,
    pub invoice_date: DateTimeUtc,
    pub sub_total_minor: i64,
    pub tax_rate_ppm: i32,
    pub tax_amount_minor: i64,
    pub total_amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Customer,
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    InvoiceItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
