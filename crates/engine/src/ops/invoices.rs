use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, EntityKind, Invoice, InvoiceLine, InvoiceTotals, MoneyCents, NewInvoice,
    PricedLine, ResultEngine, customers, invoice_items, invoices, items, util::invoice_number,
};

use super::{Engine, Missing, require_customer, require_item, with_tx};

fn validate_new_invoice(request: &NewInvoice) -> ResultEngine<()> {
    if request.lines.is_empty() {
        return Err(EngineError::Validation(
            "an invoice needs at least one item".to_string(),
        ));
    }
    if let Some(line) = request.lines.iter().find(|line| line.quantity <= 0) {
        return Err(EngineError::Validation(format!(
            "quantity for item {} must be > 0",
            line.item_id
        )));
    }
    Ok(())
}

impl Engine {
    /// Create an invoice from the current item prices.
    ///
    /// Runs as a single DB transaction:
    /// 1. the customer and every item must exist;
    /// 2. each line captures the item's `base_price` as its unit price;
    /// 3. subtotal, tax and total are derived from those prices (the caller
    ///    never supplies amounts);
    /// 4. the header and all lines are inserted, then committed together.
    ///
    /// Any failure rolls everything back. The committed invoice is then read
    /// back with its customer and item details.
    pub async fn create_invoice(&self, request: NewInvoice) -> ResultEngine<Invoice> {
        validate_new_invoice(&request)?;

        let invoice_id = with_tx!(self, |db_tx| {
            require_customer(&db_tx, request.customer_id, Missing::Reference).await?;

            let mut prices: HashMap<i32, MoneyCents> = HashMap::new();
            let mut priced = Vec::with_capacity(request.lines.len());
            for line in &request.lines {
                let unit_price = if let Some(price) = prices.get(&line.item_id).copied() {
                    price
                } else {
                    let item = require_item(&db_tx, line.item_id, Missing::Reference).await?;
                    let price = MoneyCents::new(item.base_price_minor);
                    prices.insert(line.item_id, price);
                    price
                };
                priced.push(PricedLine {
                    item_id: line.item_id,
                    quantity: line.quantity,
                    unit_price,
                });
            }

            let totals = InvoiceTotals::compute(&priced, request.tax_rate)?;

            let now = Utc::now();
            let header = invoices::ActiveModel {
                id: ActiveValue::NotSet,
                invoice_number: ActiveValue::Set(invoice_number(now)),
                customer_id: ActiveValue::Set(request.customer_id),
                invoice_date: ActiveValue::Set(now),
                sub_total_minor: ActiveValue::Set(totals.sub_total.cents()),
                tax_rate_ppm: ActiveValue::Set(request.tax_rate.ppm()),
                tax_amount_minor: ActiveValue::Set(totals.tax_amount.cents()),
                total_amount_minor: ActiveValue::Set(totals.total_amount.cents()),
            }
            .insert(&db_tx)
            .await?;

            for line in &priced {
                invoice_items::ActiveModel {
                    id: ActiveValue::NotSet,
                    invoice_id: ActiveValue::Set(header.id),
                    item_id: ActiveValue::Set(line.item_id),
                    quantity: ActiveValue::Set(line.quantity),
                    unit_price_minor: ActiveValue::Set(line.unit_price.cents()),
                    total_price_minor: ActiveValue::Set(line.total()?.cents()),
                }
                .insert(&db_tx)
                .await?;
            }

            tracing::info!(
                invoice_id = header.id,
                number = %header.invoice_number,
                lines = priced.len(),
                total = %totals.total_amount,
                "invoice created"
            );
            Ok(header.id)
        })?;

        self.invoice(invoice_id).await
    }

    /// Read an invoice with its customer and lines.
    ///
    /// Customer and item details are the current rows; line prices are the
    /// snapshot taken at creation.
    pub async fn invoice(&self, invoice_id: i32) -> ResultEngine<Invoice> {
        self.bounded(async {
            let (header, customer) = invoices::Entity::find_by_id(invoice_id)
                .find_also_related(customers::Entity)
                .one(&self.database)
                .await?
                .ok_or(EngineError::NotFound {
                    entity: EntityKind::Invoice,
                    id: invoice_id,
                })?;

            let lines = invoice_items::Entity::find()
                .filter(invoice_items::Column::InvoiceId.eq(invoice_id))
                .find_also_related(items::Entity)
                .order_by_asc(invoice_items::Column::Id)
                .all(&self.database)
                .await?
                .into_iter()
                .map(|(line, item)| InvoiceLine::from_models(line, item))
                .collect();

            Invoice::from_models(header, customer, lines)
        })
        .await
    }

    /// List every invoice, oldest first, with customer and lines.
    pub async fn list_invoices(&self) -> ResultEngine<Vec<Invoice>> {
        self.bounded(async {
            let headers = invoices::Entity::find()
                .find_also_related(customers::Entity)
                .order_by_asc(invoices::Column::Id)
                .all(&self.database)
                .await?;
            if headers.is_empty() {
                return Ok(Vec::new());
            }

            let mut lines_by_invoice: HashMap<i32, Vec<InvoiceLine>> = HashMap::new();
            let rows = invoice_items::Entity::find()
                .find_also_related(items::Entity)
                .order_by_asc(invoice_items::Column::Id)
                .all(&self.database)
                .await?;
            for (line, item) in rows {
                lines_by_invoice
                    .entry(line.invoice_id)
                    .or_default()
                    .push(InvoiceLine::from_models(line, item));
            }

            headers
                .into_iter()
                .map(|(header, customer)| {
                    let lines = lines_by_invoice.remove(&header.id).unwrap_or_default();
                    Invoice::from_models(header, customer, lines)
                })
                .collect()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewInvoiceLine, TaxRate};

    fn request(lines: Vec<NewInvoiceLine>) -> NewInvoice {
        NewInvoice {
            customer_id: 1,
            tax_rate: TaxRate::ZERO,
            lines,
        }
    }

    #[test]
    fn rejects_empty_invoice() {
        assert!(matches!(
            validate_new_invoice(&request(vec![])),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let err = validate_new_invoice(&request(vec![
            NewInvoiceLine {
                item_id: 1,
                quantity: 2,
            },
            NewInvoiceLine {
                item_id: 4,
                quantity: 0,
            },
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("quantity for item 4 must be > 0".to_string())
        );
    }
}
