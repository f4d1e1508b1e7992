//! Invoices API endpoints.

use api_types::{
    Data,
    invoice::{InvoiceLineView, InvoiceNew, InvoiceView},
    item::ItemView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{NewInvoice, NewInvoiceLine, TaxRate};

use crate::{ServerError, customers::map_customer, server::ServerState};

fn map_line(line: engine::InvoiceLine) -> InvoiceLineView {
    InvoiceLineView {
        id: line.id,
        invoice_id: line.invoice_id,
        item_id: line.item_id,
        quantity: line.quantity,
        unit_price_minor: line.unit_price.cents(),
        total_price_minor: line.total_price.cents(),
        item: line.item.map(|item| ItemView {
            id: item.id,
            name: item.name,
            category_id: item.category_id,
            base_price_minor: item.base_price.cents(),
            description: item.description,
            category: None,
        }),
    }
}

fn map_invoice(invoice: engine::Invoice) -> InvoiceView {
    InvoiceView {
        id: invoice.id,
        number: invoice.number,
        customer_id: invoice.customer_id,
        date: invoice.date,
        sub_total_minor: invoice.sub_total.cents(),
        tax_rate: invoice.tax_rate.as_percent(),
        tax_amount_minor: invoice.tax_amount.cents(),
        total_amount_minor: invoice.total_amount.cents(),
        customer: invoice.customer.map(map_customer),
        items: invoice.lines.into_iter().map(map_line).collect(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Data<Vec<InvoiceView>>>, ServerError> {
    let invoices = state
        .engine
        .list_invoices()
        .await?
        .into_iter()
        .map(map_invoice)
        .collect();

    Ok(Json(Data::new(invoices)))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Data<InvoiceView>>, ServerError> {
    let invoice = state.engine.invoice(id).await?;
    Ok(Json(Data::new(map_invoice(invoice))))
}

/// Create an invoice priced from the current item catalog.
pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<InvoiceNew>, ServerError>,
) -> Result<(StatusCode, Json<Data<InvoiceView>>), ServerError> {
    let request = NewInvoice {
        customer_id: payload.customer_id,
        tax_rate: TaxRate::try_from(payload.tax_rate)?,
        lines: payload
            .items
            .into_iter()
            .map(|line| NewInvoiceLine {
                item_id: line.item_id,
                quantity: line.quantity,
            })
            .collect(),
    };

    let invoice = state.engine.create_invoice(request).await?;
    Ok((StatusCode::CREATED, Json(Data::new(map_invoice(invoice)))))
}
