//! Invoice line rows.

use sea_orm::entity::prelude::*;

use crate::{InvoiceLine, ItemSummary, MoneyCents};

impl InvoiceLine {
    pub(crate) fn from_models(model: Model, item: Option<super::items::Model>) -> Self {
        Self {
            id: model.id,
            invoice_id: model.invoice_id,
            item_id: model.item_id,
            quantity: model.quantity,
            unit_price: MoneyCents::new(model.unit_price_minor),
            total_price: MoneyCents::new(model.total_price_minor),
            item: item.map(|item| ItemSummary {
                id: item.id,
                name: item.name,
                category_id: item.category_id,
                base_price: MoneyCents::new(item.base_price_minor),
                description: item.description,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub invoice_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price_minor: i64,
    pub total_price_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Invoice,
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Item,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
