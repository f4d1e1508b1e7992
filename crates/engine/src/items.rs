//! Sellable items.
//!
//! An item belongs to exactly one [`Category`](crate::Category). Its
//! `base_price` is the *current* price: invoices copy it into their lines at
//! creation time and never follow later changes.

use sea_orm::entity::prelude::*;

use crate::MoneyCents;

/// A sellable item, with its category attached when it could be joined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub base_price: MoneyCents,
    pub description: Option<String>,
    pub category: Option<CategoryRef>,
}

/// Denormalized category data embedded in an [`Item`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Mutable fields of an item, used for both create and update.
#[derive(Clone, Debug, Default)]
pub struct ItemInput {
    pub name: String,
    pub category_id: i32,
    pub base_price: MoneyCents,
    pub description: Option<String>,
}

impl Item {
    pub(crate) fn from_models(model: Model, category: Option<super::categories::Model>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category_id: model.category_id,
            base_price: MoneyCents::new(model.base_price_minor),
            description: model.description,
            category: category.map(|c| CategoryRef {
                id: c.id,
                name: c.name,
                description: c.description,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub base_price_minor: i64,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    InvoiceItems,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
