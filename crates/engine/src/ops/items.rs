use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, EntityKind, Item, ItemInput, ResultEngine, categories, invoice_items, items,
    util::{normalize_optional_text, normalize_required_name, validate_price},
};

use super::{
    Engine, Missing, ensure_no_dependents, require_category, require_item, with_tx,
};

/// Validated, normalized `ItemInput`.
struct ItemFields {
    name: String,
    category_id: i32,
    base_price_minor: i64,
    description: Option<String>,
}

impl TryFrom<ItemInput> for ItemFields {
    type Error = EngineError;

    fn try_from(input: ItemInput) -> Result<Self, Self::Error> {
        validate_price(input.base_price)?;
        Ok(Self {
            name: normalize_required_name(&input.name, "item")?,
            category_id: input.category_id,
            base_price_minor: input.base_price.cents(),
            description: normalize_optional_text(input.description.as_deref()),
        })
    }
}

impl Engine {
    /// List all items with their category, ordered by item name.
    pub async fn list_items(&self) -> ResultEngine<Vec<Item>> {
        self.bounded(async {
            let rows = items::Entity::find()
                .find_also_related(categories::Entity)
                .order_by_asc(items::Column::Name)
                .order_by_asc(items::Column::Id)
                .all(&self.database)
                .await?;
            Ok(rows
                .into_iter()
                .map(|(item, category)| Item::from_models(item, category))
                .collect())
        })
        .await
    }

    pub async fn item(&self, item_id: i32) -> ResultEngine<Item> {
        self.bounded(async {
            items::Entity::find_by_id(item_id)
                .find_also_related(categories::Entity)
                .one(&self.database)
                .await?
                .map(|(item, category)| Item::from_models(item, category))
                .ok_or(EngineError::NotFound {
                    entity: EntityKind::Item,
                    id: item_id,
                })
        })
        .await
    }

    /// Add a new item to an existing category.
    pub async fn create_item(&self, input: ItemInput) -> ResultEngine<Item> {
        let fields = ItemFields::try_from(input)?;

        with_tx!(self, |db_tx| {
            let category = require_category(&db_tx, fields.category_id, Missing::Reference).await?;

            let active = items::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(fields.name),
                category_id: ActiveValue::Set(fields.category_id),
                base_price_minor: ActiveValue::Set(fields.base_price_minor),
                description: ActiveValue::Set(fields.description),
            };
            let model = active.insert(&db_tx).await?;
            tracing::debug!(item_id = model.id, "item created");
            Ok(Item::from_models(model, Some(category)))
        })
    }

    /// Replace every mutable field of an existing item.
    ///
    /// Changing `base_price` only affects invoices created afterwards.
    pub async fn update_item(&self, item_id: i32, input: ItemInput) -> ResultEngine<Item> {
        let fields = ItemFields::try_from(input)?;

        with_tx!(self, |db_tx| {
            require_item(&db_tx, item_id, Missing::NotFound).await?;
            let category = require_category(&db_tx, fields.category_id, Missing::Reference).await?;

            let active = items::ActiveModel {
                id: ActiveValue::Unchanged(item_id),
                name: ActiveValue::Set(fields.name),
                category_id: ActiveValue::Set(fields.category_id),
                base_price_minor: ActiveValue::Set(fields.base_price_minor),
                description: ActiveValue::Set(fields.description),
            };
            let model = active.update(&db_tx).await?;
            Ok(Item::from_models(model, Some(category)))
        })
    }

    /// Delete an item that no invoice line references.
    pub async fn delete_item(&self, item_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_item(&db_tx, item_id, Missing::NotFound).await?;

            let count = invoice_items::Entity::find()
                .filter(invoice_items::Column::ItemId.eq(item_id))
                .count(&db_tx)
                .await?;
            ensure_no_dependents(EntityKind::Item, item_id, EntityKind::InvoiceItem, count)?;

            items::Entity::delete_by_id(item_id).exec(&db_tx).await?;
            tracing::debug!(item_id, "item deleted");
            Ok(())
        })
    }
}
