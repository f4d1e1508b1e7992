use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Category, CategoryInput, EntityKind, ResultEngine, categories, items,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, Missing, ensure_no_dependents, require_category, with_tx};

impl Engine {
    /// List all categories, ordered by name.
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        self.bounded(async {
            let models = categories::Entity::find()
                .order_by_asc(categories::Column::Name)
                .order_by_asc(categories::Column::Id)
                .all(&self.database)
                .await?;
            Ok(models.into_iter().map(Category::from).collect())
        })
        .await
    }

    pub async fn category(&self, category_id: i32) -> ResultEngine<Category> {
        self.bounded(async {
            let model = require_category(&self.database, category_id, Missing::NotFound).await?;
            Ok(Category::from(model))
        })
        .await
    }

    /// Add a new category.
    pub async fn create_category(&self, input: CategoryInput) -> ResultEngine<Category> {
        let name = normalize_required_name(&input.name, "category")?;
        let description = normalize_optional_text(input.description.as_deref());

        self.bounded(async {
            let active = categories::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
            };
            let model = active.insert(&self.database).await?;
            tracing::debug!(category_id = model.id, "category created");
            Ok(Category::from(model))
        })
        .await
    }

    /// Replace name and description of an existing category.
    pub async fn update_category(
        &self,
        category_id: i32,
        input: CategoryInput,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(&input.name, "category")?;
        let description = normalize_optional_text(input.description.as_deref());

        with_tx!(self, |db_tx| {
            require_category(&db_tx, category_id, Missing::NotFound).await?;

            let active = categories::ActiveModel {
                id: ActiveValue::Unchanged(category_id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
            };
            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Delete a category.
    ///
    /// Refused with [`EngineError::HasDependents`](crate::EngineError::HasDependents)
    /// while any item still belongs to it.
    pub async fn delete_category(&self, category_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_category(&db_tx, category_id, Missing::NotFound).await?;

            let count = items::Entity::find()
                .filter(items::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            ensure_no_dependents(EntityKind::Category, category_id, EntityKind::Item, count)?;

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            tracing::debug!(category_id, "category deleted");
            Ok(())
        })
    }
}
