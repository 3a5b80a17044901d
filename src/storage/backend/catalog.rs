//! Catalog queries: shoe listing, detail, brands and categories.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::SeaOrmStorage;
use crate::errors::{Result, StoreError};
use crate::storage::models::{
    BrandView, CatalogFilter, CategoryView, ShoeDetail, ShoeImageView, ShoeSummary, SizeStock,
};

use migration::entities::{brand, category, shoe, shoe_image, shoe_size};

const DEFAULT_PAGE_SIZE: u64 = 12;
const MAX_PAGE_SIZE: u64 = 100;

impl SeaOrmStorage {
    /// Filtered, paginated catalog listing. Featured shoes come first,
    /// then newest first. Only available shoes are returned.
    pub async fn list_shoes(&self, filter: &CatalogFilter) -> Result<(Vec<ShoeSummary>, u64)> {
        let mut condition = Condition::all().add(shoe::Column::IsAvailable.eq(true));

        // Search matches name, description and brand name, case-insensitive
        // on every backend (LIKE is case-sensitive on Postgres).
        if let Some(ref search) = filter.search {
            if !search.is_empty() {
                let pattern = format!("%{}%", search.to_lowercase());
                let brand_ids: Vec<i64> = brand::Entity::find()
                    .select_only()
                    .column(brand::Column::Id)
                    .filter(
                        Expr::expr(Func::lower(Expr::col(brand::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .into_tuple::<i64>()
                    .all(&self.db)
                    .await?;
                condition = condition.add(
                    Condition::any()
                        .add(
                            Expr::expr(Func::lower(Expr::col(shoe::Column::Name)))
                                .like(pattern.clone()),
                        )
                        .add(
                            Expr::expr(Func::lower(Expr::col(shoe::Column::Description)))
                                .like(pattern),
                        )
                        .add(shoe::Column::BrandId.is_in(brand_ids)),
                );
            }
        }
        if let Some(brand_id) = filter.brand_id {
            condition = condition.add(shoe::Column::BrandId.eq(brand_id));
        }
        if let Some(category_id) = filter.category_id {
            condition = condition.add(shoe::Column::CategoryId.eq(category_id));
        }
        if let Some(ref gender) = filter.gender {
            if !gender.is_empty() {
                condition = condition.add(shoe::Column::Gender.eq(gender.clone()));
            }
        }

        // Size filter: only shoes that have that size in stock.
        if let Some(size) = filter.size {
            let ids: Vec<i64> = shoe_size::Entity::find()
                .select_only()
                .column(shoe_size::Column::ShoeId)
                .filter(shoe_size::Column::Size.eq(size))
                .filter(shoe_size::Column::Stock.gt(0))
                .into_tuple::<i64>()
                .all(&self.db)
                .await?;
            condition = condition.add(shoe::Column::Id.is_in(ids));
        }

        let page = std::cmp::Ord::max(filter.page.unwrap_or(1), 1);
        let page_size = filter
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let paginator = shoe::Entity::find()
            .filter(condition)
            .order_by_desc(shoe::Column::IsFeatured)
            .order_by_desc(shoe::Column::CreatedAt)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page - 1).await?;

        let brand_names = self.brand_name_map().await?;
        let category_names = self.category_name_map().await?;
        let primary_images = self
            .primary_image_map(models.iter().map(|m| m.id).collect())
            .await?;

        let shoes = models
            .into_iter()
            .map(|m| ShoeSummary {
                id: m.id,
                name: m.name,
                price: m.price,
                offer_price: m.offer_price,
                gender: m.gender,
                color: m.color,
                is_featured: m.is_featured,
                brand: brand_names.get(&m.brand_id).cloned().unwrap_or_default(),
                category: m.category_id.and_then(|id| category_names.get(&id).cloned()),
                primary_image: primary_images.get(&m.id).cloned(),
            })
            .collect();

        Ok((shoes, total))
    }

    /// Full detail for a single available shoe, with sizes and images.
    pub async fn get_shoe(&self, shoe_id: i64) -> Result<ShoeDetail> {
        let model = shoe::Entity::find_by_id(shoe_id)
            .one(&self.db)
            .await?
            .filter(|m| m.is_available)
            .ok_or_else(|| StoreError::not_found(format!("shoe {} not found", shoe_id)))?;

        let brand_model = brand::Entity::find_by_id(model.brand_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                StoreError::database_operation(format!("brand {} missing", model.brand_id))
            })?;

        let category_model = match model.category_id {
            Some(id) => category::Entity::find_by_id(id).one(&self.db).await?,
            None => None,
        };

        let sizes = shoe_size::Entity::find()
            .filter(shoe_size::Column::ShoeId.eq(shoe_id))
            .order_by_asc(shoe_size::Column::Size)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| SizeStock {
                size: s.size,
                stock: s.stock,
            })
            .collect();

        let images = shoe_image::Entity::find()
            .filter(shoe_image::Column::ShoeId.eq(shoe_id))
            .order_by_desc(shoe_image::Column::IsPrimary)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|i| ShoeImageView {
                image_path: i.image_path,
                is_primary: i.is_primary,
            })
            .collect();

        Ok(ShoeDetail {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            offer_price: model.offer_price,
            gender: model.gender,
            color: model.color,
            material: model.material,
            is_available: model.is_available,
            is_featured: model.is_featured,
            brand: BrandView {
                id: brand_model.id,
                name: brand_model.name,
                image_path: brand_model.image_path,
            },
            category: category_model.map(|c| CategoryView {
                id: c.id,
                name: c.name,
                image_path: c.image_path,
            }),
            sizes,
            images,
        })
    }

    pub async fn list_brands(&self) -> Result<Vec<BrandView>> {
        let models = brand::Entity::find()
            .order_by_asc(brand::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| BrandView {
                id: m.id,
                name: m.name,
                image_path: m.image_path,
            })
            .collect())
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryView>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| CategoryView {
                id: m.id,
                name: m.name,
                image_path: m.image_path,
            })
            .collect())
    }

    async fn brand_name_map(&self) -> Result<HashMap<i64, String>> {
        Ok(brand::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect())
    }

    async fn category_name_map(&self) -> Result<HashMap<i64, String>> {
        Ok(category::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect())
    }

    async fn primary_image_map(&self, shoe_ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if shoe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(shoe_image::Entity::find()
            .filter(shoe_image::Column::ShoeId.is_in(shoe_ids))
            .filter(shoe_image::Column::IsPrimary.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|i| (i.shoe_id, i.image_path))
            .collect())
    }
}
