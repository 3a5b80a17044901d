//! Account operations: customer registration, login verification, profiles,
//! staff administration, and the bootstrap administrator.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::info;

use super::SeaOrmStorage;
use crate::errors::{Result, StoreError};
use crate::storage::models::{
    CustomerFilter, CustomerUpdate, CustomerView, DashboardStats, RegisterInput, StaffInput,
    StaffView,
};
use crate::utils::password::{hash_password, verify_password};

use migration::entities::{customer_profile, order, shoe, user};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

impl SeaOrmStorage {
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn find_user_by_id(&self, user_id: i64) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    /// Register a customer account with its profile. Both rows are created
    /// in one transaction so a failed profile insert cannot leave an
    /// orphaned user holding the email.
    pub async fn create_customer(&self, input: &RegisterInput) -> Result<user::Model> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(StoreError::validation("invalid email address"));
        }
        if input.password.len() < 8 {
            return Err(StoreError::validation(
                "password must be at least 8 characters",
            ));
        }
        if self.find_user_by_email(&email).await?.is_some() {
            return Err(StoreError::conflict("an account with this email exists"));
        }

        let txn = self.db.begin().await?;

        let now = Utc::now();
        let user_active = user::ActiveModel {
            email: Set(email),
            password_hash: Set(hash_password(&input.password)?),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            is_staff: Set(false),
            is_superuser: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let user_model = user_active.insert(&txn).await?;

        let profile_active = customer_profile::ActiveModel {
            user_id: Set(user_model.id),
            phone_number: Set(input.phone_number.trim().to_string()),
            address: Set(input.address.trim().to_string()),
            city: Set(input.city.trim().to_string()),
            postal_code: Set(input.postal_code.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        profile_active.insert(&txn).await?;

        txn.commit().await?;
        Ok(user_model)
    }

    /// Check credentials. The same error is returned for an unknown email
    /// and a bad password.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<user::Model> {
        let email = email.trim().to_lowercase();
        let Some(user_model) = self.find_user_by_email(&email).await? else {
            return Err(StoreError::unauthorized("invalid email or password"));
        };

        if !verify_password(password, &user_model.password_hash)? {
            return Err(StoreError::unauthorized("invalid email or password"));
        }

        Ok(user_model)
    }

    pub async fn customer_view(&self, user_id: i64) -> Result<CustomerView> {
        let user_model = self
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("user {} not found", user_id)))?;

        let profile = customer_profile::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?;

        Ok(Self::assemble_customer_view(user_model, profile))
    }

    fn assemble_customer_view(
        user_model: user::Model,
        profile: Option<customer_profile::Model>,
    ) -> CustomerView {
        let (phone_number, address, city, postal_code) = match profile {
            Some(p) => (p.phone_number, p.address, p.city, p.postal_code),
            None => Default::default(),
        };
        CustomerView {
            user_id: user_model.id,
            email: user_model.email,
            first_name: user_model.first_name,
            last_name: user_model.last_name,
            phone_number,
            address,
            city,
            postal_code,
            created_at: user_model.created_at,
        }
    }

    /// Apply partial profile changes; absent fields are left untouched.
    pub async fn update_customer(&self, user_id: i64, update: &CustomerUpdate) -> Result<CustomerView> {
        let user_model = self
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("user {} not found", user_id)))?;

        let now = Utc::now();
        let mut user_active: user::ActiveModel = user_model.clone().into();
        if let Some(ref email) = update.email {
            let email = email.trim().to_lowercase();
            if email.is_empty() || !email.contains('@') {
                return Err(StoreError::validation("invalid email address"));
            }
            if email != user_model.email && self.find_user_by_email(&email).await?.is_some() {
                return Err(StoreError::conflict("an account with this email exists"));
            }
            user_active.email = Set(email);
        }
        if let Some(ref first_name) = update.first_name {
            user_active.first_name = Set(first_name.trim().to_string());
        }
        if let Some(ref last_name) = update.last_name {
            user_active.last_name = Set(last_name.trim().to_string());
        }
        user_active.updated_at = Set(now);
        user_active.update(&self.db).await?;

        let profile = customer_profile::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?;

        match profile {
            Some(profile) => {
                let mut active: customer_profile::ActiveModel = profile.into();
                if let Some(ref phone) = update.phone_number {
                    active.phone_number = Set(phone.trim().to_string());
                }
                if let Some(ref address) = update.address {
                    active.address = Set(address.trim().to_string());
                }
                if let Some(ref city) = update.city {
                    active.city = Set(city.trim().to_string());
                }
                if let Some(ref postal) = update.postal_code {
                    active.postal_code = Set(postal.trim().to_string());
                }
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let active = customer_profile::ActiveModel {
                    user_id: Set(user_id),
                    phone_number: Set(update.phone_number.clone().unwrap_or_default()),
                    address: Set(update.address.clone().unwrap_or_default()),
                    city: Set(update.city.clone().unwrap_or_default()),
                    postal_code: Set(update.postal_code.clone().unwrap_or_default()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&self.db).await?;
            }
        }

        self.customer_view(user_id).await
    }

    /// Paginated customer directory for the management area.
    pub async fn list_customers(&self, filter: &CustomerFilter) -> Result<(Vec<CustomerView>, u64)> {
        let mut condition = Condition::all().add(user::Column::IsStaff.eq(false));

        if let Some(ref search) = filter.search {
            if !search.is_empty() {
                condition = condition.add(
                    Condition::any()
                        .add(user::Column::Email.contains(search))
                        .add(user::Column::FirstName.contains(search))
                        .add(user::Column::LastName.contains(search)),
                );
            }
        }

        let page = filter.page.unwrap_or(1).max(1);
        let page_size = filter
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let paginator = user::Entity::find()
            .filter(condition)
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page - 1).await?;

        let mut views = Vec::with_capacity(models.len());
        for model in models {
            let profile = customer_profile::Entity::find_by_id(model.id)
                .one(&self.db)
                .await?;
            views.push(Self::assemble_customer_view(model, profile));
        }

        Ok((views, total))
    }

    pub async fn list_staff(&self) -> Result<Vec<StaffView>> {
        let models = user::Entity::find()
            .filter(user::Column::IsStaff.eq(true))
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| StaffView {
                id: m.id,
                email: m.email,
                first_name: m.first_name,
                last_name: m.last_name,
                is_superuser: m.is_superuser,
                created_at: m.created_at,
            })
            .collect())
    }

    pub async fn create_staff(&self, input: &StaffInput) -> Result<StaffView> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(StoreError::validation("invalid email address"));
        }
        let password = input
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StoreError::validation("password is required"))?;
        if self.find_user_by_email(&email).await?.is_some() {
            return Err(StoreError::conflict("an account with this email exists"));
        }

        let now = Utc::now();
        let active = user::ActiveModel {
            email: Set(email),
            password_hash: Set(hash_password(password)?),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            is_staff: Set(true),
            is_superuser: Set(input.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let model = active.insert(&self.db).await?;

        Ok(StaffView {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            is_superuser: model.is_superuser,
            created_at: model.created_at,
        })
    }

    pub async fn update_staff(&self, staff_id: i64, input: &StaffInput) -> Result<StaffView> {
        let model = self
            .find_user_by_id(staff_id)
            .await?
            .filter(|m| m.is_staff)
            .ok_or_else(|| StoreError::not_found(format!("staff {} not found", staff_id)))?;

        let email = input.email.trim().to_lowercase();
        if email != model.email && self.find_user_by_email(&email).await?.is_some() {
            return Err(StoreError::conflict("an account with this email exists"));
        }

        let mut active: user::ActiveModel = model.into();
        active.email = Set(email);
        active.first_name = Set(input.first_name.trim().to_string());
        active.last_name = Set(input.last_name.trim().to_string());
        active.is_superuser = Set(input.is_superuser);
        if let Some(password) = input.password.as_deref().filter(|p| !p.is_empty()) {
            active.password_hash = Set(hash_password(password)?);
        }
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;

        Ok(StaffView {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            is_superuser: model.is_superuser,
            created_at: model.created_at,
        })
    }

    /// Delete any account. Callers enforce the no-self-delete rule.
    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        let result = user::Entity::delete_by_id(user_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found(format!("user {} not found", user_id)));
        }
        Ok(())
    }

    /// Make sure the bootstrap administrator exists with the configured
    /// password. An existing account is promoted to staff/superuser, and
    /// its hash is replaced when the configured password changed.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<()> {
        if password.is_empty() {
            info!("admin bootstrap skipped: no password configured");
            return Ok(());
        }

        match self.find_user_by_email(email).await? {
            Some(model) => {
                let promoted = !(model.is_staff && model.is_superuser);
                let rehash = !verify_password(password, &model.password_hash)?;
                if !promoted && !rehash {
                    return Ok(());
                }
                let mut active: user::ActiveModel = model.into();
                active.is_staff = Set(true);
                active.is_superuser = Set(true);
                if rehash {
                    active.password_hash = Set(hash_password(password)?);
                }
                active.updated_at = Set(Utc::now());
                active.update(&self.db).await?;
                info!(email = %email, promoted, rehash, "administrator account updated");
                Ok(())
            }
            None => {
                let now = Utc::now();
                let active = user::ActiveModel {
                    email: Set(email.to_string()),
                    password_hash: Set(hash_password(password)?),
                    first_name: Set("Admin".to_string()),
                    last_name: Set("Calzados Marilo".to_string()),
                    is_staff: Set(true),
                    is_superuser: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&self.db).await?;
                info!(email = %email, "bootstrap administrator created");
                Ok(())
            }
        }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let total_customers = user::Entity::find()
            .filter(user::Column::IsStaff.eq(false))
            .count(&self.db)
            .await?;
        let total_staff = user::Entity::find()
            .filter(user::Column::IsStaff.eq(true))
            .count(&self.db)
            .await?;
        let total_shoes = shoe::Entity::find().count(&self.db).await?;
        let total_orders = order::Entity::find().count(&self.db).await?;
        let paid_orders = order::Entity::find()
            .filter(order::Column::Paid.eq(true))
            .count(&self.db)
            .await?;
        let pending_shipment = order::Entity::find()
            .filter(order::Column::Paid.eq(true))
            .filter(order::Column::Status.eq("awaiting_shipment"))
            .count(&self.db)
            .await?;

        Ok(DashboardStats {
            total_customers,
            total_staff,
            total_shoes,
            total_orders,
            paid_orders,
            pending_shipment,
        })
    }
}
