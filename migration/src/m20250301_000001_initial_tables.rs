use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(User::PasswordHash).string().not_null())
                    .col(ColumnDef::new(User::FirstName).string().not_null())
                    .col(ColumnDef::new(User::LastName).string().not_null())
                    .col(
                        ColumnDef::new(User::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(User::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // customer_profiles (1:1 with users)
        manager
            .create_table(
                Table::create()
                    .table(CustomerProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerProfile::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerProfile::PhoneNumber)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CustomerProfile::Address)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CustomerProfile::City)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CustomerProfile::PostalCode)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CustomerProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerProfile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_profiles_user")
                            .from(CustomerProfile::Table, CustomerProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // brands
        manager
            .create_table(
                Table::create()
                    .table(Brand::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Brand::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Brand::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Brand::ImagePath).string().null())
                    .col(
                        ColumnDef::new(Brand::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Brand::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // categories
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Category::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Category::ImagePath).string().null())
                    .col(
                        ColumnDef::new(Category::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Category::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // shoes
        manager
            .create_table(
                Table::create()
                    .table(Shoe::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shoe::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shoe::Name).string().not_null())
                    .col(ColumnDef::new(Shoe::Description).text().not_null())
                    .col(ColumnDef::new(Shoe::Price).integer().not_null())
                    .col(ColumnDef::new(Shoe::OfferPrice).integer().null())
                    .col(ColumnDef::new(Shoe::Gender).string().not_null())
                    .col(ColumnDef::new(Shoe::Color).string().not_null())
                    .col(ColumnDef::new(Shoe::Material).string().not_null())
                    .col(
                        ColumnDef::new(Shoe::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Shoe::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Shoe::BrandId).big_integer().not_null())
                    .col(ColumnDef::new(Shoe::CategoryId).big_integer().null())
                    .col(
                        ColumnDef::new(Shoe::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shoe::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shoes_brand")
                            .from(Shoe::Table, Shoe::BrandId)
                            .to(Brand::Table, Brand::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shoes_category")
                            .from(Shoe::Table, Shoe::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // shoe_sizes: one row per (shoe, size) with its stock level
        manager
            .create_table(
                Table::create()
                    .table(ShoeSize::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShoeSize::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShoeSize::ShoeId).big_integer().not_null())
                    .col(ColumnDef::new(ShoeSize::Size).integer().not_null())
                    .col(
                        ColumnDef::new(ShoeSize::Stock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ShoeSize::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShoeSize::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shoe_sizes_shoe")
                            .from(ShoeSize::Table, ShoeSize::ShoeId)
                            .to(Shoe::Table, Shoe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shoe_sizes_shoe_size")
                    .table(ShoeSize::Table)
                    .col(ShoeSize::ShoeId)
                    .col(ShoeSize::Size)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // shoe_images
        manager
            .create_table(
                Table::create()
                    .table(ShoeImage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShoeImage::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShoeImage::ShoeId).big_integer().not_null())
                    .col(ColumnDef::new(ShoeImage::ImagePath).string().not_null())
                    .col(
                        ColumnDef::new(ShoeImage::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ShoeImage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shoe_images_shoe")
                            .from(ShoeImage::Table, ShoeImage::ShoeId)
                            .to(Shoe::Table, Shoe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // carts
        manager
            .create_table(
                Table::create()
                    .table(Cart::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cart::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cart::UserId).big_integer().null())
                    .col(ColumnDef::new(Cart::SessionKey).string().null())
                    .col(
                        ColumnDef::new(Cart::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cart::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carts_user")
                            .from(Cart::Table, Cart::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_carts_session_key")
                    .table(Cart::Table)
                    .col(Cart::SessionKey)
                    .to_owned(),
            )
            .await?;

        // cart_items
        manager
            .create_table(
                Table::create()
                    .table(CartItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartItem::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartItem::CartId).big_integer().not_null())
                    .col(ColumnDef::new(CartItem::ShoeId).big_integer().not_null())
                    .col(ColumnDef::new(CartItem::Size).integer().not_null())
                    .col(ColumnDef::new(CartItem::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(CartItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CartItem::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_cart")
                            .from(CartItem::Table, CartItem::CartId)
                            .to(Cart::Table, Cart::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_shoe")
                            .from(CartItem::Table, CartItem::ShoeId)
                            .to(Shoe::Table, Shoe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cart_items_cart_shoe_size")
                    .table(CartItem::Table)
                    .col(CartItem::CartId)
                    .col(CartItem::ShoeId)
                    .col(CartItem::Size)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // orders
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Order::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Order::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Order::UserId).big_integer().null())
                    .col(ColumnDef::new(Order::Status).string().not_null())
                    .col(ColumnDef::new(Order::PaymentMethod).string().not_null())
                    .col(
                        ColumnDef::new(Order::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Order::Subtotal)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Order::Tax).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Order::DeliveryCost)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Order::Total).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Order::FirstName).string().not_null())
                    .col(ColumnDef::new(Order::LastName).string().not_null())
                    .col(ColumnDef::new(Order::Email).string().not_null())
                    .col(ColumnDef::new(Order::Phone).string().not_null())
                    .col(ColumnDef::new(Order::ShippingAddress).text().not_null())
                    .col(ColumnDef::new(Order::ShippingCity).string().not_null())
                    .col(
                        ColumnDef::new(Order::ShippingPostalCode)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Order::BillingAddress).text().not_null())
                    .col(ColumnDef::new(Order::BillingCity).string().not_null())
                    .col(
                        ColumnDef::new(Order::BillingPostalCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Order::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Order::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // order_items
        manager
            .create_table(
                Table::create()
                    .table(OrderItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItem::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItem::OrderId).big_integer().not_null())
                    .col(ColumnDef::new(OrderItem::ShoeId).big_integer().not_null())
                    .col(ColumnDef::new(OrderItem::Size).integer().not_null())
                    .col(ColumnDef::new(OrderItem::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(OrderItem::UnitPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderItem::Total)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderItem::Discount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItem::Table, OrderItem::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_shoe")
                            .from(OrderItem::Table, OrderItem::ShoeId)
                            .to(Shoe::Table, Shoe::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_items_order_shoe_size")
                    .table(OrderItem::Table)
                    .col(OrderItem::OrderId)
                    .col(OrderItem::ShoeId)
                    .col(OrderItem::Size)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItem::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CartItem::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cart::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShoeImage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShoeSize::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shoe::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Brand::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomerProfile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    IsStaff,
    IsSuperuser,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CustomerProfile {
    #[sea_orm(iden = "customer_profiles")]
    Table,
    UserId,
    PhoneNumber,
    Address,
    City,
    PostalCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Brand {
    #[sea_orm(iden = "brands")]
    Table,
    Id,
    Name,
    ImagePath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category {
    #[sea_orm(iden = "categories")]
    Table,
    Id,
    Name,
    ImagePath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Shoe {
    #[sea_orm(iden = "shoes")]
    Table,
    Id,
    Name,
    Description,
    Price,
    OfferPrice,
    Gender,
    Color,
    Material,
    IsAvailable,
    IsFeatured,
    BrandId,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ShoeSize {
    #[sea_orm(iden = "shoe_sizes")]
    Table,
    Id,
    ShoeId,
    Size,
    Stock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ShoeImage {
    #[sea_orm(iden = "shoe_images")]
    Table,
    Id,
    ShoeId,
    ImagePath,
    IsPrimary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Cart {
    #[sea_orm(iden = "carts")]
    Table,
    Id,
    UserId,
    SessionKey,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CartItem {
    #[sea_orm(iden = "cart_items")]
    Table,
    Id,
    CartId,
    ShoeId,
    Size,
    Quantity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Order {
    #[sea_orm(iden = "orders")]
    Table,
    Id,
    Code,
    UserId,
    Status,
    PaymentMethod,
    Paid,
    Subtotal,
    Tax,
    DeliveryCost,
    Total,
    FirstName,
    LastName,
    Email,
    Phone,
    ShippingAddress,
    ShippingCity,
    ShippingPostalCode,
    BillingAddress,
    BillingCity,
    BillingPostalCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItem {
    #[sea_orm(iden = "order_items")]
    Table,
    Id,
    OrderId,
    ShoeId,
    Size,
    Quantity,
    UnitPrice,
    Total,
    Discount,
}
