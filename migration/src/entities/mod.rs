pub mod brand;
pub mod cart;
pub mod cart_item;
pub mod category;
pub mod customer_profile;
pub mod order;
pub mod order_item;
pub mod shoe;
pub mod shoe_image;
pub mod shoe_size;
pub mod user;

pub use brand::Entity as BrandEntity;
pub use cart::Entity as CartEntity;
pub use cart_item::Entity as CartItemEntity;
pub use category::Entity as CategoryEntity;
pub use customer_profile::Entity as CustomerProfileEntity;
pub use order::Entity as OrderEntity;
pub use order_item::Entity as OrderItemEntity;
pub use shoe::Entity as ShoeEntity;
pub use shoe_image::Entity as ShoeImageEntity;
pub use shoe_size::Entity as ShoeSizeEntity;
pub use user::Entity as UserEntity;
