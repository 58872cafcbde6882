pub mod cart_items;
pub mod products;

pub use cart_items::Entity as CartItems;
pub use products::Entity as Products;
