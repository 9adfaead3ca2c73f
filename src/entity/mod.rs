pub mod item_images;
pub mod items;

pub use item_images::Entity as ItemImages;
pub use items::Entity as Items;
