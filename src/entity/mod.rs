pub mod carousel_images;
pub mod categories;
pub mod news_articles;
pub mod notifications;
pub mod order_items;
pub mod orders;
pub mod page_content;
pub mod products;
pub mod reservations;
pub mod specials;

pub use carousel_images::Entity as CarouselImages;
pub use categories::Entity as Categories;
pub use news_articles::Entity as NewsArticles;
pub use notifications::Entity as Notifications;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use page_content::Entity as PageContent;
pub use products::Entity as Products;
pub use reservations::Entity as Reservations;
pub use specials::Entity as Specials;
