mod composer;
mod feed_list;
mod navbar;
mod pagination;
mod post_card;

pub use composer::Composer;
pub use feed_list::FeedList;
pub use navbar::Navbar;
pub use pagination::Pagination;
pub use post_card::PostCard;
