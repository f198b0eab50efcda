pub mod company;
pub mod market;
pub mod news;
pub mod response;
pub mod watchlist;

pub use company::*;
pub use market::*;
pub use news::*;
pub use response::*;
pub use watchlist::*;
