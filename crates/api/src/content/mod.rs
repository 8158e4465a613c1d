mod articles;
mod channels;
mod error;

pub use articles::ArticleList;
pub use channels::ChannelEnrichment;
pub use error::ContentError;
