pub mod api;
pub mod error;
pub mod feed;
pub mod host;
pub mod message;
pub mod theme;
pub mod time_format;
pub mod view;

// Re-export main types for convenience
pub use api::{MessageSource, MessagesApi};
pub use error::FeedError;
pub use feed::{ContainerContent, FeedState, MessageCard};
pub use host::{Host, StaticHost};
pub use message::{Message, Payload};
pub use theme::{Theme, ThemeAttribute, ThemeParams};
pub use time_format::{format_clock, format_timestamp, format_timestamp_now};
pub use view::{FeedViewConfig, MessageFeedView, ViewEvent};
