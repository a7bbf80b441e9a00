pub mod feed;
pub mod follow;
pub mod posts;

pub use feed::{FeedService, ProfileFeed};
pub use follow::FollowService;
pub use posts::{NewCommentInput, NewPostInput, PostService};
