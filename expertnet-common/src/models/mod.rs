pub mod article;
pub mod consultant;
pub mod contact;
pub mod friend_request;
pub mod page;
pub mod post;
pub mod timeline;
pub mod user;
