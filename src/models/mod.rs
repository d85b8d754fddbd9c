pub mod assessment;
pub mod candidate;
pub mod invite;
pub mod job;
pub mod note;
pub mod outbox;
pub mod pagination;
pub mod question;
pub mod timeline;
