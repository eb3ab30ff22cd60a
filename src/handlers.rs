pub mod accounts;
pub mod friends;
pub mod index;
pub mod messages;
