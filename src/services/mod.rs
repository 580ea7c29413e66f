pub mod fetcher;
pub mod local_store;
pub mod naming;
pub mod publisher;
