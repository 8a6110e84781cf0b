//! # Console Front End
//!
//! Stands in for the two pages the backend serves: the admin page and the
//! caller landing page. All rendering goes through the [`view::PageView`]
//! trait so workflows stay testable without a terminal.

pub mod admin;
pub mod home;
pub mod view;

pub use admin::AdminPanel;
pub use home::HomeSession;
pub use view::{AdminSnapshot, ConsoleView, PageView};
