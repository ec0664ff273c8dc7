pub mod chat_view;
pub mod listings;
pub mod sidebar;
