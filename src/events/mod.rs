pub mod command;
pub mod component;
pub mod member_join;
pub mod member_leave;
pub mod ready;
pub mod router;
