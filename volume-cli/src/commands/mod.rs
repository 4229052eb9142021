pub mod create;
pub mod inspect;
pub mod list;
pub mod path;
pub mod rm;
