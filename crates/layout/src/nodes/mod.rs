pub mod block;
pub mod image;
pub mod list;
pub mod list_item;
pub mod list_utils;
pub mod paragraph;
pub mod table;
pub mod text;
