pub mod config;
pub mod html;
pub mod o11y;
pub mod page;
pub mod web;
