//! Server-rendered public pages, account forms and embedded static assets.

pub mod assets;
pub mod context;
pub mod handlers;
pub mod html;
pub mod pages;
