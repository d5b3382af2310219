//! Downloadable renderings of the profile: JSON, vCard and PDF.

pub mod handlers;
pub mod json;
pub mod pdf;
pub mod vcard;
