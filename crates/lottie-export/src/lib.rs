//! # lottie-export
//!
//! Writers and readers for the formats an [`Animation`](lottie_model::Animation)
//! travels in: Lottie JSON, gzip-compressed Telegram stickers and HTML preview
//! pages. Also hosts the output stripping pass and the sticker validator.

pub mod html;
pub mod lottie;
pub mod strip;
pub mod tgs;
pub mod validate;

pub use html::{export_embedded_html, export_linked_html};
pub use lottie::{export_lottie, export_lottie_with, import_lottie, to_lottie_string};
pub use strip::Strip;
pub use tgs::{export_tgs, parse_tgs, TgsOptions};
pub use validate::{Severity, TgsIssue, TgsValidator};
