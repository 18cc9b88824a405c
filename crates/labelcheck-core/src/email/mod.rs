//! Email (`.eml`) parsing for merge mode.

mod fields;
mod message;
mod tables;

pub use fields::{extract_email_fields, html_to_text, EmailFields};
pub use message::{extract_email_content, EmailContent, PdfAttachment};
pub use tables::{extract_email_tables, EmailTables, TableRows};
