pub mod csv;
pub mod html;
pub mod json;
pub mod pdf;
pub mod summary_txt;
pub mod zip;
