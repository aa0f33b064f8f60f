pub mod detect;
pub mod error;
pub mod gc;
pub mod io;
pub mod model;
pub mod parse;
pub mod processor;
pub mod view;
