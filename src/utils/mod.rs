pub mod error;
pub mod html;
pub mod logger;
pub mod time;
pub mod validation;
