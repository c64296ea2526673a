pub mod logging;
pub mod submit;
