pub mod controls;
pub mod form;
pub mod theme;
