// Connector UI library - exposes the modules for integration testing

pub mod app;
pub mod model;
pub mod services;
pub mod view;
