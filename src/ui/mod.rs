pub mod hover;
pub mod panels;
pub mod plot;
