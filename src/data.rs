pub mod bar;
pub mod schema;
pub mod series;
