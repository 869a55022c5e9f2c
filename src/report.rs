pub mod baseline;
pub mod io;
pub mod journal;
pub mod summary;
