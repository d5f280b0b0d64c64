pub mod favorite;

pub use favorite::refresh;
