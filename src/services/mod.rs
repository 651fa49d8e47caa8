pub mod albums;
