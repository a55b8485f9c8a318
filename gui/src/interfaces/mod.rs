pub mod load_interface;
