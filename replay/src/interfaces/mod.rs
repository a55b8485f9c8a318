pub mod gui_interface;
