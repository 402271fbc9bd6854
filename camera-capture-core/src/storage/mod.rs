pub mod dcf;
pub mod gate;
pub mod poster;
