pub mod callmut;
