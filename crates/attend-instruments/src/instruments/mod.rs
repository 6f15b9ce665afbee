pub mod asrs;
