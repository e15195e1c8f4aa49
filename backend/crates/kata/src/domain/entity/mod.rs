pub mod kata;
