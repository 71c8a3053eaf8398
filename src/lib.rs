#[allow(non_snake_case)]
pub mod Components;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Streams;
#[allow(non_snake_case)]
pub mod Utils;
