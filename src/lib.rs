#[allow(non_snake_case)]
pub mod Molecula;
#[allow(non_snake_case)]
pub mod Reconcile;
#[allow(non_snake_case)]
pub mod Species;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
