#![allow(dead_code)]

pub mod actions;
pub mod env;
pub mod wav;
