#![no_std]

pub mod frame;
pub mod gpio;
pub mod movie;
pub mod player;
pub mod res;
pub mod scanner;

extern crate alloc;
