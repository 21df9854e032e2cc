#![no_std]

pub mod access;
pub mod clock;

#[cfg(test)]
mod test;
