//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pounce-core:
//!
//! - Servo drivers (hobby servo on a 50 Hz PWM channel)

#![no_std]
#![deny(unsafe_code)]

pub mod servo;
