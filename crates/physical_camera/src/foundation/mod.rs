//! Foundation utilities shared by the optics and prescription modules

pub mod logging;
pub mod math;
