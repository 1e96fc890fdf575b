//! Step definitions and scenario world.


mod given;
mod then;
mod when;
