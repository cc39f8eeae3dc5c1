pub mod dose;
pub mod prescription;
