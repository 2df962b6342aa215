//! Logistic regression solver implementations
//!
//! Maximum-likelihood fitting of a linear decision boundary under an L2
//! penalty on the weights.

pub mod newton;

pub use self::newton::*;
