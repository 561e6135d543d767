//! Storage nodes and their weighting attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// A storage node as seen by the weighting engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u64,
    /// Available capacity, higher is better
    pub capacity: f64,
    /// Price per unit, lower is better
    pub price: f64,
}

pub type Nodes = Vec<Node>;

impl Node {
    pub fn new(id: u64, capacity: f64, price: f64) -> Self {
        Self {
            id,
            capacity,
            price,
        }
    }

    /// Both attributes must be finite and non-negative.
    pub fn validate(&self) -> DomainResult<()> {
        for (attribute, value) in [("capacity", self.capacity), ("price", self.price)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidAttribute {
                    id: self.id,
                    attribute,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{} (C={}, P={})", self.id, self.capacity, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_finite_attributes_when_validating_then_ok() {
        assert!(Node::new(1, 0.0, 3.5).validate().is_ok());
    }

    #[test]
    fn given_negative_price_when_validating_then_reports_attribute() {
        let err = Node::new(7, 1.0, -2.0).validate().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidAttribute {
                id: 7,
                attribute: "price",
                value: -2.0
            }
        );
    }

    #[test]
    fn given_nan_capacity_when_validating_then_errors() {
        let err = Node::new(3, f64::NAN, 1.0).validate().unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }
}
