//! Standard arithmetic entities
//!
//! All four operators are generic: the input count is fixed when a port is
//! instantiated. Each has a single output named `result`.

use crate::ArithmeticOp;
use sigflow_core::Entity;

/// Name of the output slot of every arithmetic entity
pub const RESULT_SLOT: &str = "result";

/// Generic (variadic) entity for `op`
pub fn arithmetic_entity(op: ArithmeticOp) -> Entity {
    Entity::generic(op.entity_id(), op.symbol()).with_outputs([RESULT_SLOT])
}

/// Concrete binary entity for `op`, inputs `a` and `b`
pub fn binary_entity(op: ArithmeticOp) -> Entity {
    Entity::new(op.entity_id(), op.symbol())
        .with_inputs(["a", "b"])
        .with_outputs([RESULT_SLOT])
}

pub fn add_entity() -> Entity {
    arithmetic_entity(ArithmeticOp::Add)
}

pub fn subtract_entity() -> Entity {
    arithmetic_entity(ArithmeticOp::Subtract)
}

pub fn multiply_entity() -> Entity {
    arithmetic_entity(ArithmeticOp::Multiply)
}

pub fn divide_entity() -> Entity {
    arithmetic_entity(ArithmeticOp::Divide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigflow_core::{Identifier, SlotKind};

    #[test]
    fn test_entities() {
        let add = add_entity();
        assert!(add.is_generic());
        assert_eq!(add.id(), &Identifier::new("Add", "Std"));
        assert_eq!(add.symbol(), "+");
        assert_eq!(add.output_names(), &[RESULT_SLOT.to_string()]);

        let compiled = add.compile_generic_entity(3, 0).unwrap();
        assert_eq!(compiled.slot_count(SlotKind::Input), 3);
        assert_eq!(compiled.id(), add.id());

        let binary = binary_entity(ArithmeticOp::Divide);
        assert!(!binary.is_generic());
        assert_eq!(binary.input_names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(divide_entity().id(), binary.id());
    }
}
