//! Preconfigured architecture library

use crate::{ArithmeticArchitecture, ArithmeticOp};
use sigflow_core::ArchitectureTable;

/// Register the arithmetic templates into `table`
pub fn register_arithmetic(table: &mut ArchitectureTable) {
    for op in ArithmeticOp::ALL {
        table.insert(Box::new(ArithmeticArchitecture::template(op)));
    }
}

/// A library holding every standard architecture
pub fn std_library() -> ArchitectureTable {
    let mut table = ArchitectureTable::new();
    register_arithmetic(&mut table);
    table
}
