//! Sigflow Std - standard entities and architectures
//!
//! Arithmetic over the core value structures:
//! - `ArithmeticOp` - Add/Subtract/Multiply/Divide with numeric promotion
//! - Generic (variadic) and binary arithmetic entities
//! - `ArithmeticArchitecture` - process-based implementation linked to ports
//! - `std_library()` - an architecture table with every template registered
//!
//! ## Example
//!
//! ```
//! use sigflow_core::{Network, PortBindings, Value};
//! use sigflow_std::{add_entity, std_library};
//!
//! let mut network = Network::with_library(Box::new(std_library()));
//! let a = network.create_signal_with_value("a", 3i64);
//! let b = network.create_signal_with_value("b", 4i64);
//! let port = network
//!     .instantiate_port(&add_entity(), PortBindings::new().with_inputs([a, b]))
//!     .unwrap();
//!
//! let outputs = network.execute_mathematical_operator(port).unwrap();
//! assert_eq!(network.value(outputs[0]).unwrap(), Some(&Value::Integer(7)));
//! ```

mod architecture;
mod arithmetic;
mod entities;
mod library;

pub use architecture::{ArithmeticArchitecture, ArithmeticProcess};
pub use arithmetic::ArithmeticOp;
pub use entities::{
    add_entity, arithmetic_entity, binary_entity, divide_entity, multiply_entity,
    subtract_entity, RESULT_SLOT,
};
pub use library::{register_arithmetic, std_library};
