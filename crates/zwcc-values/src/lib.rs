//! Value model and store for the command-class framework.
//!
//! Every setting the controller knows about a remote device is a [`Value`],
//! addressed by a [`ValueId`]:
//!
//! ```text
//! (home id, node id, instance, command class id, index)
//! ```
//!
//! Values live in a [`ValueStore`]. Command-class handlers never hold on to a
//! value; they check out a [`ValueRef`] for the duration of one operation and
//! the handle is released when it goes out of scope.
//!
//! # Example
//!
//! ```rust
//! use zwcc_values::{GroupIndex, Value, ValueData, ValueGenre, ValueId, ValueStore};
//!
//! let store = ValueStore::new();
//! let index = GroupIndex::new(2, 0).encode();
//! let id = ValueId::new(0x0100_0000, 5, 1, 0x2D, index);
//!
//! let value = store.create(Value::byte(id, ValueGenre::System, "Button 2 Scene Id"));
//! value.on_value_refreshed(ValueData::Byte(7)).unwrap();
//!
//! let again = store.get(&id).unwrap();
//! assert_eq!(again.read().data().as_u8(), Some(7));
//! ```

mod error;
mod id;
mod store;
mod value;

pub use error::*;
pub use id::*;
pub use store::*;
pub use value::*;
