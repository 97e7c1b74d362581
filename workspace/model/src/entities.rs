//! This file serves as the root for all SeaORM entity modules.
//! The ledger stores two entities: the users owning the records and the
//! expense records themselves.

pub mod expense;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::expense::Entity as Expense;
    pub use super::user::Entity as User;
}
