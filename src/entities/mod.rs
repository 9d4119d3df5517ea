//! Entity module - Contains all SeaORM entity definitions for the remote
//! document collections. Each entity has a Model struct for data and an
//! Entity struct for operations; embedded arrays are typed JSON columns.

pub mod order;
pub mod session;
pub mod setting;
pub mod user;

// Re-export specific types to avoid conflicts
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use setting::{Column as SettingColumn, Entity as Setting, Model as SettingModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
