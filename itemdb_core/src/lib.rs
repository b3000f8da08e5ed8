pub mod builder;
pub mod config;
pub mod enchant;
pub mod error;
pub mod extract;
pub mod item;
pub mod list;
pub mod markup;
pub mod resolve;
pub mod store;
pub mod suffix;
pub mod text;
pub mod types;

pub use builder::Database;
pub use config::BuildConfig;
pub use error::{Error, Result};
pub use item::Item;
pub use store::DocumentStore;
pub use suffix::{Bonus, ItemSuffix, SuffixCatalog};
pub use types::{BonusType, PlayableClass, SuffixType};
