// Stores layer - Data access and repository pattern
//
// Stores are stateless. Every method takes the connection (or transaction)
// to run on, so coordinators decide the transaction boundaries.
pub mod cow_breed_store;
pub mod cow_store;
pub mod culling_record_store;
pub mod heat_store;
pub mod inseminator_store;
pub mod lactation_store;
pub mod milk_store;
pub mod pregnancy_store;
pub mod query_helpers;
pub mod session_store;
pub mod user_store;
pub mod weight_record_store;

pub use cow_breed_store::CowBreedStore;
pub use cow_store::{CowFilter, CowGroup, CowStore, NewCow};
pub use culling_record_store::{CullingRecordFilter, CullingRecordStore};
pub use heat_store::{HeatFilter, HeatStore};
pub use inseminator_store::{InseminatorStore, NewInseminator};
pub use lactation_store::{LactationFilter, LactationStore, NewLactation};
pub use milk_store::{MilkFilter, MilkStore, NewMilk};
pub use pregnancy_store::{NewPregnancy, PregnancyFilter, PregnancyStore};
pub use session_store::SessionStore;
pub use user_store::{NewUser, UniqueUserField, UserStore};
pub use weight_record_store::{WeightRecordFilter, WeightRecordStore};
