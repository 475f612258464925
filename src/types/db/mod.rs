// Database entities - SeaORM models
pub mod cow;
pub mod cow_breed;
pub mod culling_record;
pub mod heat;
pub mod inseminator;
pub mod lactation;
pub mod milk;
pub mod pregnancy;
pub mod session;
pub mod user;
pub mod weight_record;
