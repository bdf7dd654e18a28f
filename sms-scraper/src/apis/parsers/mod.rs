pub mod blue_moon;
pub mod sea_monster;
pub mod darrells_tavern;
pub mod kexp;
pub mod barboza;
pub mod neumos;
pub mod conor_byrne;

pub use blue_moon::BlueMoonParser;
pub use sea_monster::SeaMonsterParser;
pub use darrells_tavern::DarrellsTavernParser;
pub use kexp::KexpParser;
pub use barboza::BarbozaParser;
pub use neumos::NeumosParser;
pub use conor_byrne::ConorByrneParser;