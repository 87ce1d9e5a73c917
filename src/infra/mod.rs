//! Инфраструктурный слой вокруг движка табло:
//! - хранилище сохранений (in-memory / файлы);
//! - каталог слотов и сохранённые имена;
//! - RNG и часы для движка.

pub mod clock;
pub mod persistence;
pub mod rng;
pub mod roster;
pub mod slots;

pub use clock::*;
pub use persistence::*;
pub use rng::*;
pub use roster::*;
pub use slots::*;
