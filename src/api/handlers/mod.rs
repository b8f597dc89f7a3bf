mod download;
mod health;

pub use download::download;
pub use health::health;
