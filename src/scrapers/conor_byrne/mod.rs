pub mod crawler;
pub mod normalizer;
pub mod parser;

pub use crawler::ConorByrneCrawler;
pub use normalizer::ConorByrneNormalizer;
pub use parser::ConorByrneParser;
