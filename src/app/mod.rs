pub mod ports;
pub mod parse_use_case;
pub mod ingest_use_case;
pub mod normalize_use_case;
pub mod quality_gate_use_case;
pub mod enrich_use_case;
pub mod conflation_use_case;

