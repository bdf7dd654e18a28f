pub mod payload_store;
pub mod registry_adapter;
pub mod parser_factory;
pub mod http_client;
pub mod rate_limiter_adapter;
pub mod cadence_adapter;
pub mod gateway_adapter;
pub mod normalize_output_adapter;
pub mod quality_gate_output_adapter;
pub mod enrich_output_adapter;
pub mod conflation_output_adapter;

